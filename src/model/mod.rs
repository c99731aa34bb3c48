//! Message domain types (pure data).
//!
//! These mirror the JSON records served by the message archive endpoint.

pub mod message;
pub mod sort;
pub mod timestamp;

pub use message::{Author, FetchPage, Message};
pub use sort::{sort_messages, ParseSortOrderError, SortOrder};
pub use timestamp::parse_timestamp;
