//! HTTP access to the message archive.
//!
//! [`MessageFetcher`] is the seam the messages store depends on;
//! [`MessagesApi`] is the reqwest implementation and [`AuthApi`] checks
//! tokens against the same service.

mod client;
mod error;
mod fetcher;

pub use client::{AuthApi, MessagesApi, TokenValidity};
pub use error::{FetchError, FetchErrorKind};
pub use fetcher::{FetchQuery, MessageFetcher};
