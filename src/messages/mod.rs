//! Message browsing state container.
//!
//! [`MessagesStore`] owns the accumulated message list together with the
//! search, sort and pagination state. Transitions are computed by the pure
//! [`MessagesReducer`]; the store sequences fetches, enforces single-flight
//! and publishes snapshots to subscribers.

mod intent;
mod reducer;
mod state;
mod store;

pub use intent::MessagesIntent;
pub use reducer::{merge_page, MessagesReducer};
pub use state::MessagesState;
pub use store::{LoadError, MessagesStore, SORT_ORDER_KEY};
