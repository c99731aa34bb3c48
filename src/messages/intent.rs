use crate::api::FetchErrorKind;
use crate::model::{FetchPage, SortOrder};
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum MessagesIntent {
    /// A page fetch began.
    FetchStarted,
    /// A page fetch completed successfully.
    PageLoaded { page: FetchPage },
    /// A page fetch failed.
    FetchFailed { kind: FetchErrorKind },
    /// A page fetch was dropped before it completed.
    FetchAbandoned,
    /// Clear accumulated messages and pagination, keeping search and sort.
    Reset,
    SearchTermChanged(String),
    /// Change the order and re-sort what is already loaded.
    SortOrderChanged(SortOrder),
}

impl Intent for MessagesIntent {}
