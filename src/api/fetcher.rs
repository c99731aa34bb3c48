use std::future::Future;
use std::sync::Arc;

use crate::model::{FetchPage, SortOrder};

use super::error::FetchError;

/// Parameters of a single page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchQuery {
    /// Empty means no filter.
    pub search_term: String,
    pub sort_order: SortOrder,
    /// Continuation cursor from the previous page, if any.
    pub cursor: Option<String>,
}

/// Source of message pages.
///
/// One call is one request: no retries, no status interpretation.
pub trait MessageFetcher: Send + Sync {
    fn fetch(
        &self,
        token: &str,
        query: &FetchQuery,
    ) -> impl Future<Output = Result<FetchPage, FetchError>> + Send;
}

impl<T: MessageFetcher> MessageFetcher for Arc<T> {
    fn fetch(
        &self,
        token: &str,
        query: &FetchQuery,
    ) -> impl Future<Output = Result<FetchPage, FetchError>> + Send {
        self.as_ref().fetch(token, query)
    }
}
