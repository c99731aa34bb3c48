use std::sync::Arc;

use scopeguard::ScopeGuard;
use thiserror::Error;

use crate::api::{FetchError, FetchQuery, MessageFetcher};
use crate::auth::TokenHolder;
use crate::model::SortOrder;
use crate::mvi::Reducer;
use crate::observe::{Observable, Subscription};
use crate::storage::KeyValueStore;

use super::intent::MessagesIntent;
use super::reducer::MessagesReducer;
use super::state::MessagesState;

/// Session-store key holding the sort preference.
pub const SORT_ORDER_KEY: &str = "sortOrder";

/// Errors returned by [`MessagesStore::load_next_page`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// Another page fetch is still running; nothing was requested.
    #[error("A page fetch is already in progress")]
    InFlight,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Message browsing state container.
///
/// Safe to share behind `Arc`; the state lock is never held across the
/// network call.
pub struct MessagesStore<F> {
    fetcher: F,
    token: TokenHolder,
    session: Arc<dyn KeyValueStore>,
    state: Observable<MessagesState>,
}

impl<F: MessageFetcher> MessagesStore<F> {
    /// Create an empty container. The sort order is restored from
    /// `session` when a valid value is stored there, else `desc`.
    pub fn new(fetcher: F, token: TokenHolder, session: Arc<dyn KeyValueStore>) -> Self {
        let sort_order = restore_sort_order(session.as_ref());
        Self {
            fetcher,
            token,
            session,
            state: Observable::new(MessagesState::with_sort_order(sort_order)),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> MessagesState {
        self.state.get()
    }

    /// Observe state changes. `f` receives the current snapshot right away
    /// and the full snapshot after every mutation.
    pub fn subscribe(
        &self,
        f: impl Fn(&MessagesState) + Send + Sync + 'static,
    ) -> Subscription {
        self.state.subscribe(f)
    }

    /// Fetch the page after the current cursor and merge it in.
    ///
    /// Rejected with [`LoadError::InFlight`] while another fetch runs.
    /// Search term and cursor are captured when the fetch starts; the merge
    /// uses the sort order current when the page arrives.
    pub async fn load_next_page(&self) -> Result<(), LoadError> {
        let Some(started) = self.state.update_if(
            |s| !s.loading,
            |s| MessagesReducer::reduce(s, MessagesIntent::FetchStarted),
        ) else {
            tracing::debug!("Page fetch skipped, another one is in flight");
            return Err(LoadError::InFlight);
        };

        let query = FetchQuery {
            search_term: started.search_term,
            sort_order: started.sort_order,
            cursor: started.next_cursor,
        };
        let token = self.token.get();

        // Clears `loading` if this future is dropped mid-fetch.
        let abandon = scopeguard::guard((), |()| {
            tracing::debug!("Page fetch abandoned");
            self.dispatch(MessagesIntent::FetchAbandoned);
        });
        let result = self.fetcher.fetch(token.expose(), &query).await;
        ScopeGuard::into_inner(abandon);

        match result {
            Ok(page) => {
                let fetched = page.messages.len();
                let before = started.messages.len();
                let state = self.dispatch(MessagesIntent::PageLoaded { page });
                tracing::info!(
                    fetched,
                    added = state.messages.len().saturating_sub(before),
                    total = state.messages.len(),
                    has_more = state.has_more,
                    "Message page merged"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = %e.kind(),
                    status = ?e.status(),
                    "Message page fetch failed"
                );
                self.dispatch(MessagesIntent::FetchFailed { kind: e.kind() });
                Err(LoadError::Fetch(e))
            }
        }
    }

    /// Drop loaded messages and pagination. Search and sort are kept.
    pub fn reset(&self) {
        self.dispatch(MessagesIntent::Reset);
    }

    /// Change the search term. Does not fetch or reset pagination; call
    /// [`reset`](Self::reset) and [`load_next_page`](Self::load_next_page)
    /// for a fresh search.
    pub fn set_search_term(&self, term: impl Into<String>) {
        self.dispatch(MessagesIntent::SearchTermChanged(term.into()));
    }

    /// Change the sort order, re-sort the loaded messages and remember the
    /// choice for this session.
    pub fn set_sort_order(&self, order: SortOrder) {
        self.dispatch(MessagesIntent::SortOrderChanged(order));
        if let Err(e) = self.session.set(SORT_ORDER_KEY, order.as_str()) {
            tracing::warn!(error = %e, "Failed to persist sort order");
        }
    }

    fn dispatch(&self, intent: MessagesIntent) -> MessagesState {
        self.state
            .update(|state| MessagesReducer::reduce(state, intent))
    }
}

fn restore_sort_order(session: &dyn KeyValueStore) -> SortOrder {
    match session.get(SORT_ORDER_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring stored sort order");
            SortOrder::default()
        }),
        Ok(None) => SortOrder::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored sort order");
            SortOrder::default()
        }
    }
}
