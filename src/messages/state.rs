use crate::api::FetchErrorKind;
use crate::model::{Message, SortOrder};
use crate::mvi::ViewState;

/// Snapshot of the message browsing state.
///
/// `messages` never holds two entries with the same id and is always
/// ordered by timestamp according to `sort_order`.
#[derive(Debug, Clone, PartialEq)]
pub struct MessagesState {
    pub messages: Vec<Message>,
    /// Cursor to resume from; `None` before the first page or after a reset.
    pub next_cursor: Option<String>,
    pub has_more: bool,
    /// True while a page fetch is in flight.
    pub loading: bool,
    pub search_term: String,
    pub sort_order: SortOrder,
    /// Kind of the most recent failed fetch, cleared when the next one starts.
    pub error: Option<FetchErrorKind>,
}

impl Default for MessagesState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            next_cursor: None,
            has_more: true,
            loading: false,
            search_term: String::new(),
            sort_order: SortOrder::default(),
            error: None,
        }
    }
}

impl ViewState for MessagesState {}

impl MessagesState {
    pub fn with_sort_order(sort_order: SortOrder) -> Self {
        Self {
            sort_order,
            ..Self::default()
        }
    }

    /// Whether another page can be requested right now.
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.loading
    }
}
