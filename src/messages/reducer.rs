use std::collections::HashSet;

use crate::model::{sort_messages, FetchPage, Message, SortOrder};
use crate::mvi::Reducer;

use super::intent::MessagesIntent;
use super::state::MessagesState;

pub struct MessagesReducer;

impl Reducer for MessagesReducer {
    type State = MessagesState;
    type Intent = MessagesIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            MessagesIntent::FetchStarted => MessagesState {
                loading: true,
                error: None,
                ..state
            },
            MessagesIntent::PageLoaded { page } => {
                if page.is_empty() {
                    // Cursor and messages stay as they were.
                    return MessagesState {
                        has_more: false,
                        loading: false,
                        ..state
                    };
                }
                let FetchPage {
                    messages: incoming,
                    next_cursor,
                } = page;
                let has_more = next_cursor.is_some();
                MessagesState {
                    messages: merge_page(state.messages, incoming, state.sort_order),
                    next_cursor,
                    has_more,
                    loading: false,
                    ..state
                }
            }
            MessagesIntent::FetchFailed { kind } => MessagesState {
                loading: false,
                error: Some(kind),
                ..state
            },
            MessagesIntent::FetchAbandoned => MessagesState {
                loading: false,
                ..state
            },
            MessagesIntent::Reset => MessagesState {
                messages: Vec::new(),
                next_cursor: None,
                has_more: true,
                error: None,
                ..state
            },
            MessagesIntent::SearchTermChanged(search_term) => MessagesState {
                search_term,
                ..state
            },
            MessagesIntent::SortOrderChanged(sort_order) => {
                let mut messages = state.messages;
                sort_messages(&mut messages, sort_order);
                MessagesState {
                    messages,
                    sort_order,
                    ..state
                }
            }
        }
    }
}

/// Union `existing` and `incoming` by id, then sort by `order`.
///
/// First seen wins: an id already in `existing` (or earlier in `incoming`)
/// keeps that copy. Equal timestamps keep the order "existing, then
/// incoming in page order".
pub fn merge_page(existing: Vec<Message>, incoming: Vec<Message>, order: SortOrder) -> Vec<Message> {
    let mut seen: HashSet<String> = existing.iter().map(|m| m.id.clone()).collect();
    let mut merged = existing;
    merged.reserve(incoming.len());

    for msg in incoming {
        if seen.insert(msg.id.clone()) {
            merged.push(msg);
        }
    }

    sort_messages(&mut merged, order);
    merged
}
