//! Shared test fixtures and fakes.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use std::collections::VecDeque;
use std::sync::Arc;

use msgbrowse::api::{FetchError, FetchQuery, MessageFetcher};
use msgbrowse::auth::TokenHolder;
use msgbrowse::messages::{MessagesState, MessagesStore};
use msgbrowse::model::{Author, FetchPage, Message};
use msgbrowse::storage::{KeyValueStore, MemoryStore};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub fn author(id: &str) -> Author {
    Author {
        id: id.to_string(),
        real_name: None,
        display_name: id.to_lowercase(),
        avatar: format!("https://avatars.test/{}.png", id),
        is_bot: false,
        tz: None,
        tz_offset: None,
        color: None,
    }
}

pub fn msg(id: &str, ts: &str) -> Message {
    msg_with_text(id, ts, &format!("message {}", id))
}

pub fn msg_with_text(id: &str, ts: &str, text: &str) -> Message {
    Message {
        kind: Some("message".to_string()),
        id: id.to_string(),
        ts: ts.to_string(),
        text: text.to_string(),
        author: author("U1"),
    }
}

pub fn page(messages: Vec<Message>, next_cursor: Option<&str>) -> FetchPage {
    FetchPage {
        messages,
        next_cursor: next_cursor.map(str::to_string),
    }
}

pub fn ids(state: &MessagesState) -> Vec<&str> {
    state.messages.iter().map(|m| m.id.as_str()).collect()
}

pub fn malformed_error() -> FetchError {
    FetchError::Decode {
        url: "http://mock.test/db-messages".to_string(),
        status: 200,
        source: serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
    }
}

/// Fetcher that replays queued results and records every call.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<FetchPage, FetchError>>>,
    calls: Mutex<Vec<(String, FetchQuery)>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch waits for a `notify_one` on `gate` before answering.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push_page(&self, page: FetchPage) -> &Self {
        self.responses.lock().push_back(Ok(page));
        self
    }

    pub fn push_error(&self, err: FetchError) -> &Self {
        self.responses.lock().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<(String, FetchQuery)> {
        self.calls.lock().clone()
    }
}

impl MessageFetcher for ScriptedFetcher {
    async fn fetch(&self, token: &str, query: &FetchQuery) -> Result<FetchPage, FetchError> {
        self.calls.lock().push((token.to_string(), query.clone()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self.responses.lock().pop_front();
        next.unwrap_or_else(|| Ok(FetchPage::default()))
    }
}

/// Token holder backed by a fresh in-memory store.
pub fn memory_token(token: &str) -> TokenHolder {
    let holder = TokenHolder::load(Arc::new(MemoryStore::new()));
    if !token.is_empty() {
        holder.set(token);
    }
    holder
}

/// Store over a shared fetcher, plus the session store it persists to.
pub fn store_with(
    fetcher: Arc<ScriptedFetcher>,
) -> (MessagesStore<Arc<ScriptedFetcher>>, Arc<MemoryStore>) {
    let session = Arc::new(MemoryStore::new());
    let store = MessagesStore::new(
        fetcher,
        memory_token("xoxp-test"),
        Arc::clone(&session) as Arc<dyn KeyValueStore>,
    );
    (store, session)
}
