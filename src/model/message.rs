use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp::parse_timestamp;

/// Author descriptor attached to every message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default)]
    pub real_name: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub tz: Option<String>,
    /// Offset from UTC in seconds.
    #[serde(default)]
    pub tz_offset: Option<i32>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Author {
    /// Name to show in listings: the display name, falling back to the
    /// real name and finally the id.
    pub fn label(&self) -> &str {
        if !self.display_name.is_empty() {
            return &self.display_name;
        }
        match self.real_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

/// A single archived message. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub id: String,
    pub ts: String,
    #[serde(default)]
    pub text: String,
    pub author: Author,
}

impl Message {
    /// Point in time of `ts`, or `None` when it cannot be parsed.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.ts)
    }
}

/// One page returned by the message endpoint.
///
/// A missing `next_cursor` means there are no further pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchPage {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl FetchPage {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_record() {
        let raw = r#"{
            "type": "message",
            "id": "m-1",
            "ts": "2024-01-02T10:00:00Z",
            "text": "hello",
            "author": {
                "id": "U1",
                "real_name": null,
                "display_name": "ada",
                "avatar": "https://example.com/a.png",
                "is_bot": false,
                "tz": "Europe/London",
                "tz_offset": 0,
                "color": "9f69e7"
            }
        }"#;

        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.kind.as_deref(), Some("message"));
        assert_eq!(msg.id, "m-1");
        assert_eq!(msg.author.label(), "ada");
        assert_eq!(msg.author.tz_offset, Some(0));
        assert!(msg.time().is_some());
    }

    #[test]
    fn page_without_messages_key_is_empty() {
        let page: FetchPage = serde_json::from_str(r#"{"next_cursor": "c1"}"#).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.next_cursor.as_deref(), Some("c1"));
    }

    #[test]
    fn author_label_falls_back() {
        let author = Author {
            id: "U9".to_string(),
            real_name: Some("Grace Hopper".to_string()),
            display_name: String::new(),
            avatar: String::new(),
            is_bot: false,
            tz: None,
            tz_offset: None,
            color: None,
        };
        assert_eq!(author.label(), "Grace Hopper");

        let anonymous = Author {
            real_name: None,
            ..author
        };
        assert_eq!(anonymous.label(), "U9");
    }
}
