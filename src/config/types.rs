use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote archive endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the archive API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the paginated message listing.
    #[serde(default = "default_messages_path")]
    pub messages_path: String,
    /// Path of the token check endpoint.
    #[serde(default = "default_validate_path")]
    pub validate_path: String,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Whole-request timeout in seconds. Unset means no limit.
    #[serde(default)]
    pub request_timeout_seconds: Option<u32>,
}

/// Where durable state (the auth token) lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://dzv1rhjtsh.execute-api.us-west-2.amazonaws.com/prod".to_string()
}

fn default_messages_path() -> String {
    "/db-messages".to_string()
}

fn default_validate_path() -> String {
    "/validate".to_string()
}

fn default_connect_timeout() -> u32 {
    5
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            messages_path: default_messages_path(),
            validate_path: default_validate_path(),
            connect_timeout_seconds: default_connect_timeout(),
            request_timeout_seconds: None,
        }
    }
}

impl ApiConfig {
    /// Full URL of the message listing endpoint.
    pub fn messages_url(&self) -> String {
        join_url(&self.base_url, &self.messages_path)
    }

    /// Full URL of the token check endpoint.
    pub fn validate_url(&self) -> String {
        join_url(&self.base_url, &self.validate_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

impl StorageConfig {
    /// Directory for the durable store.
    ///
    /// Uses `data_dir` when set, otherwise `msgbrowse` under the platform
    /// data directory, falling back to `./.msgbrowse`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("msgbrowse"))
            .unwrap_or_else(|| PathBuf::from(".msgbrowse"))
    }
}
