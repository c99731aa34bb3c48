use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};

use crate::config::ApiConfig;
use crate::model::FetchPage;

use super::error::FetchError;
use super::fetcher::{FetchQuery, MessageFetcher};

/// Characters left as-is by `encodeURIComponent`; everything else is
/// percent-encoded, so a space becomes `%20` rather than `+`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn build_http_client(config: &ApiConfig) -> Result<Client, FetchError> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)));
    if let Some(secs) = config.request_timeout_seconds {
        builder = builder.timeout(Duration::from_secs(u64::from(secs)));
    }
    builder.build().map_err(FetchError::Client)
}

fn parse_endpoint(raw: String) -> Result<Url, FetchError> {
    Url::parse(&raw).map_err(|e| FetchError::InvalidUrl {
        reason: e.to_string(),
        url: raw,
    })
}

/// Client for the paginated message listing.
#[derive(Debug, Clone)]
pub struct MessagesApi {
    http: Client,
    endpoint: Url,
}

impl MessagesApi {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http: build_http_client(config)?,
            endpoint: parse_endpoint(config.messages_url())?,
        })
    }

    /// URL for `query`: `search` (only when non-empty), `sort`, then
    /// `cursor` (only when present). Values are percent-encoded.
    pub fn request_url(&self, query: &FetchQuery) -> Url {
        let mut params = Vec::with_capacity(3);
        if !query.search_term.is_empty() {
            params.push(format!(
                "search={}",
                utf8_percent_encode(&query.search_term, QUERY_COMPONENT)
            ));
        }
        params.push(format!("sort={}", query.sort_order.as_str()));
        if let Some(cursor) = query.cursor.as_deref() {
            params.push(format!(
                "cursor={}",
                utf8_percent_encode(cursor, QUERY_COMPONENT)
            ));
        }

        let mut url = self.endpoint.clone();
        url.set_query(Some(&params.join("&")));
        url
    }
}

impl MessageFetcher for MessagesApi {
    async fn fetch(&self, token: &str, query: &FetchQuery) -> Result<FetchPage, FetchError> {
        let url = self.request_url(query);

        tracing::debug!(
            sort = %query.sort_order,
            search = !query.search_term.is_empty(),
            cursor = query.cursor.is_some(),
            "Fetching message page"
        );

        let response = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        let page: FetchPage = serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            status,
            source: e,
        })?;

        tracing::debug!(
            status,
            count = page.messages.len(),
            next_cursor = page.next_cursor.is_some(),
            "Received message page"
        );

        Ok(page)
    }
}

/// Outcome of a token check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValidity {
    Valid,
    Rejected { status: u16 },
}

impl TokenValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenValidity::Valid)
    }
}

/// Client for the token check endpoint.
#[derive(Debug, Clone)]
pub struct AuthApi {
    http: Client,
    endpoint: Url,
}

impl AuthApi {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http: build_http_client(config)?,
            endpoint: parse_endpoint(config.validate_url())?,
        })
    }

    /// Ask the server whether `token` is accepted. Any 2xx is valid.
    pub async fn validate_token(&self, token: &str) -> Result<TokenValidity, FetchError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .header(AUTHORIZATION, token)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: self.endpoint.to_string(),
                source: e,
            })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Token check finished");

        if status.is_success() {
            Ok(TokenValidity::Valid)
        } else {
            Ok(TokenValidity::Rejected {
                status: status.as_u16(),
            })
        }
    }
}
