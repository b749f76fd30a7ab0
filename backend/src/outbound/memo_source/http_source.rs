//! Reqwest-backed remote memo source adapter.
//!
//! This adapter owns transport details only: URL layout, timeout and HTTP
//! error mapping, and JSON decoding into domain memos.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::RemoteMemoDto;
use crate::domain::ports::{
    RemoteMemo, RemoteMemoQuery, RemoteMemoSource, RemoteMemoSourceError,
};

/// Remote resource listing memos.
pub const MEMO_API_PATH: &str = "/api/v1/memo";
/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);
const DEFAULT_USER_AGENT: &str = "memo-backend-explorer/0.1";

/// Remote memo source issuing one bounded GET per query.
pub struct HttpMemoSource {
    client: Client,
}

impl HttpMemoSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let source = HttpMemoSource::new(Duration::from_secs(1))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RemoteMemoSource for HttpMemoSource {
    async fn fetch_memos(
        &self,
        query: &RemoteMemoQuery,
    ) -> Result<Vec<RemoteMemo>, RemoteMemoSourceError> {
        let url = memo_list_url(query)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_memos(body.as_ref())
    }
}

/// Build `<base>/api/v1/memo?creatorUsername=..&rowStatus=..&limit=..`.
///
/// Only scheme, authority and port of `query.base` survive; its path, query
/// and fragment are replaced.
pub(super) fn memo_list_url(query: &RemoteMemoQuery) -> Result<Url, RemoteMemoSourceError> {
    if query.base.cannot_be_a_base() {
        return Err(RemoteMemoSourceError::invalid_request(format!(
            "{} cannot be used as a base address",
            query.base
        )));
    }

    let mut url = query.base.clone();
    url.set_path(MEMO_API_PATH);
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair("creatorUsername", &query.creator_username)
        .append_pair("rowStatus", query.row_status.as_str())
        .append_pair("limit", &query.limit.to_string());
    Ok(url)
}

fn parse_memos(body: &[u8]) -> Result<Vec<RemoteMemo>, RemoteMemoSourceError> {
    let decoded: Vec<RemoteMemoDto> = serde_json::from_slice(body).map_err(|error| {
        RemoteMemoSourceError::decode(format!("invalid memo list payload: {error}"))
    })?;
    Ok(decoded.into_iter().map(RemoteMemo::from).collect())
}

fn map_transport_error(error: reqwest::Error) -> RemoteMemoSourceError {
    if error.is_timeout() {
        RemoteMemoSourceError::timeout(error.to_string())
    } else if error.is_decode() {
        RemoteMemoSourceError::decode(error.to_string())
    } else {
        RemoteMemoSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RemoteMemoSourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_owned()
    } else {
        preview
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RemoteMemoSourceError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => RemoteMemoSourceError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
