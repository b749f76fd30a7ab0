//! Driven port for fetching public memos from a remote memo service.
//!
//! The domain decides which account to ask for and how many memos; adapters
//! own URL layout, transport, and decoding.

use async_trait::async_trait;
use url::Url;

use crate::domain::RowStatus;

use super::define_port_error;

/// Bounded memo query against one remote account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMemoQuery {
    /// Base address of the remote service (scheme, host and port are used).
    pub base: Url,
    /// Bare account name on the remote service.
    pub creator_username: String,
    /// Lifecycle filter applied remotely.
    pub row_status: RowStatus,
    /// Maximum number of memos returned.
    pub limit: u32,
}

/// One memo as published by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMemo {
    /// Body text.
    pub content: String,
    /// Remote creation time in epoch seconds.
    pub created_ts: i64,
    /// Remote update time in epoch seconds.
    pub updated_ts: i64,
}

define_port_error! {
    /// Errors surfaced while calling a remote memo service.
    pub enum RemoteMemoSourceError {
        /// Connection failed or the body could not be read.
        Transport { message: String } =>
            "remote memo transport failed: {message}",
        /// Request exceeded its timeout.
        Timeout { message: String } =>
            "remote memo request timed out: {message}",
        /// Remote service answered with a non-success status.
        Status { status: u16, message: String } =>
            "remote memo service returned status {status}: {message}",
        /// Response body was not a memo list.
        Decode { message: String } =>
            "remote memo response decode failed: {message}",
        /// Adapter could not build a request from the query.
        InvalidRequest { message: String } =>
            "remote memo request invalid: {message}",
    }
}

impl RemoteMemoSourceError {
    /// Whether the failure came from the body rather than the exchange.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Port for listing a remote account's public memos.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteMemoSource: Send + Sync {
    /// Fetch at most `query.limit` memos, in the remote service's order.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let memos = source.fetch_memos(&query).await?;
    /// assert!(memos.len() <= query.limit as usize);
    /// # Ok::<(), memo_backend::domain::ports::RemoteMemoSourceError>(())
    /// ```
    async fn fetch_memos(
        &self,
        query: &RemoteMemoQuery,
    ) -> Result<Vec<RemoteMemo>, RemoteMemoSourceError>;
}
