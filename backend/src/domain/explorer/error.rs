//! Failures raised while mirroring external users.
//!
//! None of these stop the explorer loop; they abort the current pass and are
//! logged, and the next tick starts over.

use thiserror::Error;

use super::AddressError;
use crate::domain::UserId;
use crate::domain::ports::{RecordStoreError, RemoteMemoSourceError};

/// Coarse failure category used for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    /// The external address could not be parsed.
    Parse,
    /// The remote exchange failed or timed out.
    Network,
    /// The remote body was not a memo list.
    Decode,
    /// The record store rejected a read or write.
    Store,
}

impl SyncErrorKind {
    /// Stable label for structured logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Network => "network",
            Self::Decode => "decode",
            Self::Store => "store",
        }
    }
}

/// Failure while mirroring one external user.
#[derive(Debug, Error)]
pub enum SyncUserError {
    /// Username is not a usable remote address.
    #[error("fail to parse external user address {address:?}: {source}")]
    Parse {
        /// Raw address that failed to parse.
        address: String,
        /// Underlying parse error.
        source: AddressError,
    },
    /// Remote memos could not be fetched.
    #[error("fail to request external user memos: {0}")]
    Fetch(#[from] RemoteMemoSourceError),
    /// A mirrored memo could not be stored.
    #[error("fail to save memo for external user: {0}")]
    SaveMemo(#[from] RecordStoreError),
}

impl SyncUserError {
    /// Failure category.
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            Self::Parse { .. } => SyncErrorKind::Parse,
            Self::Fetch(error) if error.is_decode() => SyncErrorKind::Decode,
            Self::Fetch(_) => SyncErrorKind::Network,
            Self::SaveMemo(_) => SyncErrorKind::Store,
        }
    }
}

/// Failure that aborted a synchronisation pass.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// External users could not be listed.
    #[error("fail to fetch external users list: {0}")]
    ListExternalUsers(#[source] RecordStoreError),
    /// One external user failed; later users were not attempted.
    #[error("fail to sync user ID={user_id}: {source}")]
    SyncUser {
        /// Local identifier of the failing user.
        user_id: UserId,
        /// Underlying failure.
        source: SyncUserError,
    },
}

impl ExplorerError {
    /// Failure category.
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            Self::ListExternalUsers(_) => SyncErrorKind::Store,
            Self::SyncUser { source, .. } => source.kind(),
        }
    }

    /// Local identifier of the user that aborted the pass, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::ListExternalUsers(_) => None,
            Self::SyncUser { user_id, .. } => Some(*user_id),
        }
    }
}
