//! Periodic federation sync for externally hosted users.
//!
//! Every tick the explorer lists users with [`crate::domain::Role::External`],
//! then for each one in list order fetches a small page of public memos from
//! the remote service named by its address and stores them as local
//! protected memos.
//!
//! A pass stops at the first failing user. Users earlier in the list keep
//! their committed memos; later users wait for the next tick. Ingestion has
//! no deduplication key, so a remote feed that does not change produces a
//! fresh copy of its memos on every pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domain::ports::{RemoteMemoQuery, RemoteMemoSource};
use crate::domain::{FindUser, Memo, RowStatus, Store, User, Visibility};

mod address;
mod error;

pub use address::{AddressError, ExternalAccount, USER_PATH_PREFIX};
pub use error::{ExplorerError, SyncErrorKind, SyncUserError};

/// Default delay between passes.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(10 * 60);
/// Default number of remote memos requested per user and pass.
pub const DEFAULT_FETCH_LIMIT: u32 = 2;

/// Explorer cadence and fetch bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Delay between passes. The first pass runs one interval after start.
    pub interval: Duration,
    /// Memos requested per user and pass.
    pub fetch_limit: u32,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SYNC_INTERVAL,
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }
}

/// Lifecycle of the explorer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Built but not started.
    Idle,
    /// Waiting for the next tick.
    Waiting,
    /// Running a pass.
    Running,
    /// Cancelled; no further passes run.
    Stopped,
}

/// Totals for one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// External users mirrored without error.
    pub users_synced: usize,
    /// Local memos created.
    pub memos_created: usize,
}

/// Background synchroniser for external users.
pub struct Explorer {
    store: Arc<Store>,
    source: Arc<dyn RemoteMemoSource>,
    config: ExplorerConfig,
    state: watch::Sender<SchedulerState>,
}

impl Explorer {
    /// Build an explorer with the default ten-minute cadence.
    pub fn new(store: Arc<Store>, source: Arc<dyn RemoteMemoSource>) -> Self {
        Self::with_config(store, source, ExplorerConfig::default())
    }

    /// Build an explorer with explicit cadence and fetch bounds.
    pub fn with_config(
        store: Arc<Store>,
        source: Arc<dyn RemoteMemoSource>,
        config: ExplorerConfig,
    ) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            store,
            source,
            config,
            state,
        }
    }

    /// Observe lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Run passes on a fixed interval until `cancel` fires.
    ///
    /// Cancellation is observed while waiting for a tick and before each
    /// pass. A pass already running is not interrupted.
    ///
    /// ```rust,ignore
    /// let cancel = CancellationToken::new();
    /// let handle = tokio::spawn({
    ///     let explorer = Arc::clone(&explorer);
    ///     let cancel = cancel.clone();
    ///     async move { explorer.run(cancel).await }
    /// });
    /// cancel.cancel();
    /// handle.await?;
    /// ```
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            "running explorer in background"
        );

        let period = self.config.interval.max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.state.send_replace(SchedulerState::Waiting);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            if cancel.is_cancelled() {
                break;
            }

            self.state.send_replace(SchedulerState::Running);
            match self.sync_all_external_users().await {
                Ok(report) => info!(
                    users_synced = report.users_synced,
                    memos_created = report.memos_created,
                    "explorer pass complete"
                ),
                Err(err) => error!(
                    error = %err,
                    kind = err.kind().as_str(),
                    user_id = err.user_id(),
                    "fail to explore external user"
                ),
            }
            self.state.send_replace(SchedulerState::Waiting);
        }

        self.state.send_replace(SchedulerState::Stopped);
        info!("stop explorer graceful");
    }

    /// Run one pass over every external user, in list order.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::ListExternalUsers`] when listing fails and
    /// [`ExplorerError::SyncUser`] for the first user that fails; users after
    /// it are not attempted.
    pub async fn sync_all_external_users(&self) -> Result<SyncReport, ExplorerError> {
        let users = self
            .store
            .list_users(&FindUser::external())
            .await
            .map_err(ExplorerError::ListExternalUsers)?;
        debug!(user_count = users.len(), "listed external users");

        let mut report = SyncReport::default();
        for user in &users {
            let created = self
                .sync_external_user(user)
                .await
                .map_err(|source| ExplorerError::SyncUser {
                    user_id: user.id,
                    source,
                })?;
            report.users_synced += 1;
            report.memos_created += created;
        }
        Ok(report)
    }

    /// Mirror one external user's latest remote memos. Returns the number of
    /// memos created.
    ///
    /// # Errors
    ///
    /// Returns [`SyncUserError::Parse`] without any network call when the
    /// address is malformed, [`SyncUserError::Fetch`] when the remote call
    /// fails, and [`SyncUserError::SaveMemo`] on the first memo the store
    /// rejects. Memos stored before a rejection stay committed.
    pub async fn sync_external_user(&self, user: &User) -> Result<usize, SyncUserError> {
        let account =
            ExternalAccount::parse(&user.username).map_err(|source| SyncUserError::Parse {
                address: user.username.clone(),
                source,
            })?;

        let query = RemoteMemoQuery {
            base: account.address,
            creator_username: account.username,
            row_status: RowStatus::Normal,
            limit: self.config.fetch_limit,
        };
        let remote_memos = self.source.fetch_memos(&query).await?;

        for remote in &remote_memos {
            let create = Memo {
                creator_id: user.id,
                created_ts: remote.created_ts,
                updated_ts: remote.updated_ts,
                content: remote.content.clone(),
                visibility: Visibility::Protected,
                ..Memo::default()
            };
            self.store.create_memo(&create).await?;
        }

        debug!(
            user_id = user.id,
            creator_username = %query.creator_username,
            memo_count = remote_memos.len(),
            "mirrored external user memos"
        );
        Ok(remote_memos.len())
    }
}
