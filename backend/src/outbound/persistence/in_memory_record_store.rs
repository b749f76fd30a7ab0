//! Process-local record store.
//!
//! Rows live behind one mutex. Users are returned in ascending identifier
//! order, which is this store's native order. Usernames are unique.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{RecordStore, RecordStoreError};
use crate::domain::{DeleteUser, FindUser, Memo, MemoId, UpdateUser, User, UserId};

#[derive(Default)]
struct Rows {
    users: Vec<User>,
    memos: Vec<Memo>,
    last_user_id: UserId,
    last_memo_id: MemoId,
}

/// Record store adapter keeping every row in memory.
pub struct InMemoryRecordStore {
    rows: Mutex<Rows>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryRecordStore {
    /// Build an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Mutex::new(Rows::default()),
            clock,
        }
    }

    /// Memos owned by `creator_id`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Connection`] when the row lock is poisoned.
    pub fn list_memos(&self, creator_id: UserId) -> Result<Vec<Memo>, RecordStoreError> {
        let rows = self.lock()?;
        Ok(rows
            .memos
            .iter()
            .filter(|memo| memo.creator_id == creator_id)
            .cloned()
            .collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Rows>, RecordStoreError> {
        self.rows
            .lock()
            .map_err(|_| RecordStoreError::connection("in-memory store lock poisoned"))
    }

    fn now(&self) -> i64 {
        self.clock.utc().timestamp()
    }
}

fn ensure_username_free(
    rows: &Rows,
    username: &str,
    except: Option<UserId>,
) -> Result<(), RecordStoreError> {
    let taken = rows
        .users
        .iter()
        .any(|user| user.username == username && Some(user.id) != except);
    if taken {
        return Err(RecordStoreError::conflict(format!(
            "username {username:?} already exists"
        )));
    }
    Ok(())
}

fn stamp(value: i64, now: i64) -> i64 {
    if value == 0 { now } else { value }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create_user(&self, create: &User) -> Result<User, RecordStoreError> {
        let now = self.now();
        let mut rows = self.lock()?;
        ensure_username_free(&rows, &create.username, None)?;

        rows.last_user_id += 1;
        let user = User {
            id: rows.last_user_id,
            created_ts: stamp(create.created_ts, now),
            updated_ts: stamp(create.updated_ts, now),
            ..create.clone()
        };
        rows.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, update: &UpdateUser) -> Result<User, RecordStoreError> {
        let now = self.now();
        let mut rows = self.lock()?;
        if let Some(username) = &update.username {
            ensure_username_free(&rows, username, Some(update.id))?;
        }

        let user = rows
            .users
            .iter_mut()
            .find(|user| user.id == update.id)
            .ok_or_else(|| RecordStoreError::not_found(format!("user {}", update.id)))?;
        update.apply_to(user);
        if update.updated_ts.is_none() {
            user.updated_ts = now;
        }
        Ok(user.clone())
    }

    async fn list_users(&self, find: &FindUser) -> Result<Vec<User>, RecordStoreError> {
        let rows = self.lock()?;
        Ok(rows
            .users
            .iter()
            .filter(|user| find.matches(user))
            .cloned()
            .collect())
    }

    async fn delete_user(&self, delete: &DeleteUser) -> Result<(), RecordStoreError> {
        let mut rows = self.lock()?;
        let before = rows.users.len();
        rows.users.retain(|user| user.id != delete.id);
        if rows.users.len() == before {
            return Err(RecordStoreError::not_found(format!("user {}", delete.id)));
        }
        Ok(())
    }

    async fn create_memo(&self, create: &Memo) -> Result<Memo, RecordStoreError> {
        let now = self.now();
        let mut rows = self.lock()?;

        rows.last_memo_id += 1;
        let memo = Memo {
            id: rows.last_memo_id,
            created_ts: stamp(create.created_ts, now),
            updated_ts: stamp(create.updated_ts, now),
            ..create.clone()
        };
        rows.memos.push(memo.clone());
        Ok(memo)
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour of the in-memory adapter.

    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{Role, RowStatus, Visibility};

    const NOW: i64 = 1_700_000_000;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[fixture]
    fn store() -> InMemoryRecordStore {
        let now = Utc
            .timestamp_opt(NOW, 0)
            .single()
            .expect("valid fixture time");
        InMemoryRecordStore::new(Arc::new(FixedClock(now)))
    }

    fn user(username: &str, role: Role) -> User {
        User {
            username: username.to_owned(),
            role,
            ..User::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn assigns_ids_and_timestamps(store: InMemoryRecordStore) {
        let first = store
            .create_user(&user("host", Role::Host))
            .await
            .expect("create host");
        let second = store
            .create_user(&user("https://remote.example/u/alice", Role::External))
            .await
            .expect("create external");

        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(first.created_ts, NOW);
        assert_eq!(first.updated_ts, NOW);
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_duplicate_usernames(store: InMemoryRecordStore) {
        store
            .create_user(&user("alice", Role::User))
            .await
            .expect("first create");

        let error = store
            .create_user(&user("alice", Role::User))
            .await
            .expect_err("duplicate rejected");

        assert!(matches!(error, RecordStoreError::Conflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn lists_in_id_order_with_filters(store: InMemoryRecordStore) {
        for (name, role) in [
            ("https://a.example/u/a", Role::External),
            ("local", Role::User),
            ("https://b.example/u/b", Role::External),
        ] {
            store.create_user(&user(name, role)).await.expect("create");
        }

        let external = store
            .list_users(&FindUser::external())
            .await
            .expect("list external");

        let ids = external.iter().map(|u| u.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_applies_partial_fields(store: InMemoryRecordStore) {
        let created = store
            .create_user(&user("alice", Role::User))
            .await
            .expect("create");

        let updated = store
            .update_user(&UpdateUser {
                row_status: Some(RowStatus::Archived),
                ..UpdateUser::new(created.id)
            })
            .await
            .expect("update");

        assert_eq!(updated.row_status, RowStatus::Archived);
        assert_eq!(updated.username, "alice");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_rows_are_reported(store: InMemoryRecordStore) {
        let update = store.update_user(&UpdateUser::new(9)).await;
        let delete = store.delete_user(&DeleteUser { id: 9 }).await;

        assert!(matches!(update, Err(RecordStoreError::NotFound { .. })));
        assert!(matches!(delete, Err(RecordStoreError::NotFound { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn memo_timestamps_are_kept_unless_zero(store: InMemoryRecordStore) {
        let remote = store
            .create_memo(&Memo {
                creator_id: 1,
                created_ts: 100,
                updated_ts: 200,
                content: "hi".to_owned(),
                visibility: Visibility::Protected,
                ..Memo::default()
            })
            .await
            .expect("create remote memo");
        let local = store
            .create_memo(&Memo {
                creator_id: 1,
                content: "local".to_owned(),
                ..Memo::default()
            })
            .await
            .expect("create local memo");

        assert_eq!((remote.created_ts, remote.updated_ts), (100, 200));
        assert_eq!((local.created_ts, local.updated_ts), (NOW, NOW));
        assert_eq!(
            store.list_memos(1).expect("list memos"),
            vec![remote, local]
        );
    }
}
