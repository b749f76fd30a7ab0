//! Write-through facade over the record store and the user cache.
//!
//! Every user mutation reaches the record store first; the cache is touched
//! only after the store accepted it. Reads through [`Store::list_users`]
//! refresh the cache, and point lookups by identifier are served from it
//! when possible.

use std::sync::Arc;

use tracing::debug;

use super::ports::{RecordStore, RecordStoreError};
use super::user_cache::UserCache;
use super::{DeleteUser, FindUser, Memo, UpdateUser, User};

/// Sanctioned read/write path for users and the memo creation path.
pub struct Store {
    driver: Arc<dyn RecordStore>,
    user_cache: UserCache,
}

impl Store {
    /// Wrap `driver` with an empty user cache.
    pub fn new(driver: Arc<dyn RecordStore>) -> Self {
        Self {
            driver,
            user_cache: UserCache::new(),
        }
    }

    /// Read-only view of the user cache.
    pub fn user_cache(&self) -> &UserCache {
        &self.user_cache
    }

    /// Create a user and cache the stored row.
    ///
    /// # Errors
    ///
    /// Returns the record store error; the cache is left untouched.
    pub async fn create_user(&self, create: &User) -> Result<User, RecordStoreError> {
        let user = self.driver.create_user(create).await?;
        self.user_cache.store(user.id, user.clone());
        Ok(user)
    }

    /// Apply a partial update and cache the resulting row.
    ///
    /// # Errors
    ///
    /// Returns the record store error; the cache is left untouched.
    pub async fn update_user(&self, update: &UpdateUser) -> Result<User, RecordStoreError> {
        let user = self.driver.update_user(update).await?;
        self.user_cache.store(user.id, user.clone());
        Ok(user)
    }

    /// List users matching `find`, refreshing the cache with every row.
    ///
    /// # Errors
    ///
    /// Returns the record store error; the cache is left untouched.
    pub async fn list_users(&self, find: &FindUser) -> Result<Vec<User>, RecordStoreError> {
        let list = self.driver.list_users(find).await?;
        for user in &list {
            self.user_cache.store(user.id, user.clone());
        }
        Ok(list)
    }

    /// Return the first user matching `find`.
    ///
    /// When `find` names an identifier that is cached, the cached row is
    /// returned without querying the store, even if other constraints are
    /// present. Otherwise the first listed row wins, in store order.
    ///
    /// # Errors
    ///
    /// Returns the record store error raised by the listing.
    pub async fn get_user(&self, find: &FindUser) -> Result<Option<User>, RecordStoreError> {
        if let Some(id) = find.id
            && let Some(cached) = self.user_cache.load(id)
        {
            debug!(user_id = id, "user cache hit");
            return Ok(Some(cached));
        }

        let list = self.list_users(find).await?;
        let Some(user) = list.into_iter().next() else {
            return Ok(None);
        };
        self.user_cache.store(user.id, user.clone());
        Ok(Some(user))
    }

    /// Delete a user and evict it from the cache.
    ///
    /// # Errors
    ///
    /// Returns the record store error; the cache is left untouched.
    pub async fn delete_user(&self, delete: &DeleteUser) -> Result<(), RecordStoreError> {
        self.driver.delete_user(delete).await?;
        self.user_cache.delete(delete.id);
        Ok(())
    }

    /// Create a memo. Memos are not cached.
    ///
    /// # Errors
    ///
    /// Returns the record store error.
    pub async fn create_memo(&self, create: &Memo) -> Result<Memo, RecordStoreError> {
        self.driver.create_memo(create).await
    }
}
