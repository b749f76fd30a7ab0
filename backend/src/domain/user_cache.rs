//! In-process user overlay keyed by identifier.
//!
//! The cache is never the source of truth. [`crate::domain::Store`] writes to
//! it only after the record store accepted a mutation, so an entry always
//! mirrors the last successful durable state for that key. There is no
//! capacity bound or expiry; entries leave only on explicit delete.

use dashmap::DashMap;

use super::user::{User, UserId};

/// Concurrent map from user identifier to the last written row.
#[derive(Debug, Default)]
pub struct UserCache {
    entries: DashMap<UserId, User>,
}

impl UserCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the entry for `id`.
    pub fn store(&self, id: UserId, user: User) {
        self.entries.insert(id, user);
    }

    /// Return the last stored value for `id`, if any.
    ///
    /// # Examples
    /// ```
    /// use memo_backend::domain::{User, UserCache};
    ///
    /// let cache = UserCache::new();
    /// assert!(cache.load(1).is_none());
    /// cache.store(1, User { id: 1, ..User::default() });
    /// assert_eq!(cache.load(1).map(|user| user.id), Some(1));
    /// ```
    pub fn load(&self, id: UserId) -> Option<User> {
        self.entries.get(&id).map(|entry| entry.value().clone())
    }

    /// Drop the entry for `id`.
    pub fn delete(&self, id: UserId) {
        self.entries.remove(&id);
    }

    /// Number of cached users.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no users.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
