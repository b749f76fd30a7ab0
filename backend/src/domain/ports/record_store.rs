//! Driven port for the authoritative durable record store.
//!
//! The store is the single source of truth for users and memos. The domain
//! only reaches it through this narrow command/query surface; caching is
//! layered on top by [`crate::domain::Store`].

use async_trait::async_trait;

use crate::domain::{DeleteUser, FindUser, Memo, UpdateUser, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record store adapters.
    pub enum RecordStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "record store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "record store query failed: {message}",
        /// Mutation targeted a row that does not exist.
        NotFound { message: String } => "record store row not found: {message}",
        /// Mutation violated a uniqueness constraint.
        Conflict { message: String } => "record store conflict: {message}",
    }
}

/// Port for reading and writing user and memo rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a user and return the stored row with its assigned identifier.
    async fn create_user(&self, create: &User) -> Result<User, RecordStoreError>;

    /// Apply a partial update and return the resulting row.
    async fn update_user(&self, update: &UpdateUser) -> Result<User, RecordStoreError>;

    /// List users matching `find` in the store's native order.
    async fn list_users(&self, find: &FindUser) -> Result<Vec<User>, RecordStoreError>;

    /// Remove one user.
    async fn delete_user(&self, delete: &DeleteUser) -> Result<(), RecordStoreError>;

    /// Insert a memo and return the stored row with its assigned identifier.
    async fn create_memo(&self, create: &Memo) -> Result<Memo, RecordStoreError>;
}
