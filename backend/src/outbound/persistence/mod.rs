//! Record store adapters.
//!
//! Adapters are thin translators between domain rows and their storage
//! representation. They contain no business logic; cache discipline lives
//! in [`crate::domain::Store`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use memo_backend::domain::Store;
//! use memo_backend::outbound::persistence::InMemoryRecordStore;
//!
//! let store = Store::new(Arc::new(InMemoryRecordStore::default()));
//! assert!(store.user_cache().is_empty());
//! ```

mod in_memory_record_store;

pub use in_memory_record_store::InMemoryRecordStore;
