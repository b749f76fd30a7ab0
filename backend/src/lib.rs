//! Backend library modules.
//!
//! A write-through user cache in front of the record store, and a periodic
//! explorer that mirrors public memos of externally hosted users.

pub mod config;
pub mod domain;
pub mod outbound;

pub use config::ExplorerSettings;
