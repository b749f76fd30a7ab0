//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: record store adapters
//! - **memo_source**: reqwest client for remote memo services
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memo_source;
pub mod persistence;
