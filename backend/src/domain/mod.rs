//! Domain primitives, the user cache, and the federation explorer.
//!
//! Purpose: Define the user and memo rows shared by every adapter, the
//! write-through [`Store`] facade, and the [`explorer`] that mirrors memos of
//! externally hosted users.
//!
//! Public surface:
//! - User, Role, RowStatus, and the user query descriptors.
//! - Memo and Visibility.
//! - UserCache and Store.
//! - explorer::Explorer and its configuration, state, and errors.

pub mod explorer;
pub mod memo;
pub mod ports;
pub mod store;
pub mod user;
pub mod user_cache;

pub use self::explorer::{
    Explorer, ExplorerConfig, ExplorerError, SchedulerState, SyncErrorKind, SyncReport,
    SyncUserError,
};
pub use self::memo::{Memo, MemoId, Visibility};
pub use self::store::Store;
pub use self::user::{DeleteUser, FindUser, Role, RowStatus, UpdateUser, User, UserId};
pub use self::user_cache::UserCache;
