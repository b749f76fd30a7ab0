//! Memo records created locally or mirrored from a remote service.

use std::fmt;

use super::user::{RowStatus, UserId};

/// Store-assigned memo identifier.
pub type MemoId = i32;

/// Audience allowed to read a memo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Creator only.
    #[default]
    Private,
    /// Signed-in users of this instance.
    Protected,
    /// Everyone.
    Public,
}

impl Visibility {
    /// Wire form used by stores.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Protected => "PROTECTED",
            Self::Public => "PUBLIC",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted memo row.
///
/// On creation `id` is ignored and assigned by the store. Zero timestamps are
/// stamped with the store clock; any other value is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memo {
    /// Store-assigned identifier.
    pub id: MemoId,
    /// Lifecycle flag.
    pub row_status: RowStatus,
    /// Owning local user.
    pub creator_id: UserId,
    /// Creation time in epoch seconds.
    pub created_ts: i64,
    /// Last update time in epoch seconds.
    pub updated_ts: i64,
    /// Opaque body text.
    pub content: String,
    /// Read audience.
    pub visibility: Visibility,
}
