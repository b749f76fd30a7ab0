//! User records and the query descriptors used against the record store.
//!
//! External users overload `username` with the address of their account on a
//! remote memo service, for example `https://remote.example/u/alice`.

use std::fmt;
use std::str::FromStr;

/// Store-assigned user identifier.
pub type UserId = i32;

/// Lifecycle flag carried by persisted rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RowStatus {
    /// Live row.
    #[default]
    Normal,
    /// Archived row, hidden from ordinary listings.
    Archived,
}

impl RowStatus {
    /// Wire form used by stores and remote queries.
    ///
    /// # Examples
    /// ```
    /// use memo_backend::domain::RowStatus;
    ///
    /// assert_eq!(RowStatus::Normal.as_str(), "NORMAL");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role granted to a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// Instance owner.
    Host,
    /// Administrator.
    Admin,
    /// Ordinary local user.
    #[default]
    User,
    /// User whose content is authored on a remote service.
    External,
}

impl Role {
    /// Wire form used by stores.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Host => "HOST",
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::External => "EXTERNAL",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    /// Parse a stored role. Unknown values fall back to [`Role::User`].
    ///
    /// # Examples
    /// ```
    /// use memo_backend::domain::Role;
    ///
    /// assert_eq!("EXTERNAL".parse::<Role>(), Ok(Role::External));
    /// assert_eq!("SUPERUSER".parse::<Role>(), Ok(Role::User));
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "HOST" => Self::Host,
            "ADMIN" => Self::Admin,
            "EXTERNAL" => Self::External,
            _ => Self::User,
        })
    }
}

/// Persisted user row.
///
/// Profile fields other than `role` and `username` are opaque here and are
/// passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Lifecycle flag.
    pub row_status: RowStatus,
    /// Creation time in epoch seconds.
    pub created_ts: i64,
    /// Last update time in epoch seconds.
    pub updated_ts: i64,
    /// Plain handle, or the remote account address for external users.
    pub username: String,
    /// Granted role.
    pub role: Role,
    /// Contact email.
    pub email: String,
    /// Display nickname.
    pub nickname: String,
    /// Opaque password hash.
    pub password_hash: String,
    /// Avatar location.
    pub avatar_url: String,
}

/// Partial update applied to one user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    /// Target user.
    pub id: UserId,
    /// New update timestamp.
    pub updated_ts: Option<i64>,
    /// New lifecycle flag.
    pub row_status: Option<RowStatus>,
    /// New username.
    pub username: Option<String>,
    /// New role.
    pub role: Option<Role>,
    /// New email.
    pub email: Option<String>,
    /// New nickname.
    pub nickname: Option<String>,
    /// New avatar location.
    pub avatar_url: Option<String>,
    /// New password hash.
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// Start an empty update for `id`.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Apply every present field to `user`.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(updated_ts) = self.updated_ts {
            user.updated_ts = updated_ts;
        }
        if let Some(row_status) = self.row_status {
            user.row_status = row_status;
        }
        if let Some(username) = &self.username {
            user.username.clone_from(username);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(nickname) = &self.nickname {
            user.nickname.clone_from(nickname);
        }
        if let Some(avatar_url) = &self.avatar_url {
            user.avatar_url.clone_from(avatar_url);
        }
        if let Some(password_hash) = &self.password_hash {
            user.password_hash.clone_from(password_hash);
        }
    }
}

/// Immutable user query. Every present field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindUser {
    /// Match on identifier.
    pub id: Option<UserId>,
    /// Match on lifecycle flag.
    pub row_status: Option<RowStatus>,
    /// Match on username.
    pub username: Option<String>,
    /// Match on role.
    pub role: Option<Role>,
    /// Match on email.
    pub email: Option<String>,
    /// Match on nickname.
    pub nickname: Option<String>,
}

impl FindUser {
    /// Query for exactly one identifier.
    pub fn by_id(id: UserId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Query for every externally hosted user.
    ///
    /// # Examples
    /// ```
    /// use memo_backend::domain::{FindUser, Role};
    ///
    /// assert_eq!(FindUser::external().role, Some(Role::External));
    /// ```
    pub fn external() -> Self {
        Self {
            role: Some(Role::External),
            ..Self::default()
        }
    }

    /// Whether `user` satisfies every present constraint.
    pub fn matches(&self, user: &User) -> bool {
        self.id.is_none_or(|id| user.id == id)
            && self.row_status.is_none_or(|status| user.row_status == status)
            && self.role.is_none_or(|role| user.role == role)
            && self
                .username
                .as_deref()
                .is_none_or(|username| user.username == username)
            && self.email.as_deref().is_none_or(|email| user.email == email)
            && self
                .nickname
                .as_deref()
                .is_none_or(|nickname| user.nickname == nickname)
    }
}

/// Removal request for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteUser {
    /// Target user.
    pub id: UserId,
}
