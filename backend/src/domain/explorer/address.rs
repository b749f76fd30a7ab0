//! Parsing of external user addresses.
//!
//! An external user's `username` holds the address of their account on a
//! remote memo service. The account name follows the `/u/` path prefix; when
//! the prefix is missing the whole path is used. Either way the name is
//! percent-decoded, since the remote query re-encodes it.

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

/// Path prefix marking a user page on the remote service.
pub const USER_PATH_PREFIX: &str = "/u/";

/// Reasons an external address cannot name a remote account.
#[derive(Debug, Error)]
pub enum AddressError {
    /// Not an absolute URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// The decoded account name is not UTF-8.
    #[error("account name is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Remote account recovered from an external user's address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalAccount {
    /// Parsed remote address.
    pub address: Url,
    /// Bare account name on the remote service.
    pub username: String,
}

impl ExternalAccount {
    /// Parse `raw` as an absolute URL and recover the account name.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Url`] when `raw` is not an absolute URL and
    /// [`AddressError::Encoding`] when the decoded name is not UTF-8.
    ///
    /// # Examples
    /// ```
    /// use memo_backend::domain::explorer::{AddressError, ExternalAccount};
    ///
    /// let account = ExternalAccount::parse("https://remote.example/u/al%20ice")?;
    /// assert_eq!(account.username, "al ice");
    /// # Ok::<(), AddressError>(())
    /// ```
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let address = Url::parse(raw)?;
        let path = address.path();
        let encoded = path.strip_prefix(USER_PATH_PREFIX).unwrap_or(path);
        let username = percent_decode_str(encoded).decode_utf8()?.into_owned();
        Ok(Self { address, username })
    }
}
