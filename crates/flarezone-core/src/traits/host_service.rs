// # Host Service Trait
//
// Defines the privileged provisioning API used to create and look up
// accounts and to set up zones on their behalf.
//
// ## Implementations
//
// - Cloudflare host gateway: `flarezone-cloudflare` crate
// - Test fakes: `tests/common/mod.rs`

use crate::error::Result;
use crate::traits::zone_service::Fields;

/// Host API profile of an account
///
/// Contains at least `cloudflare_email`, `user_api_key` and `user_key`.
pub type Profile = Fields;

/// How to find an existing account
///
/// Exactly one key is used per lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserQuery {
    /// Look up by account email
    Email(String),
    /// Look up by the host's own identifier for the account
    UniqueId(String),
}

impl std::fmt::Display for UserQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserQuery::Email(email) => write!(f, "email={}", email),
            UserQuery::UniqueId(id) => write!(f, "unique_id={}", id),
        }
    }
}

/// Request to create an account through the host API
///
/// The Debug implementation does NOT expose the password.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Account email
    pub email: String,
    /// Account password
    /// ⚠️ NEVER log this value
    pub password: String,
    /// Optional username
    pub username: Option<String>,
    /// Optional host-side identifier
    pub unique_id: Option<String>,
}

impl NewUser {
    /// Create an account request with just email and password
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            username: None,
            unique_id: None,
        }
    }

    /// Set the username
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the host-side identifier
    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password", &"<REDACTED>")
            .field("username", &self.username)
            .field("unique_id", &self.unique_id)
            .finish()
    }
}

/// Trait for the host provisioning API
///
/// Like [`crate::ZoneService`], every call is a single blocking round trip
/// with no retry.
pub trait HostService {
    /// Fetch the profile of an existing account
    ///
    /// Returns `Error::NotFound` when no account matches.
    fn user_lookup(&self, query: &UserQuery) -> Result<Profile>;

    /// Create an account
    ///
    /// Returns `Error::Provider` if the account already exists or the input
    /// is rejected.
    fn user_create(&self, user: &NewUser) -> Result<Profile>;

    /// Provision a zone (with its default DNS setup) for an account
    fn full_zone_set(&self, zone_name: &str, user_key: &str, jump_start: bool) -> Result<()>;

    /// Get the service name (for logging/debugging)
    fn service_name(&self) -> &'static str;
}
