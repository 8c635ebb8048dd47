//! Configuration types for flarezone
//!
//! [`ServiceConfig`] describes where the Cloudflare endpoints live and how
//! requests are made; [`Credentials`] identifies the account whose zones are
//! managed.

use serde::{Deserialize, Serialize};

/// Default Cloudflare API v4 base URL
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default Cloudflare host gateway URL
pub const DEFAULT_HOST_API_URL: &str = "https://api.cloudflare.com/host-gw.html";

/// Service endpoint configuration
///
/// The Debug implementation does NOT expose the host key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the client API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// URL of the host gateway
    #[serde(default = "default_host_api_url")]
    pub host_api_url: String,

    /// Host key for the host API (only needed for host operations)
    #[serde(default)]
    pub host_key: Option<String>,

    /// HTTP timeout per request (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size requested from paginated listings
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl ServiceConfig {
    /// Create a configuration pointing at the public Cloudflare endpoints
    pub fn new() -> Self {
        Self {
            api_base: default_api_base(),
            host_api_url: default_host_api_url(),
            host_key: None,
            timeout_secs: default_timeout_secs(),
            per_page: default_per_page(),
        }
    }

    /// Set the host key
    pub fn with_host_key(mut self, host_key: impl Into<String>) -> Self {
        self.host_key = Some(host_key.into());
        self
    }

    /// Set the client API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_base.is_empty() {
            return Err(crate::Error::config("API base URL cannot be empty"));
        }
        if self.host_api_url.is_empty() {
            return Err(crate::Error::config("Host API URL cannot be empty"));
        }
        if matches!(self.host_key.as_deref(), Some("")) {
            return Err(crate::Error::config("Host key cannot be empty when set"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Timeout must be > 0"));
        }
        if !(1..=100).contains(&self.per_page) {
            return Err(crate::Error::config("Page size must be between 1 and 100"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_base", &self.api_base)
            .field("host_api_url", &self.host_api_url)
            .field("host_key", &self.host_key.as_ref().map(|_| "<REDACTED>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_host_api_url() -> String {
    DEFAULT_HOST_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_per_page() -> u32 {
    50
}

/// Account credentials for the client API
///
/// The Debug implementation does NOT expose the API key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Global API key
    /// ⚠️ NEVER log this value
    pub api_key: String,
}

impl Credentials {
    /// Create new credentials
    pub fn new(email: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_key: api_key.into(),
        }
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.email.contains('@') {
            return Err(crate::Error::config(format!(
                "Invalid account email: {}",
                self.email
            )));
        }
        if self.api_key.is_empty() {
            return Err(crate::Error::config("API key cannot be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}
