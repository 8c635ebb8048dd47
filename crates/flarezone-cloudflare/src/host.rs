//! Host gateway service
//!
//! The host gateway is a single form-encoded endpoint; the `act` parameter
//! selects the operation and `host_key` authenticates the hosting partner.

use flarezone_core::{
    Error, HostService, NewUser, Profile, Result, ServiceConfig, UserQuery,
};
use serde_json::Value;

use crate::{HOST_PROVIDER, build_client};
use crate::types::parse_host_envelope;

/// Cloudflare host gateway service
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the host key.
pub struct CloudflareHostService {
    url: String,
    /// ⚠️ NEVER log this value
    host_key: String,
    client: reqwest::blocking::Client,
}

impl std::fmt::Debug for CloudflareHostService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareHostService")
            .field("url", &self.url)
            .field("host_key", &"<REDACTED>")
            .finish()
    }
}

impl CloudflareHostService {
    /// Create a host service
    ///
    /// Fails with `Error::Config` if no host key is configured.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;
        Self::with_client(config, build_client(config)?)
    }

    /// Create a host service sharing an existing HTTP client
    pub(crate) fn with_client(
        config: &ServiceConfig,
        client: reqwest::blocking::Client,
    ) -> Result<Self> {
        let host_key = config
            .host_key
            .clone()
            .ok_or_else(|| Error::config("Host key is required for host API operations"))?;

        Ok(Self {
            url: config.host_api_url.clone(),
            host_key,
            client,
        })
    }

    fn call(&self, act: &str, params: Vec<(&'static str, String)>) -> Result<Profile> {
        tracing::debug!("POST {} act={}", self.url, act);

        let mut form = vec![("act", act.to_string()), ("host_key", self.host_key.clone())];
        form.extend(params);

        let response = self
            .client
            .post(&self.url)
            .form(&form)
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;
        let status = response.status();
        tracing::debug!("Response Status: {}", status);

        let body = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        parse_host_envelope(status.as_u16(), &body)
    }
}

pub(crate) fn lookup_params(query: &UserQuery) -> Vec<(&'static str, String)> {
    match query {
        UserQuery::Email(email) => vec![("cloudflare_email", email.clone())],
        UserQuery::UniqueId(id) => vec![("unique_id", id.clone())],
    }
}

pub(crate) fn create_params(user: &NewUser) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("cloudflare_email", user.email.clone()),
        ("cloudflare_pass", user.password.clone()),
    ];
    if let Some(username) = &user.username {
        params.push(("cloudflare_username", username.clone()));
    }
    if let Some(unique_id) = &user.unique_id {
        params.push(("unique_id", unique_id.clone()));
    }
    params
}

pub(crate) fn zone_set_params(
    zone_name: &str,
    user_key: &str,
    jump_start: bool,
) -> Vec<(&'static str, String)> {
    vec![
        ("zone_name", zone_name.to_string()),
        ("user_key", user_key.to_string()),
        ("jump_start", if jump_start { "1" } else { "0" }.to_string()),
    ]
}

impl HostService for CloudflareHostService {
    fn user_lookup(&self, query: &UserQuery) -> Result<Profile> {
        let profile = self.call("user_lookup", lookup_params(query))?;

        if profile.get("user_exists") == Some(&Value::Bool(false)) {
            return Err(Error::not_found(format!("No account with {}", query)));
        }
        Ok(profile)
    }

    fn user_create(&self, user: &NewUser) -> Result<Profile> {
        tracing::info!("Creating host account for {}", user.email);
        self.call("user_create", create_params(user))
    }

    fn full_zone_set(&self, zone_name: &str, user_key: &str, jump_start: bool) -> Result<()> {
        tracing::info!("Requesting full zone set for {}", zone_name);
        self.call("full_zone_set", zone_set_params(zone_name, user_key, jump_start))?;
        Ok(())
    }

    fn service_name(&self) -> &'static str {
        HOST_PROVIDER
    }
}
