// # Cloudflare Services
//
// Blocking implementations of the flarezone service traits:
//
// - `CloudflareService`: client API v4 (zones, settings, DNS records)
// - `CloudflareHostService`: host gateway (accounts, full zone set)
// - `CloudflareFactory`: builds both from a `ServiceConfig`
//
// Each trait method makes one HTTP request. There is no retry, no backoff
// and no response caching here; the object model in `flarezone-core` owns
// caching.
//
// ## Security Requirements
//
// - API keys and the host key NEVER appear in logs or Debug output
// - Empty credentials are rejected before any request is made
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?page=..&per_page=..`
// - Zone Settings: GET/PATCH `/zones/:zone_id/settings`
// - DNS Records: GET/POST `/zones/:zone_id/dns_records`,
//   PATCH/DELETE `/zones/:zone_id/dns_records/:record_id`

mod client;
mod host;
mod types;

pub use client::CloudflareService;
pub use host::CloudflareHostService;

use flarezone_core::{
    Credentials, Error, HostService, Result, ServiceConfig, ServiceFactory, ZoneService,
};
use std::cell::OnceCell;
use std::rc::Rc;
use std::time::Duration;

/// Service name reported by the client API service
pub const PROVIDER: &str = "cloudflare";

/// Service name reported by the host gateway service
pub const HOST_PROVIDER: &str = "cloudflare-host";

/// Factory for Cloudflare services
///
/// One HTTP client is built up front and shared by every service the
/// factory creates. The host service is created once and reused.
#[derive(Debug, Clone)]
pub struct CloudflareFactory {
    config: ServiceConfig,
    client: reqwest::blocking::Client,
    host: OnceCell<Rc<CloudflareHostService>>,
}

impl CloudflareFactory {
    /// Create a factory, validating the configuration up front
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        if config.host_key.is_none() {
            tracing::debug!("No host key configured; host API operations are unavailable");
        }
        let client = build_client(&config)?;

        Ok(Self {
            config,
            client,
            host: OnceCell::new(),
        })
    }

    /// The factory's configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl ServiceFactory for CloudflareFactory {
    fn host_service(&self) -> Result<Rc<dyn HostService>> {
        if let Some(host) = self.host.get() {
            return Ok(host.clone());
        }

        let host = Rc::new(CloudflareHostService::with_client(
            &self.config,
            self.client.clone(),
        )?);
        let _ = self.host.set(Rc::clone(&host));
        Ok(host)
    }

    fn zone_service(&self, credentials: &Credentials) -> Result<Rc<dyn ZoneService>> {
        Ok(Rc::new(CloudflareService::with_client(
            &self.config,
            credentials,
            self.client.clone(),
        )?))
    }
}

/// Blocking HTTP client with the configured timeout
pub(crate) fn build_client(config: &ServiceConfig) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))
}
