// # Zone Service Trait
//
// Defines the per-account client API the object model is built on.
//
// ## Implementations
//
// - Cloudflare v4 over HTTPS: `flarezone-cloudflare` crate
// - Test fakes: `tests/common/mod.rs`
//
// ## Usage
//
// ```rust,ignore
// use flarezone_core::{Paginator, ZoneService};
//
// fn print_zones(service: &dyn ZoneService) -> flarezone_core::Result<()> {
//     for zone in Paginator::new(|page| service.get_zones(page)) {
//         println!("{}", zone?["name"]);
//     }
//     Ok(())
// }
// ```

use crate::error::Result;
use crate::paginator::Page;
use serde::Serialize;
use serde_json::Value;

/// Raw field data of a zone, record or setting as returned by the provider
pub type Fields = serde_json::Map<String, Value>;

/// Request to provision a zone through the client API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewZone {
    /// Zone apex name (e.g., "example.com")
    pub name: String,
    /// Let the provider scan and import existing records
    pub jump_start: bool,
    /// Organization that owns the zone
    pub organization: Option<String>,
}

impl NewZone {
    /// Create a zone request without jump start or organization
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            jump_start: false,
            organization: None,
        }
    }

    /// Enable or disable jump start
    pub fn with_jump_start(mut self, jump_start: bool) -> Self {
        self.jump_start = jump_start;
        self
    }

    /// Set the owning organization
    pub fn with_organization(mut self, organization: Option<String>) -> Self {
        self.organization = organization;
        self
    }
}

/// One entry of a bulk zone settings update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingUpdate {
    /// Setting id (e.g., "always_use_https")
    pub id: String,
    /// New value
    pub value: Value,
}

/// Trait for the per-account client API
///
/// Each method is one blocking round trip. Implementations must not retry
/// and must not cache: every call reflects the provider's current state.
///
/// Paginated listings take a 1-based page number and return a single
/// [`Page`]; drive them with [`crate::Paginator`].
pub trait ZoneService {
    /// List one page of the account's zones
    fn get_zones(&self, page: u32) -> Result<Page<Fields>>;

    /// Fetch a zone by its name
    ///
    /// Returns `Error::NotFound` when the account has no such zone.
    fn get_zone_by_name(&self, name: &str) -> Result<Fields>;

    /// Provision a zone
    fn create_zone(&self, zone: &NewZone) -> Result<Fields>;

    /// Delete a zone
    fn delete_zone(&self, zone_id: &str) -> Result<()>;

    /// List one page of a zone's settings
    ///
    /// Each entry carries at least `id`, `value` and `editable`.
    fn get_zone_settings(&self, zone_id: &str, page: u32) -> Result<Page<Fields>>;

    /// Submit several setting changes at once
    fn set_zone_settings(&self, zone_id: &str, items: &[SettingUpdate]) -> Result<()>;

    /// List one page of a zone's DNS records
    fn get_dns_records(&self, zone_id: &str, page: u32) -> Result<Page<Fields>>;

    /// Create a DNS record from raw fields
    fn create_dns_record(&self, zone_id: &str, fields: &Fields) -> Result<Fields>;

    /// Partially update a DNS record, returning the provider's view of it
    fn update_dns_record(&self, zone_id: &str, record_id: &str, fields: &Fields)
    -> Result<Fields>;

    /// Delete a DNS record
    fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()>;

    /// Get the service name (for logging/debugging)
    fn service_name(&self) -> &'static str;
}
