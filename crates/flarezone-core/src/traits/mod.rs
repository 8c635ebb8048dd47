//! Service traits for flarezone
//!
//! The object model only talks to the provider through these interfaces.
//!
//! - [`ZoneService`]: per-account client API (zones, settings, DNS records)
//! - [`HostService`]: privileged host provisioning API
//! - [`ServiceFactory`]: builds both from configuration and credentials

pub mod host_service;
pub mod zone_service;

pub use host_service::{HostService, NewUser, Profile, UserQuery};
pub use zone_service::{Fields, NewZone, SettingUpdate, ZoneService};

use crate::config::Credentials;
use crate::error::Result;
use std::rc::Rc;

/// Helper trait for constructing services
///
/// An [`crate::Account`] keeps its factory so that lookups and zone
/// provisioning can reach the host API without further wiring.
pub trait ServiceFactory {
    /// Create the host API service
    ///
    /// Fails with `Error::Config` if the factory has no host credentials.
    fn host_service(&self) -> Result<Rc<dyn HostService>>;

    /// Create a client API service acting as `credentials`
    fn zone_service(&self, credentials: &Credentials) -> Result<Rc<dyn ZoneService>>;
}
