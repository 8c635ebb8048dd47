use super::{Record, Zone, field, into_string};
use crate::cache::Cached;
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::paginator::Paginator;
use crate::traits::{Fields, NewUser, NewZone, Profile, ServiceFactory, UserQuery, ZoneService};
use std::rc::Rc;

/// A provider account and the zones it owns
///
/// The host API profile and the zone list are fetched on first use and
/// cached until invalidated. Deleting any of the account's zones invalidates
/// the zone list.
pub struct Account {
    credentials: Credentials,
    factory: Rc<dyn ServiceFactory>,
    service: Rc<dyn ZoneService>,
    profile: Cached<Profile>,
    zones: Cached<Vec<Zone>>,
}

impl Account {
    /// Create an account handle from known credentials
    pub fn new(factory: Rc<dyn ServiceFactory>, credentials: Credentials) -> Result<Self> {
        let service = factory.zone_service(&credentials)?;

        Ok(Self {
            credentials,
            factory,
            service,
            profile: Cached::new(),
            zones: Cached::new(),
        })
    }

    /// Create an account through the host API
    ///
    /// Fails with `Error::Provider` if the account already exists or the
    /// host rejects the input. The returned profile seeds the profile cache.
    pub fn create_or_get(factory: Rc<dyn ServiceFactory>, user: &NewUser) -> Result<Self> {
        let host = factory.host_service()?;
        tracing::info!("Creating account {} via {}", user.email, host.service_name());

        let profile = host.user_create(user)?;
        Self::from_profile(factory, profile)
    }

    /// Find an existing account through the host API
    ///
    /// Fails with `Error::NotFound` if nothing matches.
    pub fn lookup(factory: Rc<dyn ServiceFactory>, query: &UserQuery) -> Result<Self> {
        let host = factory.host_service()?;
        tracing::debug!("Looking up account ({})", query);

        let profile = host.user_lookup(query)?;
        Self::from_profile(factory, profile)
    }

    fn from_profile(factory: Rc<dyn ServiceFactory>, profile: Profile) -> Result<Self> {
        let email = profile_string(&profile, "cloudflare_email")?;
        let api_key = profile_string(&profile, "user_api_key")?;

        let account = Self::new(factory, Credentials::new(email, api_key))?;
        Ok(Self {
            profile: Cached::seeded(profile),
            ..account
        })
    }

    /// Account email
    pub fn email(&self) -> &str {
        &self.credentials.email
    }

    /// Credentials used by this account's client service
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Host API profile (cached)
    pub fn profile(&self) -> Result<Profile> {
        self.profile.get_or_try_init(|| {
            tracing::debug!("Fetching host profile for {}", self.credentials.email);
            let host = self.factory.host_service()?;
            host.user_lookup(&UserQuery::Email(self.credentials.email.clone()))
        })
    }

    /// Host API user key, needed for host zone provisioning
    pub fn user_key(&self) -> Result<String> {
        profile_string(&self.profile()?, "user_key")
    }

    /// All zones of the account, in listing order (cached)
    pub fn zones(&self) -> Result<Vec<Zone>> {
        self.zones.get_or_try_init(|| {
            tracing::debug!("Listing zones for {}", self.credentials.email);
            self.iter_zones().collect()
        })
    }

    /// Walk the zone listing page by page, without caching
    pub fn iter_zones(&self) -> impl Iterator<Item = Result<Zone>> + '_ {
        Paginator::new(move |page| self.service.get_zones(page))
            .map(move |data| data.and_then(|data| self.zone(data)))
    }

    /// Drop the cached zone list
    pub fn invalidate_zones(&self) {
        self.zones.invalidate();
    }

    /// Fetch a zone by name, bypassing the cached zone list
    pub fn zone_by_name(&self, name: &str) -> Result<Zone> {
        let data = self.service.get_zone_by_name(name)?;
        self.zone(data)
    }

    /// Provision a zone through the host API
    ///
    /// The host seeds new zones with default DNS records; they are all
    /// deleted before the zone is returned. A failed deletion aborts the
    /// operation with that error.
    pub fn create_host_zone(&self, name: &str, jump_start: bool) -> Result<Zone> {
        let host = self.factory.host_service()?;
        let user_key = self.user_key()?;

        tracing::info!("Provisioning zone {} via {}", name, host.service_name());
        host.full_zone_set(name, &user_key, jump_start)?;
        self.zones.invalidate();

        let zone = self.zone_by_name(name)?;

        // Collect first: deleting while paging would shift later pages.
        let seeded: Vec<Record> = zone.iter_records().collect::<Result<_>>()?;
        for record in &seeded {
            tracing::warn!("Removing host-seeded record {} from {}", record, name);
            record.delete()?;
        }

        Ok(zone)
    }

    /// Provision a zone through the client API
    pub fn create_zone(&self, zone: &NewZone) -> Result<Zone> {
        tracing::info!("Creating zone {}", zone.name);

        let data = self.service.create_zone(zone)?;
        self.zones.invalidate();
        self.zone(data)
    }

    fn zone(&self, data: Fields) -> Result<Zone> {
        Zone::new(Rc::clone(&self.service), self.zones.handle(), data)
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("email", &self.credentials.email)
            .field("profile", &self.profile)
            .field("zones", &self.zones)
            .finish()
    }
}

fn profile_string(profile: &Profile, name: &str) -> Result<String> {
    let value = field(profile, "account profile", name).map_err(|_| {
        Error::provider("host", format!("Account profile is missing '{}'", name))
    })?;
    into_string(value, "account profile", name)
}
