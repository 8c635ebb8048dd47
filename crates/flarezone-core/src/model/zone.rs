use super::{NewRecord, Record, ZoneLink, ZoneSettings, field, into_string};
use crate::cache::{CacheHandle, Cached};
use crate::error::{Error, Result};
use crate::paginator::Paginator;
use crate::traits::{Fields, ZoneService};
use serde_json::Value;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Records of a zone grouped by name, each group sorted by (type, content)
pub type RecordIndex = BTreeMap<String, Vec<Record>>;

/// One DNS zone of an account
///
/// A zone is a snapshot of the provider's data at fetch time; it is never
/// refreshed in place. Cloning is cheap and clones share their caches.
#[derive(Clone)]
pub struct Zone {
    inner: Rc<ZoneInner>,
}

struct ZoneInner {
    service: Rc<dyn ZoneService>,
    account_zones: CacheHandle,
    zone_id: String,
    data: Fields,
    settings: Cached<ZoneSettings>,
    records: Cached<RecordIndex>,
}

impl Zone {
    pub(crate) fn new(
        service: Rc<dyn ZoneService>,
        account_zones: CacheHandle,
        data: Fields,
    ) -> Result<Self> {
        let zone_id = match data.get("id") {
            Some(Value::String(id)) => id.clone(),
            _ => {
                return Err(Error::provider(
                    service.service_name(),
                    "Zone data is missing an id",
                ));
            }
        };

        Ok(Self {
            inner: Rc::new(ZoneInner {
                service,
                account_zones,
                zone_id,
                data,
                settings: Cached::new(),
                records: Cached::new(),
            }),
        })
    }

    /// Read a field of the fetched zone data
    pub fn get(&self, name: &str) -> Result<Value> {
        field(&self.inner.data, "zone", name)
    }

    /// All fetched zone data
    pub fn fields(&self) -> &Fields {
        &self.inner.data
    }

    /// Zone id
    pub fn id(&self) -> &str {
        &self.inner.zone_id
    }

    /// Zone name
    pub fn name(&self) -> Result<String> {
        into_string(self.get("name")?, "zone", "name")
    }

    /// Zone status (e.g., "active", "pending")
    pub fn status(&self) -> Result<String> {
        into_string(self.get("status")?, "zone", "status")
    }

    /// Delete the zone
    ///
    /// Invalidates the account's zone list. This handle is dead afterwards.
    pub fn delete(&self) -> Result<()> {
        tracing::info!("Deleting zone {}", self);

        self.inner.service.delete_zone(&self.inner.zone_id)?;
        self.inner.account_zones.invalidate();
        Ok(())
    }

    /// Zone settings (cached)
    pub fn settings(&self) -> Result<ZoneSettings> {
        self.inner
            .settings
            .get_or_try_init(|| ZoneSettings::load(self.link()))
    }

    /// Drop the cached settings; the next access re-fetches them
    pub fn invalidate_settings(&self) {
        self.inner.settings.invalidate();
    }

    /// Walk the record listing page by page, without caching
    ///
    /// Every call queries the provider again.
    pub fn iter_records(&self) -> impl Iterator<Item = Result<Record>> + '_ {
        let link = self.link();
        Paginator::new(move |page| {
            self.inner
                .service
                .get_dns_records(&self.inner.zone_id, page)
        })
        .map(move |data| data.map(|data| Record::new(link.clone(), data)))
    }

    /// Records grouped by name (cached)
    pub fn records(&self) -> Result<RecordIndex> {
        self.inner.records.get_or_try_init(|| {
            tracing::debug!("Building record index for zone {}", self);

            let mut by_name = RecordIndex::new();
            for record in self.iter_records() {
                let record = record?;
                by_name.entry(record.name()?).or_default().push(record);
            }
            for group in by_name.values_mut() {
                group.sort_by_cached_key(Record::sort_key);
            }
            Ok(by_name)
        })
    }

    /// Drop the cached record index
    pub fn invalidate_records(&self) {
        self.inner.records.invalidate();
    }

    /// Create a DNS record in this zone
    ///
    /// Invalidates the record index and returns the record as the provider
    /// stored it.
    pub fn create_record(&self, record: &NewRecord) -> Result<Record> {
        tracing::info!(
            "Creating {} record {} -> {} in zone {}",
            record.record_type,
            record.name,
            record.content,
            self
        );

        let data = self
            .inner
            .service
            .create_dns_record(&self.inner.zone_id, &record.to_fields())?;
        self.inner.records.invalidate();
        Ok(Record::new(self.link(), data))
    }

    fn link(&self) -> ZoneLink {
        ZoneLink {
            service: Rc::clone(&self.inner.service),
            zone_id: self.inner.zone_id.clone(),
            zone_name: self.to_string(),
            records: self.inner.records.handle(),
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.data.get("name") {
            Some(Value::String(name)) => f.write_str(name),
            _ => f.write_str(&self.inner.zone_id),
        }
    }
}

impl std::fmt::Debug for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zone")
            .field("id", &self.inner.zone_id)
            .field("name", &self.inner.data.get("name"))
            .field("settings", &self.inner.settings)
            .field("records", &self.inner.records)
            .finish()
    }
}
