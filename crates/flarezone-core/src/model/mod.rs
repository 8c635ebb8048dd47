//! Cached object model over the zone and host services
//!
//! Control flows [`Account`] → [`Zone`] → {[`ZoneSettings`], [`Record`]}.
//! Parents memoize what they fetch in [`crate::Cached`] slots; children keep
//! a [`crate::CacheHandle`] to the slot they can make stale and clear it
//! after a mutation, so the next read re-fetches.
//!
//! The graph is single-threaded (`Rc`/`RefCell`) and every remote operation
//! is one blocking service call.

mod account;
mod record;
mod settings;
mod zone;

pub use account::Account;
pub use record::{NewRecord, Record};
pub use settings::{SettingDescriptor, ZoneSettings};
pub use zone::{RecordIndex, Zone};

use crate::cache::CacheHandle;
use crate::error::{Error, Result};
use crate::traits::{Fields, ZoneService};
use serde_json::Value;
use std::rc::Rc;

/// What a zone's children need to reach the service and the zone's caches
#[derive(Clone)]
pub(crate) struct ZoneLink {
    pub(crate) service: Rc<dyn ZoneService>,
    pub(crate) zone_id: String,
    pub(crate) zone_name: String,
    pub(crate) records: CacheHandle,
}

impl std::fmt::Debug for ZoneLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneLink")
            .field("zone_id", &self.zone_id)
            .field("zone_name", &self.zone_name)
            .finish()
    }
}

/// Read `name` from `fields`, failing like an unknown attribute
pub(crate) fn field(fields: &Fields, entity: &'static str, name: &str) -> Result<Value> {
    fields
        .get(name)
        .cloned()
        .ok_or_else(|| Error::attribute_not_found(entity, name))
}

/// Require a JSON string
pub(crate) fn into_string(value: Value, entity: &'static str, name: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Error::invalid_input(format!(
            "{} field '{}' is not a string: {}",
            entity, name, other
        ))),
    }
}

/// Render a value for display and ordering (strings without quotes)
pub(crate) fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
