use super::{ZoneLink, field, into_string, text};
use crate::error::{Error, Result};
use crate::traits::Fields;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;

const ENTITY: &str = "record";

/// Fields for a DNS record to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    /// Record name (e.g., "www" or "www.example.com")
    pub name: String,
    /// Record type (e.g., "A", "MX")
    pub record_type: String,
    /// Record content
    pub content: String,
    /// Time-to-live; 1 means automatic
    pub ttl: u32,
    /// Whether traffic is proxied through the provider
    pub proxied: bool,
    /// Priority, only sent for MX records
    pub priority: u16,
}

impl NewRecord {
    /// Create a record with automatic TTL, not proxied, priority 10
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            content: content.into(),
            ttl: 1,
            proxied: false,
            priority: 10,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Enable or disable proxying
    pub fn with_proxied(mut self, proxied: bool) -> Self {
        self.proxied = proxied;
        self
    }

    /// Set the MX priority
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = priority;
        self
    }

    /// Request payload; the provider rejects `priority` on non-MX types
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".into(), json!(self.name));
        fields.insert("type".into(), json!(self.record_type));
        fields.insert("content".into(), json!(self.content));
        fields.insert("ttl".into(), json!(self.ttl));
        fields.insert("proxied".into(), json!(self.proxied));
        if self.record_type == "MX" {
            fields.insert("priority".into(), json!(self.priority));
        }
        fields
    }
}

/// One DNS record of a zone with locally staged edits
///
/// Only fields present in the fetched data can be edited. Edits reach the
/// provider on [`Record::save`]. Cloning is cheap and clones share state, so
/// an edit made through a record from [`crate::Zone::records`] is visible to
/// every holder of that record.
#[derive(Clone, Debug)]
pub struct Record {
    zone: ZoneLink,
    state: Rc<RefCell<RecordState>>,
}

#[derive(Debug)]
struct RecordState {
    data: Fields,
    pending: Fields,
}

impl Record {
    pub(crate) fn new(zone: ZoneLink, data: Fields) -> Self {
        Self {
            zone,
            state: Rc::new(RefCell::new(RecordState {
                data,
                pending: Fields::new(),
            })),
        }
    }

    /// Current value of a field, staged edit first
    pub fn get(&self, name: &str) -> Result<Value> {
        let state = self.state.borrow();
        match state.pending.get(name) {
            Some(value) => Ok(value.clone()),
            None => field(&state.data, ENTITY, name),
        }
    }

    /// Stage a new value for an existing field
    ///
    /// Fields absent from the fetched data fail with
    /// `Error::AttributeNotFound` and leave the staged edits untouched.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.data.contains_key(name) {
            return Err(Error::attribute_not_found(ENTITY, name));
        }

        state.pending.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Fetched data, without staged edits
    pub fn fields(&self) -> Fields {
        self.state.borrow().data.clone()
    }

    /// Staged edits not yet saved
    pub fn pending(&self) -> Fields {
        self.state.borrow().pending.clone()
    }

    /// Whether there are staged edits
    pub fn has_changes(&self) -> bool {
        !self.state.borrow().pending.is_empty()
    }

    /// Drop staged edits
    pub fn discard(&self) {
        self.state.borrow_mut().pending.clear();
    }

    /// Record id
    pub fn id(&self) -> Result<String> {
        let data = field(&self.state.borrow().data, ENTITY, "id")?;
        into_string(data, ENTITY, "id")
    }

    /// Record name
    pub fn name(&self) -> Result<String> {
        into_string(self.get("name")?, ENTITY, "name")
    }

    /// Record type
    pub fn record_type(&self) -> Result<String> {
        into_string(self.get("type")?, ENTITY, "type")
    }

    /// Record content
    pub fn content(&self) -> Result<String> {
        into_string(self.get("content")?, ENTITY, "content")
    }

    /// Record TTL
    pub fn ttl(&self) -> Result<u64> {
        let ttl = self.get("ttl")?;
        ttl.as_u64()
            .ok_or_else(|| Error::invalid_input(format!("record field 'ttl' is not a number: {}", ttl)))
    }

    /// Ordering key within a name group
    pub(crate) fn sort_key(&self) -> (String, String) {
        let state = self.state.borrow();
        let read = |name: &str| text(state.pending.get(name).or_else(|| state.data.get(name)));
        (read("type"), read("content"))
    }

    /// Whether both handles refer to the same record instance
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Submit staged edits as a partial update
    ///
    /// Does nothing without staged edits. The provider's response is merged
    /// into the fetched data key by key. Renaming invalidates the zone's
    /// record index. On failure the edits stay staged.
    pub fn save(&self) -> Result<()> {
        let (record_id, updates) = {
            let state = self.state.borrow();
            if state.pending.is_empty() {
                return Ok(());
            }
            let id = into_string(field(&state.data, ENTITY, "id")?, ENTITY, "id")?;
            (id, state.pending.clone())
        };

        tracing::info!(
            "Updating record {} in zone {} ({} field(s))",
            record_id,
            self.zone.zone_name,
            updates.len()
        );
        let result = self
            .zone
            .service
            .update_dns_record(&self.zone.zone_id, &record_id, &updates)?;

        {
            let mut state = self.state.borrow_mut();
            // Merged, not re-fetched: fields the response omits keep their old values.
            state.data.extend(result);
            state.pending.clear();
        }

        if updates.contains_key("name") {
            self.zone.records.invalidate();
        }
        Ok(())
    }

    /// Delete the record
    ///
    /// Invalidates the zone's record index. This handle must not be used
    /// afterwards.
    pub fn delete(&self) -> Result<()> {
        let record_id = self.id()?;
        tracing::info!("Deleting record {} from zone {}", self, self.zone.zone_name);

        self.zone
            .service
            .delete_dns_record(&self.zone.zone_id, &record_id)?;
        self.zone.records.invalidate();
        Ok(())
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        let read = |name: &str| text(state.pending.get(name).or_else(|| state.data.get(name)));
        write!(
            f,
            "{} {} IN {} {}",
            read("name"),
            read("ttl"),
            read("type"),
            read("content")
        )
    }
}
