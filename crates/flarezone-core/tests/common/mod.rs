//! Test doubles and common utilities for object model contract tests
//!
//! [`FakeProvider`] is an in-memory zone + host service that records every
//! call it receives, so tests can assert both on results and on the exact
//! network traffic the object model produced.

#![allow(dead_code)]

use flarezone_core::{
    Credentials, Error, Fields, HostService, NewUser, NewZone, Page, Profile, Result,
    ServiceFactory, SettingUpdate, UserQuery, ZoneService,
};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// One call received by the fake
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetZones(u32),
    GetZoneByName(String),
    CreateZone(NewZone),
    DeleteZone(String),
    GetZoneSettings(String, u32),
    SetZoneSettings(String, Vec<SettingUpdate>),
    GetDnsRecords(String, u32),
    CreateDnsRecord(String, Fields),
    UpdateDnsRecord(String, String, Fields),
    DeleteDnsRecord(String, String),
    UserLookup(UserQuery),
    UserCreate(String),
    FullZoneSet(String, String, bool),
}

/// Backing state shared by every handle of one fake
#[derive(Default)]
pub struct FakeState {
    pub zones: Vec<Fields>,
    pub settings: BTreeMap<String, Vec<Fields>>,
    pub records: BTreeMap<String, Vec<Fields>>,
    pub users: Vec<Profile>,
    pub calls: Vec<Call>,
    pub next_id: u32,
    /// Number of default records `full_zone_set` seeds into new zones
    pub host_seed_records: usize,
    /// Make every `delete_dns_record` fail
    pub fail_record_delete: bool,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn record_mut(&mut self, zone_id: &str, record_id: &str) -> Result<&mut Fields> {
        self.records
            .get_mut(zone_id)
            .and_then(|records| records.iter_mut().find(|r| r["id"] == json!(record_id)))
            .ok_or_else(|| Error::not_found(format!("record {}", record_id)))
    }
}

/// In-memory provider implementing every service trait
#[derive(Clone)]
pub struct FakeProvider {
    pub state: Rc<RefCell<FakeState>>,
    per_page: usize,
}

impl FakeProvider {
    /// Create an empty fake serving two items per page
    pub fn new() -> Self {
        Self::with_page_size(2)
    }

    pub fn with_page_size(per_page: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                host_seed_records: 3,
                ..FakeState::default()
            })),
            per_page,
        }
    }

    /// The fake as a factory for `Account` constructors
    pub fn factory(&self) -> Rc<dyn ServiceFactory> {
        Rc::new(self.clone())
    }

    pub fn add_zone(&self, name: &str) -> String {
        let mut state = self.state.borrow_mut();
        let id = state.next_id("zone");
        state.zones.push(fields(json!({
            "id": id,
            "name": name,
            "status": "active",
        })));
        state.records.insert(id.clone(), Vec::new());
        state.settings.insert(id.clone(), Vec::new());
        id
    }

    pub fn add_record(&self, zone_id: &str, name: &str, record_type: &str, content: &str) -> String {
        let mut state = self.state.borrow_mut();
        let id = state.next_id("rec");
        state.records.entry(zone_id.to_string()).or_default().push(fields(json!({
            "id": id,
            "name": name,
            "type": record_type,
            "content": content,
            "ttl": 1,
            "proxied": false,
        })));
        id
    }

    pub fn add_setting(&self, zone_id: &str, id: &str, value: Value, editable: bool) {
        self.state
            .borrow_mut()
            .settings
            .entry(zone_id.to_string())
            .or_default()
            .push(fields(json!({
                "id": id,
                "value": value,
                "editable": editable,
                "modified_on": null,
            })));
    }

    pub fn add_user(&self, email: &str, unique_id: &str) {
        let mut state = self.state.borrow_mut();
        let n = state.next_id("user");
        state.users.push(fields(json!({
            "cloudflare_email": email,
            "user_api_key": format!("api-key-{}", n),
            "user_key": format!("user-key-{}", n),
            "unique_id": unique_id,
        })));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of recorded calls matching `pred`
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn record_count(&self, zone_id: &str) -> usize {
        self.state.borrow().records.get(zone_id).map_or(0, Vec::len)
    }

    pub fn setting_value(&self, zone_id: &str, id: &str) -> Option<Value> {
        self.state.borrow().settings.get(zone_id).and_then(|settings| {
            settings
                .iter()
                .find(|s| s["id"] == json!(id))
                .map(|s| s["value"].clone())
        })
    }

    fn log(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn page(&self, items: &[Fields], page: u32) -> Page<Fields> {
        let total_pages = items.len().div_ceil(self.per_page).max(1) as u32;
        let start = (page as usize - 1) * self.per_page;
        let items = items.iter().skip(start).take(self.per_page).cloned().collect();
        Page::new(items, page, total_pages)
    }
}

impl ZoneService for FakeProvider {
    fn get_zones(&self, page: u32) -> Result<Page<Fields>> {
        self.log(Call::GetZones(page));
        let zones = self.state.borrow().zones.clone();
        Ok(self.page(&zones, page))
    }

    fn get_zone_by_name(&self, name: &str) -> Result<Fields> {
        self.log(Call::GetZoneByName(name.to_string()));
        self.state
            .borrow()
            .zones
            .iter()
            .find(|z| z["name"] == json!(name))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Zone not found: {}", name)))
    }

    fn create_zone(&self, zone: &NewZone) -> Result<Fields> {
        self.log(Call::CreateZone(zone.clone()));
        let exists = self
            .state
            .borrow()
            .zones
            .iter()
            .any(|z| z["name"] == json!(zone.name));
        if exists {
            return Err(Error::provider("fake", "Zone already exists"));
        }
        let id = self.add_zone(&zone.name);
        let mut state = self.state.borrow_mut();
        let created = state
            .zones
            .iter_mut()
            .find(|z| z["id"] == json!(id))
            .expect("zone just added");
        created.insert("status".into(), json!("pending"));
        Ok(created.clone())
    }

    fn delete_zone(&self, zone_id: &str) -> Result<()> {
        self.log(Call::DeleteZone(zone_id.to_string()));
        let mut state = self.state.borrow_mut();
        let before = state.zones.len();
        state.zones.retain(|z| z["id"] != json!(zone_id));
        if state.zones.len() == before {
            return Err(Error::not_found(format!("Zone not found: {}", zone_id)));
        }
        state.records.remove(zone_id);
        state.settings.remove(zone_id);
        Ok(())
    }

    fn get_zone_settings(&self, zone_id: &str, page: u32) -> Result<Page<Fields>> {
        self.log(Call::GetZoneSettings(zone_id.to_string(), page));
        let settings = self
            .state
            .borrow()
            .settings
            .get(zone_id)
            .cloned()
            .unwrap_or_default();
        Ok(self.page(&settings, page))
    }

    fn set_zone_settings(&self, zone_id: &str, items: &[SettingUpdate]) -> Result<()> {
        self.log(Call::SetZoneSettings(zone_id.to_string(), items.to_vec()));
        let mut state = self.state.borrow_mut();
        let settings = state
            .settings
            .get_mut(zone_id)
            .ok_or_else(|| Error::not_found(format!("Zone not found: {}", zone_id)))?;
        for item in items {
            let setting = settings
                .iter_mut()
                .find(|s| s["id"] == json!(item.id))
                .ok_or_else(|| Error::provider("fake", format!("Unknown setting {}", item.id)))?;
            setting.insert("value".into(), item.value.clone());
            setting.insert("modified_on".into(), json!("2026-10-19T00:00:00Z"));
        }
        Ok(())
    }

    fn get_dns_records(&self, zone_id: &str, page: u32) -> Result<Page<Fields>> {
        self.log(Call::GetDnsRecords(zone_id.to_string(), page));
        let records = self
            .state
            .borrow()
            .records
            .get(zone_id)
            .cloned()
            .unwrap_or_default();
        Ok(self.page(&records, page))
    }

    fn create_dns_record(&self, zone_id: &str, data: &Fields) -> Result<Fields> {
        self.log(Call::CreateDnsRecord(zone_id.to_string(), data.clone()));
        let mut state = self.state.borrow_mut();
        let id = state.next_id("rec");
        let mut record = data.clone();
        record.insert("id".into(), json!(id));
        record.insert("zone_id".into(), json!(zone_id));
        state
            .records
            .entry(zone_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    fn update_dns_record(&self, zone_id: &str, record_id: &str, data: &Fields) -> Result<Fields> {
        self.log(Call::UpdateDnsRecord(
            zone_id.to_string(),
            record_id.to_string(),
            data.clone(),
        ));
        let mut state = self.state.borrow_mut();
        let record = state.record_mut(zone_id, record_id)?;
        for (key, value) in data {
            record.insert(key.clone(), value.clone());
        }
        record.insert("modified_on".into(), json!("2026-10-19T00:00:00Z"));
        Ok(record.clone())
    }

    fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.log(Call::DeleteDnsRecord(
            zone_id.to_string(),
            record_id.to_string(),
        ));
        let mut state = self.state.borrow_mut();
        if state.fail_record_delete {
            return Err(Error::provider("fake", "Record is locked"));
        }
        state.record_mut(zone_id, record_id)?;
        if let Some(records) = state.records.get_mut(zone_id) {
            records.retain(|r| r["id"] != json!(record_id));
        }
        Ok(())
    }

    fn service_name(&self) -> &'static str {
        "fake"
    }
}

impl HostService for FakeProvider {
    fn user_lookup(&self, query: &UserQuery) -> Result<Profile> {
        self.log(Call::UserLookup(query.clone()));
        let (key, wanted) = match query {
            UserQuery::Email(email) => ("cloudflare_email", email),
            UserQuery::UniqueId(id) => ("unique_id", id),
        };
        self.state
            .borrow()
            .users
            .iter()
            .find(|u| u[key] == json!(wanted))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("No account with {}", query)))
    }

    fn user_create(&self, user: &NewUser) -> Result<Profile> {
        self.log(Call::UserCreate(user.email.clone()));
        if user.password.is_empty() {
            return Err(Error::provider("fake", "Password is required"));
        }
        let exists = self
            .state
            .borrow()
            .users
            .iter()
            .any(|u| u["cloudflare_email"] == json!(user.email));
        if exists {
            return Err(Error::provider("fake", "Account already exists"));
        }
        self.add_user(&user.email, user.unique_id.as_deref().unwrap_or(""));
        let profile = self.state.borrow().users.last().cloned().expect("user just added");
        Ok(profile)
    }

    fn full_zone_set(&self, zone_name: &str, user_key: &str, jump_start: bool) -> Result<()> {
        self.log(Call::FullZoneSet(
            zone_name.to_string(),
            user_key.to_string(),
            jump_start,
        ));
        let known = self
            .state
            .borrow()
            .users
            .iter()
            .any(|u| u["user_key"] == json!(user_key));
        if !known {
            return Err(Error::provider("fake", "Invalid user key"));
        }
        let zone_id = self.add_zone(zone_name);
        let seeds = self.state.borrow().host_seed_records;
        for i in 0..seeds {
            self.add_record(&zone_id, zone_name, "CNAME", &format!("seed{}.host.example", i));
        }
        Ok(())
    }

    fn service_name(&self) -> &'static str {
        "fake-host"
    }
}

impl ServiceFactory for FakeProvider {
    fn host_service(&self) -> Result<Rc<dyn HostService>> {
        Ok(Rc::new(self.clone()))
    }

    fn zone_service(&self, credentials: &Credentials) -> Result<Rc<dyn ZoneService>> {
        credentials.validate()?;
        Ok(Rc::new(self.clone()))
    }
}

/// Build a `Fields` map from a JSON object literal
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Credentials accepted by the fake
pub fn test_credentials() -> Credentials {
    Credentials::new("ops@example.com", "test-api-key")
}
