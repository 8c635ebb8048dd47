use super::ZoneLink;
use crate::error::{Error, Result};
use crate::paginator::Paginator;
use crate::traits::SettingUpdate;
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

const ENTITY: &str = "zone settings";

/// Provider snapshot of one zone setting
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SettingDescriptor {
    /// Current value
    #[serde(default)]
    pub value: Value,
    /// Whether the value may be changed
    #[serde(default)]
    pub editable: bool,
    /// Last modification time, as reported by the provider
    #[serde(default)]
    pub modified_on: Option<String>,
}

/// Settings of one zone with locally staged edits
///
/// Reads see staged edits first. Edits only reach the provider on
/// [`ZoneSettings::save`], after which the full snapshot is fetched again.
/// Cloning is cheap and clones share state.
#[derive(Clone, Debug)]
pub struct ZoneSettings {
    zone: ZoneLink,
    state: Rc<RefCell<SettingsState>>,
}

#[derive(Debug, Default)]
struct SettingsState {
    settings: BTreeMap<String, SettingDescriptor>,
    pending: BTreeMap<String, Value>,
}

impl ZoneSettings {
    pub(crate) fn load(zone: ZoneLink) -> Result<Self> {
        let settings = fetch(&zone)?;
        Ok(Self {
            zone,
            state: Rc::new(RefCell::new(SettingsState {
                settings,
                pending: BTreeMap::new(),
            })),
        })
    }

    /// Current value of a setting, staged edit first
    pub fn get(&self, id: &str) -> Result<Value> {
        let state = self.state.borrow();
        if let Some(value) = state.pending.get(id) {
            return Ok(value.clone());
        }
        state
            .settings
            .get(id)
            .map(|descriptor| descriptor.value.clone())
            .ok_or_else(|| Error::attribute_not_found(ENTITY, id))
    }

    /// Stage a new value for an editable setting
    ///
    /// Unknown ids fail with `Error::AttributeNotFound`, read-only settings
    /// with `Error::NotEditable`; neither touches the staged edits.
    pub fn set(&self, id: &str, value: impl Into<Value>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match state.settings.get(id) {
            None => return Err(Error::attribute_not_found(ENTITY, id)),
            Some(descriptor) if !descriptor.editable => return Err(Error::not_editable(id)),
            Some(_) => {}
        }

        state.pending.insert(id.to_string(), value.into());
        Ok(())
    }

    /// Fetched descriptor of a setting (ignores staged edits)
    pub fn descriptor(&self, id: &str) -> Result<SettingDescriptor> {
        self.state
            .borrow()
            .settings
            .get(id)
            .cloned()
            .ok_or_else(|| Error::attribute_not_found(ENTITY, id))
    }

    /// Whether a setting may be changed
    pub fn is_editable(&self, id: &str) -> Result<bool> {
        Ok(self.descriptor(id)?.editable)
    }

    /// Sorted ids of all known settings
    pub fn ids(&self) -> Vec<String> {
        self.state.borrow().settings.keys().cloned().collect()
    }

    /// Iterate the sorted setting ids
    pub fn iter(&self) -> std::vec::IntoIter<String> {
        self.ids().into_iter()
    }

    /// Staged edits not yet saved
    pub fn pending(&self) -> BTreeMap<String, Value> {
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

    /// Submit staged edits
    ///
    /// Does nothing without staged edits. Otherwise sends every edit in one
    /// bulk update, re-fetches all settings, then clears the edits. On
    /// failure the edits stay staged.
    pub fn save(&self) -> Result<()> {
        let items: Vec<SettingUpdate> = {
            let state = self.state.borrow();
            if state.pending.is_empty() {
                return Ok(());
            }
            state
                .pending
                .iter()
                .map(|(id, value)| SettingUpdate {
                    id: id.clone(),
                    value: value.clone(),
                })
                .collect()
        };

        tracing::info!(
            "Saving {} setting(s) for zone {}",
            items.len(),
            self.zone.zone_name
        );
        self.zone
            .service
            .set_zone_settings(&self.zone.zone_id, &items)?;

        let settings = fetch(&self.zone)?;
        let mut state = self.state.borrow_mut();
        state.settings = settings;
        state.pending.clear();
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ZoneSettings {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for ZoneSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ZoneSettings<{}>", self.zone.zone_name)
    }
}

fn fetch(zone: &ZoneLink) -> Result<BTreeMap<String, SettingDescriptor>> {
    tracing::debug!("Fetching settings for zone {}", zone.zone_name);

    let mut settings = BTreeMap::new();
    for setting in Paginator::new(|page| zone.service.get_zone_settings(&zone.zone_id, page)) {
        let mut setting = setting?;
        let id = match setting.remove("id") {
            Some(Value::String(id)) => id,
            _ => {
                return Err(Error::provider(
                    zone.service.service_name(),
                    "Zone setting is missing an id",
                ));
            }
        };
        let descriptor: SettingDescriptor = serde_json::from_value(Value::Object(setting))?;
        settings.insert(id, descriptor);
    }
    Ok(settings)
}
