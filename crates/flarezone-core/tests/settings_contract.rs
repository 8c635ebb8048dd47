//! Contract Test: Zone Settings
//!
//! Constraints verified:
//! - Settings are fetched once per zone and cached
//! - Only known, editable settings accept edits; rejected edits stage nothing
//! - Saving without edits issues no request at all
//! - Saving submits every edit in one bulk call, then re-fetches

mod common;

use common::*;
use flarezone_core::{Account, Error, SettingUpdate, Zone};
use serde_json::{Value, json};
use std::collections::BTreeMap;

fn setup() -> (FakeProvider, Account, Zone) {
    let fake = FakeProvider::new();
    let zone_id = fake.add_zone("example.com");
    fake.add_setting(&zone_id, "ssl", json!("full"), true);
    fake.add_setting(&zone_id, "always_use_https", json!("off"), true);
    fake.add_setting(&zone_id, "universal_ssl", json!("on"), false);
    fake.add_setting(&zone_id, "min_tls_version", json!("1.0"), true);
    fake.add_setting(&zone_id, "browser_cache_ttl", json!(14400), true);

    let account = Account::new(fake.factory(), test_credentials()).expect("account");
    let zone = account.zone_by_name("example.com").expect("zone exists");
    fake.clear_calls();
    (fake, account, zone)
}

fn settings_fetches(fake: &FakeProvider) -> usize {
    fake.count(|c| matches!(c, Call::GetZoneSettings(..)))
}

#[test]
fn settings_are_fetched_across_pages_and_cached() {
    let (fake, _account, zone) = setup();

    let settings = zone.settings().unwrap();
    assert_eq!(settings_fetches(&fake), 3, "5 settings at 2 per page");

    let again = zone.settings().unwrap();
    assert_eq!(settings_fetches(&fake), 3, "second access is cached");
    assert_eq!(settings.ids(), again.ids());

    zone.invalidate_settings();
    zone.settings().unwrap();
    assert_eq!(settings_fetches(&fake), 6);
}

#[test]
fn iteration_yields_sorted_setting_ids() {
    let (_fake, _account, zone) = setup();
    let settings = zone.settings().unwrap();

    let ids: Vec<String> = (&settings).into_iter().collect();

    assert_eq!(
        ids,
        vec![
            "always_use_https",
            "browser_cache_ttl",
            "min_tls_version",
            "ssl",
            "universal_ssl",
        ]
    );
}

#[test]
fn reads_resolve_known_settings_only() {
    let (_fake, _account, zone) = setup();
    let settings = zone.settings().unwrap();

    assert_eq!(settings.get("ssl").unwrap(), json!("full"));
    assert_eq!(settings.get("browser_cache_ttl").unwrap(), json!(14400));
    assert!(!settings.is_editable("universal_ssl").unwrap());
    assert!(matches!(
        settings.get("rocket_loader"),
        Err(Error::AttributeNotFound { .. })
    ));
}

#[test]
fn non_editable_setting_rejects_writes() {
    let (fake, _account, zone) = setup();
    let settings = zone.settings().unwrap();

    let err = settings.set("universal_ssl", "off").unwrap_err();

    assert!(matches!(err, Error::NotEditable(ref id) if id == "universal_ssl"));
    assert!(settings.pending().is_empty());
    assert_eq!(settings.get("universal_ssl").unwrap(), json!("on"));
    assert_eq!(fake.count(|c| matches!(c, Call::SetZoneSettings(..))), 0);
}

#[test]
fn unknown_setting_rejects_writes() {
    let (_fake, _account, zone) = setup();
    let settings = zone.settings().unwrap();

    let err = settings.set("rocket_loader", "on").unwrap_err();

    assert!(matches!(err, Error::AttributeNotFound { .. }));
    assert!(!settings.has_changes());
}

#[test]
fn rejected_writes_keep_existing_staged_edits() {
    let (_fake, _account, zone) = setup();
    let settings = zone.settings().unwrap();
    settings.set("ssl", "strict").unwrap();

    assert!(matches!(
        settings.set("universal_ssl", "off"),
        Err(Error::NotEditable(_))
    ));
    assert!(matches!(
        settings.set("rocket_loader", "on"),
        Err(Error::AttributeNotFound { .. })
    ));

    let expected: BTreeMap<String, Value> =
        BTreeMap::from([("ssl".to_string(), json!("strict"))]);
    assert_eq!(settings.pending(), expected);
    assert_eq!(settings.get("universal_ssl").unwrap(), json!("on"));
}

#[test]
fn edits_are_staged_locally() {
    let (fake, _account, zone) = setup();
    let settings = zone.settings().unwrap();
    fake.clear_calls();

    settings.set("always_use_https", "on").unwrap();

    assert_eq!(settings.get("always_use_https").unwrap(), json!("on"));
    assert_eq!(
        settings.descriptor("always_use_https").unwrap().value,
        json!("off")
    );
    assert!(fake.calls().is_empty(), "staging never touches the service");

    // The cached settings object is shared.
    assert!(zone.settings().unwrap().has_changes());
}

#[test]
fn save_without_edits_issues_no_request() {
    let (fake, _account, zone) = setup();
    let settings = zone.settings().unwrap();
    fake.clear_calls();

    settings.save().unwrap();

    assert!(fake.calls().is_empty());
}

#[test]
fn save_submits_bulk_update_then_refetches() {
    let (fake, _account, zone) = setup();
    let settings = zone.settings().unwrap();
    settings.set("ssl", "strict").unwrap();
    settings.set("min_tls_version", "1.2").unwrap();
    fake.clear_calls();

    settings.save().unwrap();

    let calls = fake.calls();
    assert_eq!(
        calls[0],
        Call::SetZoneSettings(
            zone.id().to_string(),
            vec![
                SettingUpdate {
                    id: "min_tls_version".to_string(),
                    value: json!("1.2"),
                },
                SettingUpdate {
                    id: "ssl".to_string(),
                    value: json!("strict"),
                },
            ]
        )
    );
    assert_eq!(settings_fetches(&fake), 3, "full snapshot fetched again");

    assert!(!settings.has_changes());
    assert_eq!(settings.get("ssl").unwrap(), json!("strict"));
    assert_eq!(
        settings.descriptor("ssl").unwrap().modified_on.as_deref(),
        Some("2026-10-19T00:00:00Z")
    );
    assert_eq!(fake.setting_value(zone.id(), "ssl"), Some(json!("strict")));
}

#[test]
fn discard_drops_staged_edits() {
    let (fake, _account, zone) = setup();
    let settings = zone.settings().unwrap();

    settings.set("ssl", "flexible").unwrap();
    settings.discard();
    settings.save().unwrap();

    assert_eq!(settings.get("ssl").unwrap(), json!("full"));
    assert_eq!(fake.count(|c| matches!(c, Call::SetZoneSettings(..))), 0);
}
