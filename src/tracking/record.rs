use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::probes::RawSignals;

/// One delivered sample. Immutable once composed; the loop hands it to the
/// sink and forgets it whether or not delivery succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityRecord {
    pub timestamp: String,
    pub boot_time: String,
    #[serde(serialize_with = "serialize_battery")]
    pub battery: Option<u8>,
    pub active_app: String,
    pub window_title: String,
    pub idle_time_secs: f64,
    pub apps: Vec<String>,
    pub resumed_from_sleep: bool,
    pub app_usage_times: BTreeMap<String, f64>,
}

/// Logged once when the OS tells us the session is ending. Distinguished from
/// activity records by the presence of the `event` field.
#[derive(Debug, Clone, Serialize)]
pub struct ShutdownEvent {
    pub timestamp: String,
    pub event: &'static str,
}

impl ShutdownEvent {
    pub fn now() -> Self {
        Self {
            timestamp: iso_timestamp(Utc::now()),
            event: "shutdown",
        }
    }
}

/// Merge raw signals, the usage ledger, and the resume flag into a record.
/// Ledger values are rounded to 2 decimal places on the way out; the ledger
/// itself keeps full precision.
pub fn compose(
    raw: RawSignals,
    ledger: &BTreeMap<String, f64>,
    resumed: bool,
) -> ActivityRecord {
    compose_at(Utc::now(), raw, ledger, resumed)
}

pub fn compose_at(
    now: DateTime<Utc>,
    raw: RawSignals,
    ledger: &BTreeMap<String, f64>,
    resumed: bool,
) -> ActivityRecord {
    let app_usage_times = ledger
        .iter()
        .map(|(app, secs)| (app.clone(), round2(*secs)))
        .collect();

    ActivityRecord {
        timestamp: iso_timestamp(now),
        boot_time: raw.boot_time,
        battery: raw.battery_percent,
        active_app: raw.active_app,
        window_title: raw.window_title,
        idle_time_secs: raw.idle_secs,
        apps: raw.user_apps,
        resumed_from_sleep: resumed,
        app_usage_times,
    }
}

fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn serialize_battery<S>(battery: &Option<u8>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match battery {
        Some(pct) => serializer.serialize_u8(*pct),
        None => serializer.serialize_str("N/A"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(active_app: &str) -> RawSignals {
        RawSignals {
            active_app: active_app.to_string(),
            window_title: "notes.txt - Editor".to_string(),
            idle_secs: 4.2,
            battery_percent: Some(87),
            boot_time: "2026-08-30 07:12:44".to_string(),
            user_apps: vec!["Browser".to_string(), "Editor".to_string()],
        }
    }

    #[test]
    fn compose_rounds_ledger_values_to_two_decimals() {
        let mut ledger = BTreeMap::new();
        ledger.insert("Editor".to_string(), 121.00499);
        ledger.insert("Browser".to_string(), 30.0051);

        let record = compose(raw("Editor"), &ledger, false);
        assert_eq!(record.app_usage_times["Editor"], 121.0);
        assert_eq!(record.app_usage_times["Browser"], 30.01);
    }

    #[test]
    fn missing_battery_serializes_as_na() {
        let mut signals = raw("Editor");
        signals.battery_percent = None;

        let record = compose(signals, &BTreeMap::new(), false);
        let json = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(json["battery"], serde_json::json!("N/A"));
    }

    #[test]
    fn present_battery_serializes_as_a_number() {
        let record = compose(raw("Editor"), &BTreeMap::new(), true);
        let json = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(json["battery"], serde_json::json!(87));
        assert_eq!(json["resumed_from_sleep"], serde_json::json!(true));
    }

    #[test]
    fn record_carries_the_full_field_set() {
        let record = compose(raw("Editor"), &BTreeMap::new(), false);
        let json = serde_json::to_value(&record).expect("record serializes");
        let object = json.as_object().expect("record is an object");

        for field in [
            "timestamp",
            "boot_time",
            "battery",
            "active_app",
            "window_title",
            "idle_time_secs",
            "apps",
            "resumed_from_sleep",
            "app_usage_times",
        ] {
            assert!(object.contains_key(field), "missing field {field}");
        }
        // Activity records must not carry the shutdown marker field.
        assert!(!object.contains_key("event"));
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2026, 8, 30, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 8, 30, 10, 30, 0).unwrap();

        let a = compose_at(earlier, raw("Editor"), &BTreeMap::new(), false);
        let b = compose_at(later, raw("Editor"), &BTreeMap::new(), false);
        assert!(a.timestamp < b.timestamp);
    }

    #[test]
    fn shutdown_event_is_marked() {
        let event = ShutdownEvent::now();
        let json = serde_json::to_value(&event).expect("event serializes");
        assert_eq!(json["event"], serde_json::json!("shutdown"));
        assert!(json.get("active_app").is_none());
    }
}
