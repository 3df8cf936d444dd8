// Telemetry data domain models
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One raw record from the cloud channel: a source-provided timestamp plus
/// the numbered field values that were present in the feed entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedRecord {
    pub timestamp: String,
    pub fields: HashMap<String, String>,
}

impl FeedRecord {
    /// Parse a named field as a number. Absent or malformed values fall back
    /// to 0.0 so that partial telemetry still drives the dashboard and still
    /// gets checked against thresholds.
    pub fn numeric(&self, name: &str) -> f64 {
        self.fields
            .get(name)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    fn flag(&self, name: &str) -> u8 {
        if self.numeric(name) != 0.0 { 1 } else { 0 }
    }
}

/// Maps the snapshot's metrics onto the provider's numbered field names.
/// Variants of the channel layout differ only in this mapping; a metric
/// without a mapped field (currently only `power`) is simply absent from
/// the snapshot.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldMap {
    pub voltage: String,
    pub current: String,
    pub power: Option<String>,
    pub temperature: String,
    pub state_of_charge: String,
    pub state_of_health: String,
    pub charging_state: String,
    pub motor_state: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            voltage: "field1".to_string(),
            current: "field2".to_string(),
            power: Some("field3".to_string()),
            temperature: "field4".to_string(),
            state_of_charge: "field5".to_string(),
            state_of_health: "field6".to_string(),
            charging_state: "field7".to_string(),
            motor_state: "field8".to_string(),
        }
    }
}

/// One normalized battery reading, immutable once constructed.
///
/// `state_of_charge` and `state_of_health` are kept raw here; clamping to
/// [0, 100] happens only in the presentation view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    /// Volts
    pub voltage: f64,
    /// Milliamps; sign indicates charge/discharge direction
    pub current: f64,
    /// Watts; only present when the channel layout carries it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    /// Degrees Celsius
    pub temperature: f64,
    /// Percent, 0-100
    pub state_of_charge: f64,
    /// Percent, 0-100
    pub state_of_health: f64,
    /// 0 or 1, set by command rather than derived from telemetry
    pub motor_state: u8,
    /// 0 = discharging, 1 = charging
    pub charging_state: u8,
    /// Source-provided, not locally generated
    pub timestamp: String,
    /// Kilometers; derived, see the range estimator
    pub estimated_range: f64,
}

impl TelemetrySnapshot {
    pub fn from_record(record: &FeedRecord, fields: &FieldMap) -> Self {
        let power = fields
            .power
            .as_ref()
            .filter(|name| record.fields.contains_key(*name))
            .map(|name| record.numeric(name));

        Self {
            voltage: record.numeric(&fields.voltage),
            current: record.numeric(&fields.current),
            power,
            temperature: record.numeric(&fields.temperature),
            state_of_charge: record.numeric(&fields.state_of_charge),
            state_of_health: record.numeric(&fields.state_of_health),
            motor_state: record.flag(&fields.motor_state),
            charging_state: record.flag(&fields.charging_state),
            timestamp: record.timestamp.clone(),
            estimated_range: 0.0,
        }
    }

    pub fn with_estimated_range(mut self, estimated_range: f64) -> Self {
        self.estimated_range = estimated_range;
        self
    }
}

/// One charge/health point of the provider-capped recent window. Each fetch
/// replaces the whole sequence; nothing accumulates locally.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: String,
    pub state_of_charge: f64,
    pub state_of_health: f64,
}

impl HistoryEntry {
    pub fn from_record(record: &FeedRecord, fields: &FieldMap) -> Self {
        Self {
            timestamp: record.timestamp.clone(),
            state_of_charge: record.numeric(&fields.state_of_charge),
            state_of_health: record.numeric(&fields.state_of_health),
        }
    }
}
