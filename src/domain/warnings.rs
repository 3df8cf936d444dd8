// Warning evaluation and critical alert aggregation
use crate::domain::telemetry::TelemetrySnapshot;
use crate::domain::thresholds::ThresholdTable;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Metric category a warning belongs to. The evaluator emits at most one
/// warning per category on any cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Temperature,
    Voltage,
    StateOfCharge,
    StateOfHealth,
    Current,
    Range,
}

/// Produced fresh on every evaluation cycle; no identity beyond its content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub metric: Metric,
    pub severity: Severity,
    pub icon: &'static str,
    pub message: String,
}

impl Warning {
    fn new(metric: Metric, severity: Severity, icon: &'static str, message: String) -> Self {
        Self {
            metric,
            severity,
            icon,
            message,
        }
    }
}

/// Ordered list of critical messages backing the dashboard banner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalBanner {
    pub messages: Vec<String>,
}

/// Map a snapshot to its warnings. Pure, stateless and total: any
/// well-formed snapshot evaluates, including the all-zero snapshot a fully
/// degraded parse produces.
///
/// Metric order is fixed (temperature, voltage, charge, health, current,
/// range) and within a metric the critical tier is checked before the
/// warning tier, so the tiers are mutually exclusive rather than
/// cumulative. Overlapping or inverted bounds are not re-validated here;
/// first match wins.
pub fn evaluate(snapshot: &TelemetrySnapshot, thresholds: &ThresholdTable) -> Vec<Warning> {
    let mut warnings = Vec::new();

    let temp = &thresholds.temperature;
    if snapshot.temperature >= temp.critical_high {
        warnings.push(Warning::new(
            Metric::Temperature,
            Severity::Critical,
            "🔥",
            format!("Battery temperature critical: {:.1}°C", snapshot.temperature),
        ));
    } else if snapshot.temperature >= temp.warning_high {
        warnings.push(Warning::new(
            Metric::Temperature,
            Severity::Warning,
            "🌡️",
            format!("Battery temperature high: {:.1}°C", snapshot.temperature),
        ));
    } else if snapshot.temperature <= temp.warning_low {
        warnings.push(Warning::new(
            Metric::Temperature,
            Severity::Warning,
            "❄️",
            format!("Battery temperature low: {:.1}°C", snapshot.temperature),
        ));
    }

    // Low-side checks come before high-side checks, so a table misconfigured
    // with overlapping bands resolves to the low side.
    let volt = &thresholds.voltage;
    if snapshot.voltage <= volt.critical_low {
        warnings.push(Warning::new(
            Metric::Voltage,
            Severity::Critical,
            "⚡",
            format!("Battery voltage critically low: {:.2} V", snapshot.voltage),
        ));
    } else if snapshot.voltage <= volt.warning_low {
        warnings.push(Warning::new(
            Metric::Voltage,
            Severity::Warning,
            "⚡",
            format!("Battery voltage low: {:.2} V", snapshot.voltage),
        ));
    } else if snapshot.voltage >= volt.critical_high {
        warnings.push(Warning::new(
            Metric::Voltage,
            Severity::Critical,
            "⚡",
            format!("Battery voltage critically high: {:.2} V", snapshot.voltage),
        ));
    } else if snapshot.voltage >= volt.warning_high {
        warnings.push(Warning::new(
            Metric::Voltage,
            Severity::Warning,
            "⚡",
            format!("Battery voltage high: {:.2} V", snapshot.voltage),
        ));
    }

    let soc = &thresholds.state_of_charge;
    if snapshot.state_of_charge <= soc.critical {
        warnings.push(Warning::new(
            Metric::StateOfCharge,
            Severity::Critical,
            "🔋",
            format!(
                "Battery charge critically low: {:.1}%",
                snapshot.state_of_charge
            ),
        ));
    } else if snapshot.state_of_charge <= soc.warning {
        warnings.push(Warning::new(
            Metric::StateOfCharge,
            Severity::Warning,
            "🔋",
            format!("Battery charge low: {:.1}%", snapshot.state_of_charge),
        ));
    }

    let soh = &thresholds.state_of_health;
    if snapshot.state_of_health <= soh.critical {
        warnings.push(Warning::new(
            Metric::StateOfHealth,
            Severity::Critical,
            "🩺",
            format!(
                "Battery health critically degraded: {:.1}%",
                snapshot.state_of_health
            ),
        ));
    } else if snapshot.state_of_health <= soh.warning {
        warnings.push(Warning::new(
            Metric::StateOfHealth,
            Severity::Warning,
            "🩺",
            format!("Battery health degraded: {:.1}%", snapshot.state_of_health),
        ));
    }

    // Discharge-only checks are masked while charging.
    let discharging = snapshot.charging_state == 0;

    if discharging && snapshot.current.abs() >= thresholds.discharge_current.warning {
        warnings.push(Warning::new(
            Metric::Current,
            Severity::Warning,
            "⚠️",
            format!("High discharge current: {:.2} mA", snapshot.current.abs()),
        ));
    }

    if discharging {
        let range = &thresholds.range;
        if snapshot.estimated_range <= range.critical {
            warnings.push(Warning::new(
                Metric::Range,
                Severity::Critical,
                "🛣️",
                format!(
                    "Estimated range critically low: {:.1} km",
                    snapshot.estimated_range
                ),
            ));
        } else if snapshot.estimated_range <= range.warning {
            warnings.push(Warning::new(
                Metric::Range,
                Severity::Warning,
                "🛣️",
                format!("Estimated range low: {:.1} km", snapshot.estimated_range),
            ));
        }
    }

    warnings
}

/// Project the critical entries, in evaluator order, into the banner. Empty
/// input or warnings-only input means no banner.
pub fn aggregate(warnings: &[Warning]) -> Option<CriticalBanner> {
    let messages: Vec<String> = warnings
        .iter()
        .filter(|w| w.severity == Severity::Critical)
        .map(|w| w.message.clone())
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(CriticalBanner { messages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal() -> TelemetrySnapshot {
        TelemetrySnapshot {
            voltage: 3.8,
            current: -20.0,
            power: None,
            temperature: 25.0,
            state_of_charge: 80.0,
            state_of_health: 95.0,
            motor_state: 0,
            charging_state: 0,
            timestamp: "2024-05-01T10:00:00Z".to_string(),
            estimated_range: 192.0,
        }
    }

    fn table() -> ThresholdTable {
        ThresholdTable::default()
    }

    #[test]
    fn nominal_snapshot_is_clean() {
        let warnings = evaluate(&nominal(), &table());
        assert!(warnings.is_empty());
        assert!(aggregate(&warnings).is_none());
    }

    #[test]
    fn critical_low_charge_raises_banner() {
        let snapshot = TelemetrySnapshot {
            state_of_charge: 5.0,
            estimated_range: 120.0,
            ..nominal()
        };
        let warnings = evaluate(&snapshot, &table());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].metric, Metric::StateOfCharge);
        assert_eq!(warnings[0].severity, Severity::Critical);
        assert_eq!(warnings[0].message, "Battery charge critically low: 5.0%");

        let banner = aggregate(&warnings).unwrap();
        assert_eq!(banner.messages, vec!["Battery charge critically low: 5.0%"]);
    }

    #[test]
    fn simultaneous_criticals_keep_metric_order() {
        let snapshot = TelemetrySnapshot {
            temperature: 65.0,
            voltage: 2.5,
            ..nominal()
        };
        let warnings = evaluate(&snapshot, &table());
        let criticals: Vec<Metric> = warnings
            .iter()
            .filter(|w| w.severity == Severity::Critical)
            .map(|w| w.metric)
            .collect();
        assert_eq!(criticals, vec![Metric::Temperature, Metric::Voltage]);

        let banner = aggregate(&warnings).unwrap();
        assert_eq!(banner.messages.len(), 2);
        assert!(banner.messages[0].contains("temperature"));
        assert!(banner.messages[1].contains("voltage"));
    }

    #[test]
    fn charging_masks_discharge_current_warning() {
        let snapshot = TelemetrySnapshot {
            current: -200.0,
            charging_state: 1,
            ..nominal()
        };
        let warnings = evaluate(&snapshot, &table());
        assert!(warnings.iter().all(|w| w.metric != Metric::Current));
    }

    #[test]
    fn discharge_current_warning_fires_on_magnitude() {
        let snapshot = TelemetrySnapshot {
            current: -200.0,
            ..nominal()
        };
        let warnings = evaluate(&snapshot, &table());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].metric, Metric::Current);
        assert_eq!(warnings[0].message, "High discharge current: 200.00 mA");
    }

    #[test]
    fn charging_masks_range_warning() {
        let snapshot = TelemetrySnapshot {
            estimated_range: 5.0,
            charging_state: 1,
            ..nominal()
        };
        let warnings = evaluate(&snapshot, &table());
        assert!(warnings.iter().all(|w| w.metric != Metric::Range));
    }

    #[test]
    fn voltage_at_critical_low_is_inclusive() {
        let snapshot = TelemetrySnapshot {
            voltage: 2.8,
            ..nominal()
        };
        let warnings = evaluate(&snapshot, &table());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Critical);
    }

    #[test]
    fn voltage_between_warning_and_critical_high_fires_warning_only() {
        let snapshot = TelemetrySnapshot {
            voltage: 4.3,
            ..nominal()
        };
        let warnings = evaluate(&snapshot, &table());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
        assert_eq!(warnings[0].message, "Battery voltage high: 4.30 V");
    }

    #[test]
    fn low_temperature_is_warning_not_critical() {
        let snapshot = TelemetrySnapshot {
            temperature: -10.0,
            ..nominal()
        };
        let warnings = evaluate(&snapshot, &table());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
        assert_eq!(warnings[0].message, "Battery temperature low: -10.0°C");
    }

    #[test]
    fn at_most_one_warning_per_metric() {
        // Everything wrong at once, all on the critical tier where one exists
        let snapshot = TelemetrySnapshot {
            voltage: 0.0,
            current: -500.0,
            temperature: 70.0,
            state_of_charge: 2.0,
            state_of_health: 40.0,
            estimated_range: 1.0,
            ..nominal()
        };
        let warnings = evaluate(&snapshot, &table());
        assert_eq!(warnings.len(), 6);
        for pair in warnings.windows(2) {
            assert_ne!(pair[0].metric, pair[1].metric);
        }
    }

    #[test]
    fn all_zero_snapshot_evaluates() {
        let snapshot = TelemetrySnapshot {
            voltage: 0.0,
            current: 0.0,
            temperature: 0.0,
            state_of_charge: 0.0,
            state_of_health: 0.0,
            estimated_range: 0.0,
            ..nominal()
        };
        let warnings = evaluate(&snapshot, &table());
        // Degraded parse output still trips the low-side criticals
        assert!(
            warnings
                .iter()
                .any(|w| w.metric == Metric::Voltage && w.severity == Severity::Critical)
        );
        assert!(aggregate(&warnings).is_some());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let snapshot = TelemetrySnapshot {
            state_of_charge: 15.0,
            temperature: 50.0,
            ..nominal()
        };
        let table = table();
        assert_eq!(evaluate(&snapshot, &table), evaluate(&snapshot, &table));
    }
}
