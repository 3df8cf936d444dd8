// Declarative warning/critical boundaries per metric
use anyhow::{Result, ensure};
use serde::Deserialize;

/// Temperature fires on both sides: high readings have warning and critical
/// tiers, low readings a single warning tier.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TemperatureThresholds {
    pub warning_low: f64,
    pub warning_high: f64,
    pub critical_high: f64,
}

/// Four-tier voltage band.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VoltageThresholds {
    pub critical_low: f64,
    pub warning_low: f64,
    pub warning_high: f64,
    pub critical_high: f64,
}

/// Low-side pair used by state of charge, state of health and range.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LowSideThresholds {
    pub warning: f64,
    pub critical: f64,
}

/// Single warning tier on the discharge current magnitude.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DischargeCurrentThreshold {
    pub warning: f64,
}

/// Process-wide threshold configuration, loaded once at startup and never
/// mutated during evaluation. Defaults can be overridden per block from the
/// configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThresholdTable {
    pub temperature: TemperatureThresholds,
    pub voltage: VoltageThresholds,
    pub state_of_charge: LowSideThresholds,
    pub state_of_health: LowSideThresholds,
    pub discharge_current: DischargeCurrentThreshold,
    pub range: LowSideThresholds,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            temperature: TemperatureThresholds {
                warning_low: 0.0,
                warning_high: 45.0,
                critical_high: 60.0,
            },
            voltage: VoltageThresholds {
                critical_low: 2.8,
                warning_low: 3.0,
                warning_high: 4.2,
                critical_high: 4.5,
            },
            state_of_charge: LowSideThresholds {
                warning: 20.0,
                critical: 10.0,
            },
            state_of_health: LowSideThresholds {
                warning: 80.0,
                critical: 60.0,
            },
            discharge_current: DischargeCurrentThreshold { warning: 100.0 },
            range: LowSideThresholds {
                warning: 30.0,
                critical: 10.0,
            },
        }
    }
}

impl ThresholdTable {
    /// Reject inverted bounds once at load time instead of trusting the
    /// table blindly during every evaluation cycle.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.temperature.warning_low < self.temperature.warning_high,
            "temperature warning_low must be below warning_high"
        );
        ensure!(
            self.temperature.warning_high <= self.temperature.critical_high,
            "temperature warning_high must not exceed critical_high"
        );
        ensure!(
            self.voltage.critical_low <= self.voltage.warning_low,
            "voltage critical_low must not exceed warning_low"
        );
        ensure!(
            self.voltage.warning_low < self.voltage.warning_high,
            "voltage warning_low must be below warning_high"
        );
        ensure!(
            self.voltage.warning_high <= self.voltage.critical_high,
            "voltage warning_high must not exceed critical_high"
        );
        ensure!(
            self.state_of_charge.critical <= self.state_of_charge.warning,
            "state_of_charge critical must not exceed warning"
        );
        ensure!(
            self.state_of_health.critical <= self.state_of_health.warning,
            "state_of_health critical must not exceed warning"
        );
        ensure!(
            self.range.critical <= self.range.warning,
            "range critical must not exceed warning"
        );
        Ok(())
    }
}
