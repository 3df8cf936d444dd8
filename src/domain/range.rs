// Range estimation domain model
use serde::Deserialize;

/// Parameters for the full range model: usable pack capacity, nominal
/// driving efficiency and the comfort band outside which the battery is
/// derated.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RangeModel {
    pub capacity_kwh: f64,
    pub efficiency_km_per_kwh: f64,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
}

/// Derives estimated remaining range from state of charge and temperature.
///
/// Pure and deterministic. `SocPercent` is the simple channel variant that
/// reports range in an arbitrary unit equal to percent of charge; `Model`
/// is the reference behavior.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RangeEstimator {
    SocPercent,
    Model(RangeModel),
}

impl Default for RangeEstimator {
    fn default() -> Self {
        RangeEstimator::Model(RangeModel {
            capacity_kwh: 40.0,
            efficiency_km_per_kwh: 6.0,
            min_temp_c: 0.0,
            max_temp_c: 35.0,
        })
    }
}

impl RangeEstimator {
    pub fn estimate(&self, state_of_charge: f64, temperature: f64) -> f64 {
        match self {
            RangeEstimator::SocPercent => round_tenth(state_of_charge),
            RangeEstimator::Model(model) => {
                let base =
                    (state_of_charge / 100.0) * model.capacity_kwh * model.efficiency_km_per_kwh;
                let temp_factor = if temperature < model.min_temp_c {
                    // cold derating
                    0.8
                } else if temperature > model.max_temp_c {
                    // heat derating
                    0.9
                } else {
                    1.0
                };
                round_tenth(base * temp_factor)
            }
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
