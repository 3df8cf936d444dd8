// Domain layer - Pure telemetry, threshold and evaluation models
pub mod dashboard;
pub mod range;
pub mod telemetry;
pub mod thresholds;
pub mod warnings;
