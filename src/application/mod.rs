// Application layer - Use cases over the provider trait
pub mod dashboard_service;
pub mod refresh;
pub mod telemetry_provider;
