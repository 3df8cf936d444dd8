// Service configuration
use crate::domain::range::RangeEstimator;
use crate::domain::telemetry::FieldMap;
use crate::domain::thresholds::ThresholdTable;
use anyhow::ensure;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub provider: ProviderSettings,
    #[serde(default)]
    pub thresholds: ThresholdTable,
    #[serde(default)]
    pub range: RangeEstimator,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub channel_id: String,
    pub read_key: String,
    pub write_key: String,
    #[serde(default)]
    pub fields: FieldMap,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RefreshSettings {
    pub interval_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self { interval_secs: 15 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub listen_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.thingspeak.com".to_string()
}

/// Load and validate configuration from `config/dashboard` plus
/// `EVDASH_`-prefixed environment overrides (e.g. `EVDASH_PROVIDER__READ_KEY`).
/// Missing or empty channel credentials are fatal.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("EVDASH").separator("__"))
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> anyhow::Result<()> {
    ensure!(
        !config.provider.channel_id.trim().is_empty(),
        "provider channel_id must be configured"
    );
    ensure!(
        !config.provider.read_key.trim().is_empty(),
        "provider read_key must be configured"
    );
    ensure!(
        !config.provider.write_key.trim().is_empty(),
        "provider write_key must be configured"
    );
    ensure!(
        config.refresh.interval_secs > 0,
        "refresh interval_secs must be positive"
    );
    config.thresholds.validate()?;
    Ok(())
}
