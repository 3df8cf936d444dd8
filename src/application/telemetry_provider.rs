// Provider trait for cloud channel access
use crate::domain::telemetry::FeedRecord;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The channel answered but carried no entries. Distinguished from a
    /// transport failure so callers can report it without treating the
    /// stream as down.
    #[error("no telemetry data available")]
    NoData,

    /// Transport or HTTP-level failure talking to the channel, with the
    /// upstream message attached.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// The channel accepted the request but refused the operation, for
    /// example a rate-limited write.
    #[error("rejected by provider: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait TelemetryProvider: Send + Sync {
    /// Fetch the most recent feed entry.
    async fn latest_record(&self) -> Result<FeedRecord, ProviderError>;

    /// Fetch the most recent `count` feed entries, oldest-first as the
    /// provider returns them.
    async fn recent_records(&self, count: usize) -> Result<Vec<FeedRecord>, ProviderError>;

    /// Write the motor on/off command to the channel's motor field and
    /// return the provider-assigned entry id.
    async fn write_motor_state(&self, mode: u8) -> Result<u64, ProviderError>;
}
