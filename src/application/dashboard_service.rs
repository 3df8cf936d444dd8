// Dashboard service - fetch, enrich and evaluate use cases
use crate::application::telemetry_provider::{ProviderError, TelemetryProvider};
use crate::domain::dashboard::DashboardFrame;
use crate::domain::range::RangeEstimator;
use crate::domain::telemetry::{FieldMap, HistoryEntry, TelemetrySnapshot};
use crate::domain::thresholds::ThresholdTable;
use crate::domain::warnings;
use std::sync::Arc;

/// Provider-capped recent window served by the history endpoint.
pub const HISTORY_WINDOW: usize = 10;

#[derive(Clone)]
pub struct DashboardService {
    provider: Arc<dyn TelemetryProvider>,
    thresholds: ThresholdTable,
    estimator: RangeEstimator,
    fields: FieldMap,
}

impl DashboardService {
    pub fn new(
        provider: Arc<dyn TelemetryProvider>,
        thresholds: ThresholdTable,
        estimator: RangeEstimator,
        fields: FieldMap,
    ) -> Self {
        Self {
            provider,
            thresholds,
            estimator,
            fields,
        }
    }

    /// One full evaluation cycle: fetch the latest record, normalize it,
    /// enrich it with the estimated range and run the warning chain.
    pub async fn latest_frame(&self) -> Result<DashboardFrame, ProviderError> {
        let record = self.provider.latest_record().await?;
        let snapshot = TelemetrySnapshot::from_record(&record, &self.fields);
        let estimated_range = self
            .estimator
            .estimate(snapshot.state_of_charge, snapshot.temperature);
        let snapshot = snapshot.with_estimated_range(estimated_range);

        let warnings = warnings::evaluate(&snapshot, &self.thresholds);
        let alert = warnings::aggregate(&warnings);

        Ok(DashboardFrame {
            snapshot,
            warnings,
            alert,
        })
    }

    /// Charge/health history over the recent window, oldest-first.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ProviderError> {
        let records = self.provider.recent_records(HISTORY_WINDOW).await?;
        if records.is_empty() {
            return Err(ProviderError::NoData);
        }
        Ok(records
            .iter()
            .map(|record| HistoryEntry::from_record(record, &self.fields))
            .collect())
    }

    /// Relay the motor command upstream. Input validation happens at the
    /// presentation boundary before any write is attempted.
    pub async fn set_motor_state(&self, mode: u8) -> Result<u64, ProviderError> {
        self.provider.write_motor_state(mode).await
    }
}
