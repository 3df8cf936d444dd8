// Periodic refresh loop with single-flight fetches
use crate::application::dashboard_service::DashboardService;
use crate::application::telemetry_provider::ProviderError;
use crate::domain::dashboard::{DashboardFrame, DisplayState};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Polls the dashboard service on a fixed interval and publishes the
/// resulting display state on a watch channel.
///
/// The fetch is awaited inside the tick arm, so a second fetch can never
/// start while one is outstanding; ticks that back up behind a slow fetch
/// are skipped rather than queued.
pub struct RefreshLoop {
    service: DashboardService,
    interval: Duration,
}

/// Handle to a spawned refresh loop. Dropping it without calling `stop`
/// leaves the task running for the life of the process.
pub struct RefreshHandle {
    state: watch::Receiver<DisplayState>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn state(&self) -> watch::Receiver<DisplayState> {
        self.state.clone()
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

impl RefreshLoop {
    pub fn new(service: DashboardService, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub fn spawn(self) -> RefreshHandle {
        let RefreshLoop { service, interval } = self;
        let (state_tx, state_rx) = watch::channel(DisplayState::default());
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        let outcome = service.latest_frame().await;
                        let previous = state_tx.borrow().clone();
                        let next = advance(&previous, outcome);
                        log_transition(&previous, &next);
                        let _ = state_tx.send(next);
                    }
                }
            }
        });

        RefreshHandle {
            state: state_rx,
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Fold one cycle's outcome into the display state. A failed cycle reports
/// connectivity down without altering the last successfully built frame;
/// the retry is simply the next scheduled tick.
pub fn advance(
    previous: &DisplayState,
    outcome: Result<DashboardFrame, ProviderError>,
) -> DisplayState {
    match outcome {
        Ok(frame) => DisplayState::with_frame(frame),
        Err(_) => previous.disconnected(),
    }
}

fn log_transition(previous: &DisplayState, next: &DisplayState) {
    if previous.connected && !next.connected {
        tracing::warn!("telemetry stream offline, keeping last displayed reading");
    } else if !previous.connected && next.connected {
        tracing::info!("telemetry stream online");
    }

    if let Some(frame) = &next.frame {
        if let Some(alert) = &frame.alert {
            for message in &alert.messages {
                tracing::warn!("critical alert: {message}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::tests::{record, service_with};

    fn nominal_record() -> crate::domain::telemetry::FeedRecord {
        record(&[
            ("field1", "3.8"),
            ("field2", "-20"),
            ("field4", "25"),
            ("field5", "80"),
            ("field6", "95"),
        ])
    }

    #[test]
    fn advance_success_replaces_frame_and_connects() {
        let frame = DashboardFrame {
            snapshot: crate::domain::telemetry::TelemetrySnapshot::from_record(
                &nominal_record(),
                &crate::domain::telemetry::FieldMap::default(),
            ),
            warnings: Vec::new(),
            alert: None,
        };
        let state = advance(&DisplayState::default(), Ok(frame.clone()));
        assert!(state.connected);
        assert_eq!(state.frame, Some(frame));
    }

    #[test]
    fn advance_failure_preserves_last_frame() {
        let frame = DashboardFrame {
            snapshot: crate::domain::telemetry::TelemetrySnapshot::from_record(
                &nominal_record(),
                &crate::domain::telemetry::FieldMap::default(),
            ),
            warnings: Vec::new(),
            alert: None,
        };
        let connected = DisplayState::with_frame(frame.clone());
        let state = advance(&connected, Err(ProviderError::Upstream("timeout".into())));
        assert!(!state.connected);
        assert_eq!(state.frame, Some(frame));
    }

    #[tokio::test(start_paused = true)]
    async fn loop_publishes_first_frame_and_stops() {
        let service = service_with(vec![nominal_record()]);
        let handle = RefreshLoop::new(service, Duration::from_secs(15)).spawn();

        let mut state = handle.state();
        state.changed().await.unwrap();
        {
            let published = state.borrow();
            assert!(published.connected);
            assert!(published.frame.is_some());
        }

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn loop_reports_offline_on_empty_feed() {
        let service = service_with(Vec::new());
        let handle = RefreshLoop::new(service, Duration::from_secs(15)).spawn();

        let mut state = handle.state();
        state.changed().await.unwrap();
        {
            let published = state.borrow();
            assert!(!published.connected);
            assert!(published.frame.is_none());
        }

        handle.stop().await;
    }
}
