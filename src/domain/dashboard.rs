// Dashboard domain model
use crate::domain::telemetry::TelemetrySnapshot;
use crate::domain::warnings::{CriticalBanner, Warning};

/// Output of one evaluation cycle: the enriched snapshot together with its
/// warnings and the optional critical banner.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardFrame {
    pub snapshot: TelemetrySnapshot,
    pub warnings: Vec<Warning>,
    pub alert: Option<CriticalBanner>,
}

/// What the presentation boundary sees: the last successfully built frame
/// and whether the telemetry stream is currently reachable. A failed
/// refresh cycle flips `connected` without touching `frame`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub connected: bool,
    pub frame: Option<DashboardFrame>,
}

impl DisplayState {
    pub fn with_frame(frame: DashboardFrame) -> Self {
        Self {
            connected: true,
            frame: Some(frame),
        }
    }

    pub fn disconnected(&self) -> Self {
        Self {
            connected: false,
            frame: self.frame.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(soc: f64) -> DashboardFrame {
        DashboardFrame {
            snapshot: TelemetrySnapshot {
                voltage: 3.8,
                current: -20.0,
                power: None,
                temperature: 25.0,
                state_of_charge: soc,
                state_of_health: 95.0,
                motor_state: 0,
                charging_state: 0,
                timestamp: "2024-05-01T10:00:00Z".to_string(),
                estimated_range: 192.0,
            },
            warnings: Vec::new(),
            alert: None,
        }
    }

    #[test]
    fn starts_disconnected_and_empty() {
        let state = DisplayState::default();
        assert!(!state.connected);
        assert!(state.frame.is_none());
    }

    #[test]
    fn disconnect_preserves_last_frame() {
        let state = DisplayState::with_frame(frame(80.0));
        let offline = state.disconnected();
        assert!(!offline.connected);
        assert_eq!(offline.frame, state.frame);
    }
}
