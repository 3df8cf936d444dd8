// HTTP request handlers
use crate::application::telemetry_provider::ProviderError;
use crate::domain::dashboard::DashboardFrame;
use crate::domain::telemetry::HistoryEntry;
use crate::domain::warnings::{CriticalBanner, Warning};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Common `{success, data?, message?}` envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Wire view of the latest frame. State of charge and health are clamped to
/// [0, 100] here, at presentation time only; `chargingStatus` is kept as an
/// alias of `chargingState` for older dashboard builds.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub voltage: f64,
    pub current: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    pub temperature: f64,
    pub state_of_charge: f64,
    pub state_of_health: f64,
    pub motor_state: u8,
    pub charging_state: u8,
    pub charging_status: u8,
    pub timestamp: String,
    pub estimated_range: f64,
    pub warnings: Vec<Warning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<CriticalBanner>,
}

impl From<DashboardFrame> for DashboardView {
    fn from(frame: DashboardFrame) -> Self {
        let snapshot = frame.snapshot;
        Self {
            voltage: snapshot.voltage,
            current: snapshot.current,
            power: snapshot.power,
            temperature: snapshot.temperature,
            state_of_charge: snapshot.state_of_charge.clamp(0.0, 100.0),
            state_of_health: snapshot.state_of_health.clamp(0.0, 100.0),
            motor_state: snapshot.motor_state,
            charging_state: snapshot.charging_state,
            charging_status: snapshot.charging_state,
            timestamp: snapshot.timestamp,
            estimated_range: snapshot.estimated_range,
            warnings: frame.warnings,
            alert: frame.alert,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

/// Latest snapshot with warnings and alert banner
pub async fn get_data(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.latest_frame().await {
        Ok(frame) => {
            let view = DashboardView::from(frame);
            (StatusCode::OK, Json(ApiResponse::ok(view))).into_response()
        }
        Err(e) => provider_error_response(e),
    }
}

/// Recent charge/health window, oldest-first
pub async fn get_history(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.history().await {
        Ok(entries) => {
            (StatusCode::OK, Json(ApiResponse::<Vec<HistoryEntry>>::ok(entries))).into_response()
        }
        Err(e) => provider_error_response(e),
    }
}

/// Motor on/off command relay
pub async fn set_mode(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> Response {
    if !is_valid_mode(request.mode) {
        let body = ModeResponse {
            success: false,
            message: "mode must be 0 or 1".to_string(),
            entry_id: None,
        };
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    match state.dashboard_service.set_motor_state(request.mode as u8).await {
        Ok(entry_id) => {
            let body = ModeResponse {
                success: true,
                message: format!("motor state set to {}", request.mode),
                entry_id: Some(entry_id),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!("motor command failed: {e}");
            let body = ModeResponse {
                success: false,
                message: e.to_string(),
                entry_id: None,
            };
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    }
}

/// Liveness probe
pub async fn health_check() -> Response {
    let body = HealthResponse {
        success: true,
        message: "ev-battery-telemetry up".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Rejected commands never reach the provider.
fn is_valid_mode(mode: i64) -> bool {
    mode == 0 || mode == 1
}

fn provider_error_response(error: ProviderError) -> Response {
    let status = match &error {
        // A dry channel is an answer, not a transport failure
        ProviderError::NoData => StatusCode::OK,
        ProviderError::Upstream(_) | ProviderError::Rejected(_) => StatusCode::BAD_GATEWAY,
    };
    if status != StatusCode::OK {
        tracing::error!("provider request failed: {error}");
    }
    (
        status,
        Json(ApiResponse::<serde_json::Value>::error(error.to_string())),
    )
        .into_response()
}
