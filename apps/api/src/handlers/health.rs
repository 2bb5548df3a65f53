use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let ready = match state.settings_service.store().list_policies().await {
        Ok(_) => true,
        Err(error) => {
            warn!(backend = state.backend_name, %error, "flood control backend is not ready");
            false
        }
    };

    let (http_status, status) = if ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            ready,
            backend: state.backend_name,
        }),
    )
}
