use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use flood_control_core::AppError;
use tracing::warn;

use crate::error::ApiResult;
use crate::state::AppState;


/// Authenticated operator resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub subject: String,
}

pub async fn require_operator(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| AppError::Unauthorized("bearer token required".to_owned()))?;

    let Some(subject) = state.operator_tokens.get(token) else {
        warn!(path = %request.uri().path(), "rejected unknown operator token");
        return Err(AppError::Unauthorized("unknown operator token".to_owned()).into());
    };

    let operator = Operator {
        subject: subject.as_str().to_owned(),
    };
    request.extensions_mut().insert(operator);
    Ok(next.run(request).await)
}
