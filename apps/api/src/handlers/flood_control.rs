use axum::Json;
use axum::extract::{Extension, Path, State};
use flood_control_application::PolicyUpdate;

use crate::dto::{
    FloodControlOptionsResponse, PolicyResponse, SettingsFormResponse, SubmitSettingsRequest,
    SubmitSettingsResponse, UpdatePolicyRequest, ValueOptionResponse,
};
use crate::error::ApiResult;
use crate::middleware::Operator;
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub async fn options_handler(State(state): State<AppState>) -> Json<FloodControlOptionsResponse> {
    let store = state.settings_service.store();

    Json(FloodControlOptionsResponse {
        limits: store
            .limit_options()
            .into_iter()
            .map(ValueOptionResponse::from)
            .collect(),
        windows: store
            .window_options(true)
            .into_iter()
            .map(ValueOptionResponse::from)
            .collect(),
    })
}

pub async fn list_policies_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
) -> ApiResult<Json<Vec<PolicyResponse>>> {
    let policies = state
        .settings_service
        .list_policies(operator.subject.as_str())
        .await?
        .into_iter()
        .map(PolicyResponse::from)
        .collect();

    Ok(Json(policies))
}

pub async fn get_policy_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(policy_name): Path<String>,
) -> ApiResult<Json<PolicyResponse>> {
    let policy = state
        .settings_service
        .get_policy(operator.subject.as_str(), policy_name.as_str())
        .await?;

    Ok(Json(PolicyResponse::from(policy)))
}

pub async fn update_policy_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(policy_name): Path<String>,
    Json(payload): Json<UpdatePolicyRequest>,
) -> ApiResult<Json<PolicyResponse>> {
    let policy = state
        .settings_service
        .update_policy(
            operator.subject.as_str(),
            policy_name.as_str(),
            PolicyUpdate {
                limit: payload.limit,
                window: payload.window,
            },
        )
        .await?;

    Ok(Json(PolicyResponse::from(policy)))
}

pub async fn settings_form_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
) -> ApiResult<Json<SettingsFormResponse>> {
    let form = state
        .settings_service
        .build_form(operator.subject.as_str())
        .await?;

    Ok(Json(SettingsFormResponse::from(form)))
}

pub async fn submit_settings_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Json(payload): Json<SubmitSettingsRequest>,
) -> ApiResult<Json<SubmitSettingsResponse>> {
    let outcome = state
        .settings_service
        .submit(operator.subject.as_str(), payload.into())
        .await?;

    Ok(Json(SubmitSettingsResponse::from(outcome)))
}
