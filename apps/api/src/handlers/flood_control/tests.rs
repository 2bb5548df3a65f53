use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use flood_control_application::{FloodSettingsService, PolicyConfigStore};
use flood_control_domain::Capability;
use flood_control_infrastructure::{InMemoryConfigBackend, StaticPermissionOracle};
use serde_json::json;

use crate::dto::{SubmitSettingsRequest, UpdatePolicyRequest};
use crate::error::ApiError;
use crate::middleware::Operator;
use crate::state::AppState;

use super::{
    get_policy_handler, list_policies_handler, options_handler, settings_form_handler,
    submit_settings_handler, update_policy_handler,
};

fn test_state() -> AppState {
    let oracle = StaticPermissionOracle::new()
        .grant("alice", Capability::AdministerUsers)
        .grant("alice", Capability::AdministerContactForms)
        .grant("carol", Capability::AdministerContactForms);
    let store = PolicyConfigStore::new(Arc::new(InMemoryConfigBackend::with_defaults()));

    AppState {
        settings_service: FloodSettingsService::new(store, Arc::new(oracle)),
        operator_tokens: Arc::new(HashMap::new()),
        backend_name: "memory",
    }
}

fn operator(subject: &str) -> Extension<Operator> {
    Extension(Operator {
        subject: subject.to_owned(),
    })
}

fn status_of(error: ApiError) -> StatusCode {
    error.into_response().status()
}

#[tokio::test]
async fn options_list_both_domains() {
    let Json(options) = options_handler(State(test_state())).await;

    assert_eq!(options.limits.len(), 21);
    assert_eq!(options.windows.len(), 14);
    assert_eq!(options.windows[0].value, 0);
    assert_eq!(options.windows[0].label, "None (disabled)");
}

#[tokio::test]
async fn policy_update_round_trips_through_handlers() {
    let state = test_state();

    let updated = update_policy_handler(
        State(state.clone()),
        operator("alice"),
        Path("login_ip".to_owned()),
        Json(UpdatePolicyRequest {
            limit: Some(10),
            window: Some(300),
        }),
    )
    .await;
    assert!(updated.is_ok());

    let fetched = get_policy_handler(State(state), operator("alice"), Path("login_ip".to_owned()))
        .await;
    let Ok(Json(policy)) = fetched else {
        panic!("policy should be readable");
    };
    assert_eq!(policy.limit, 10);
    assert_eq!(policy.window, 300);
    assert_eq!(policy.window_label, "5 minutes");
}

#[tokio::test]
async fn errors_map_to_http_statuses() {
    let state = test_state();

    let unknown = get_policy_handler(
        State(state.clone()),
        operator("alice"),
        Path("unknown_name".to_owned()),
    )
    .await;
    assert!(unknown.is_err_and(|error| status_of(error) == StatusCode::NOT_FOUND));

    let forbidden = get_policy_handler(
        State(state.clone()),
        operator("carol"),
        Path("login_user".to_owned()),
    )
    .await;
    assert!(forbidden.is_err_and(|error| status_of(error) == StatusCode::FORBIDDEN));

    let invalid = update_policy_handler(
        State(state),
        operator("carol"),
        Path("contact".to_owned()),
        Json(UpdatePolicyRequest {
            limit: Some(11),
            window: None,
        }),
    )
    .await;
    assert!(invalid.is_err_and(|error| status_of(error) == StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn list_policies_is_scoped_to_capabilities() {
    let response = list_policies_handler(State(test_state()), operator("carol")).await;
    let Ok(Json(policies)) = response else {
        panic!("listing should succeed");
    };

    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].name, "contact");
}

#[tokio::test]
async fn settings_form_submission_saves_values() {
    let state = test_state();

    let form = settings_form_handler(State(state.clone()), operator("carol")).await;
    let Ok(Json(form)) = form else {
        panic!("form should render");
    };
    assert_eq!(form.form_id, "flood_control_admin_form");
    assert!(!form.sections[0].access);
    assert_eq!(form.sections[1].fields[1].id, "contact_threshold_window");

    let request = serde_json::from_value::<SubmitSettingsRequest>(json!({
        "values": {
            "contact_threshold_limit": 20,
            "contact_threshold_window": 0
        }
    }));
    assert!(request.is_ok());
    let Ok(request) = request else {
        return;
    };

    let saved = submit_settings_handler(State(state), operator("carol"), Json(request)).await;
    let Ok(Json(saved)) = saved else {
        panic!("submission should be saved");
    };
    assert_eq!(saved.message, "The configuration options have been saved.");
    assert_eq!(saved.policies.len(), 1);
    assert_eq!(saved.policies[0].limit, 20);
    assert_eq!(saved.policies[0].window_label, "None (disabled)");
}
