mod cors;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use flood_control_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

use self::cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/flood-control/options",
            get(handlers::flood_control::options_handler),
        )
        .route(
            "/api/flood-control/policies",
            get(handlers::flood_control::list_policies_handler),
        )
        .route(
            "/api/flood-control/policies/{policy_name}",
            get(handlers::flood_control::get_policy_handler)
                .put(handlers::flood_control::update_policy_handler),
        )
        .route(
            "/api/flood-control/settings-form",
            get(handlers::flood_control::settings_form_handler)
                .post(handlers::flood_control::submit_settings_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_operator,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
