use std::collections::HashMap;
use std::sync::Arc;

use flood_control_application::FloodSettingsService;
use flood_control_core::NonEmptyString;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub settings_service: FloodSettingsService,
    pub operator_tokens: Arc<HashMap<String, NonEmptyString>>,
    pub backend_name: &'static str,
}
