use serde::Serialize;
use ts_rs::TS;

mod flood_control;

pub use flood_control::{
    FloodControlOptionsResponse, FormSectionResponse, PolicyResponse, SelectFieldResponse,
    SettingsFormResponse, SubmitSettingsRequest, SubmitSettingsResponse, UpdatePolicyRequest,
    ValueOptionResponse,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub backend: &'static str,
}
