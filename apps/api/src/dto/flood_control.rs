use std::collections::BTreeMap;

use flood_control_application::{
    FormSection, SelectField, SettingsForm, SettingsSubmission, SubmitOutcome, ValueOption,
};
use flood_control_domain::{FloodPolicy, format_window};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a flood control policy.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flood-policy-response.ts"
)]
pub struct PolicyResponse {
    pub name: String,
    pub limit: u32,
    pub window: u32,
    pub window_label: String,
}

impl From<FloodPolicy> for PolicyResponse {
    fn from(value: FloodPolicy) -> Self {
        Self {
            name: value.name().as_str().to_owned(),
            limit: value.limit().value(),
            window: value.window().seconds(),
            window_label: format_window(value.window().seconds()),
        }
    }
}

/// Incoming payload for a partial policy update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-flood-policy-request.ts"
)]
pub struct UpdatePolicyRequest {
    pub limit: Option<u32>,
    pub window: Option<u32>,
}

/// One selectable value with its label.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/value-option-response.ts"
)]
pub struct ValueOptionResponse {
    pub value: u32,
    pub label: String,
}

impl From<ValueOption> for ValueOptionResponse {
    fn from(value: ValueOption) -> Self {
        Self {
            value: value.value,
            label: value.label,
        }
    }
}

/// Allowed limit and window values.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flood-control-options-response.ts"
)]
pub struct FloodControlOptionsResponse {
    pub limits: Vec<ValueOptionResponse>,
    pub windows: Vec<ValueOptionResponse>,
}

/// API representation of the settings form.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/settings-form-response.ts"
)]
pub struct SettingsFormResponse {
    pub form_id: String,
    pub sections: Vec<FormSectionResponse>,
}

impl From<SettingsForm> for SettingsFormResponse {
    fn from(value: SettingsForm) -> Self {
        Self {
            form_id: value.form_id.to_owned(),
            sections: value
                .sections
                .into_iter()
                .map(FormSectionResponse::from)
                .collect(),
        }
    }
}

/// API representation of one settings form section.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/form-section-response.ts"
)]
pub struct FormSectionResponse {
    pub key: String,
    pub title: String,
    pub capability: String,
    pub access: bool,
    pub fields: Vec<SelectFieldResponse>,
}

impl From<FormSection> for FormSectionResponse {
    fn from(value: FormSection) -> Self {
        Self {
            key: value.key.to_owned(),
            title: value.title.to_owned(),
            capability: value.capability.as_str().to_owned(),
            access: value.access,
            fields: value
                .fields
                .into_iter()
                .map(SelectFieldResponse::from)
                .collect(),
        }
    }
}

/// API representation of one select field.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/select-field-response.ts"
)]
pub struct SelectFieldResponse {
    pub id: String,
    pub title: String,
    pub policy: String,
    pub options: Vec<ValueOptionResponse>,
    pub default_value: u32,
}

impl From<SelectField> for SelectFieldResponse {
    fn from(value: SelectField) -> Self {
        Self {
            id: value.id.to_owned(),
            title: value.title.to_owned(),
            policy: value.policy.as_str().to_owned(),
            options: value
                .options
                .into_iter()
                .map(ValueOptionResponse::from)
                .collect(),
            default_value: value.default_value,
        }
    }
}

/// Incoming settings form submission keyed by field id.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-settings-request.ts"
)]
pub struct SubmitSettingsRequest {
    pub values: BTreeMap<String, u32>,
}

impl From<SubmitSettingsRequest> for SettingsSubmission {
    fn from(value: SubmitSettingsRequest) -> Self {
        value.values.into_iter().collect()
    }
}

/// Result of a saved settings form submission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-settings-response.ts"
)]
pub struct SubmitSettingsResponse {
    pub message: String,
    pub policies: Vec<PolicyResponse>,
}

impl From<SubmitOutcome> for SubmitSettingsResponse {
    fn from(value: SubmitOutcome) -> Self {
        Self {
            message: value.message.to_owned(),
            policies: value
                .policies
                .into_iter()
                .map(PolicyResponse::from)
                .collect(),
        }
    }
}
