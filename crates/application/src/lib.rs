//! Application services and ports.

#![forbid(unsafe_code)]

mod flood_control_ports;
mod flood_settings_service;
mod policy_config_store;

pub use flood_control_ports::{ConfigBackend, ConfigChangeSet, PermissionOracle};
pub use flood_settings_service::{
    FloodSettingsService, FormSection, SETTINGS_FORM_ID, SETTINGS_SAVED_MESSAGE, SelectField,
    SettingsForm, SettingsSubmission, SubmitOutcome,
};
pub use policy_config_store::{PolicyConfigStore, PolicyUpdate, ValueOption};
