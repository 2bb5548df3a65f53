use std::collections::{BTreeMap, BTreeSet};

use flood_control_core::{AppError, AppResult};
use flood_control_domain::{Capability, FloodLimit, FloodPolicy, FloodWindow, PolicyName};
use tracing::{info, warn};

use super::{FieldKind, FieldSpec, FloodSettingsService, SETTINGS_SAVED_MESSAGE, find_field};
use crate::policy_config_store::PolicyUpdate;

/// Submitted form values keyed by field id. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSubmission {
    values: BTreeMap<String, u32>,
}

impl SettingsSubmission {
    /// Creates an empty submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one submitted field value.
    #[must_use]
    pub fn with_value(mut self, field_id: impl Into<String>, value: u32) -> Self {
        self.values.insert(field_id.into(), value);
        self
    }

    /// Returns whether no field was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, u32)> for SettingsSubmission {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Confirmation message for the operator.
    pub message: &'static str,
    /// Stored state of every policy touched by the submission.
    pub policies: Vec<FloodPolicy>,
}

impl FloodSettingsService {
    /// Validates and saves a settings form submission.
    ///
    /// Fails with `Validation` for unknown field ids, `Forbidden` for fields
    /// in a section the subject cannot access, and `InvalidValue` naming the
    /// form field for out-of-domain values. No write happens on any of these.
    pub async fn submit(
        &self,
        subject: &str,
        submission: SettingsSubmission,
    ) -> AppResult<SubmitOutcome> {
        let mut granted: BTreeSet<Capability> = BTreeSet::new();
        let mut updates: BTreeMap<PolicyName, PolicyUpdate> = BTreeMap::new();

        for (field_id, value) in &submission.values {
            let Some((section, field)) = find_field(field_id) else {
                return Err(AppError::Validation(format!(
                    "unknown settings field '{field_id}'"
                )));
            };

            if !granted.contains(&section.capability) {
                if !self
                    .oracle
                    .has_capability(subject, section.capability)
                    .await?
                {
                    warn!(
                        subject = %subject,
                        field = field.id,
                        capability = section.capability.as_str(),
                        "rejected flood control submission"
                    );
                    return Err(AppError::Forbidden(format!(
                        "subject '{subject}' cannot change '{}' settings",
                        section.title
                    )));
                }
                granted.insert(section.capability);
            }

            validate_field(field, *value)?;
            let update = updates.entry(field.policy).or_default();
            match field.kind {
                FieldKind::Limit => update.limit = Some(*value),
                FieldKind::Window => update.window = Some(*value),
            }
        }

        let batch: Vec<(PolicyName, PolicyUpdate)> = updates.into_iter().collect();
        let policies = self.store.apply_updates(&batch).await?;

        info!(
            subject = %subject,
            policy_count = policies.len(),
            "flood control settings form saved"
        );

        Ok(SubmitOutcome {
            message: SETTINGS_SAVED_MESSAGE,
            policies,
        })
    }
}

fn validate_field(field: &FieldSpec, value: u32) -> AppResult<()> {
    let result = match field.kind {
        FieldKind::Limit => FloodLimit::new(value).map(|_| ()),
        FieldKind::Window => FloodWindow::new(value)
            .and_then(|window| field.policy.check_window(window))
            .map(|_| ()),
    };

    result.map_err(|error| match error {
        AppError::InvalidValue { message, .. } => AppError::invalid_value(field.id, message),
        other => other,
    })
}
