//! Capability-gated administration of flood control settings.
//!
//! Models the admin settings form: a "Login" section for the failed-login
//! thresholds and a "Contact forms" section for the e-mail threshold, each
//! visible only to subjects holding the section's capability.

use std::str::FromStr;
use std::sync::Arc;

use flood_control_core::{AppError, AppResult};
use flood_control_domain::{Capability, FloodPolicy, PolicyName};
use tracing::warn;

use crate::flood_control_ports::PermissionOracle;
use crate::policy_config_store::{PolicyConfigStore, PolicyUpdate};

mod form;
mod submit;


pub use form::{FormSection, SelectField, SettingsForm};
pub use submit::{SettingsSubmission, SubmitOutcome};

/// Identifier of the admin settings form.
pub const SETTINGS_FORM_ID: &str = "flood_control_admin_form";

/// Confirmation shown after a successful submission.
pub const SETTINGS_SAVED_MESSAGE: &str = "The configuration options have been saved.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Limit,
    Window,
}

#[derive(Debug)]
struct FieldSpec {
    id: &'static str,
    title: &'static str,
    policy: PolicyName,
    kind: FieldKind,
}

#[derive(Debug)]
struct SectionSpec {
    key: &'static str,
    title: &'static str,
    capability: Capability,
    fields: &'static [FieldSpec],
}

const SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        key: "login",
        title: "Login",
        capability: Capability::AdministerUsers,
        fields: &[
            FieldSpec {
                id: "user_failed_login_ip_limit",
                title: "Failed login (IP) limit",
                policy: PolicyName::LoginIp,
                kind: FieldKind::Limit,
            },
            FieldSpec {
                id: "user_failed_login_ip_window",
                title: "Failed login (IP) window",
                policy: PolicyName::LoginIp,
                kind: FieldKind::Window,
            },
            FieldSpec {
                id: "user_failed_login_user_limit",
                title: "Failed login (username) limit",
                policy: PolicyName::LoginUser,
                kind: FieldKind::Limit,
            },
            FieldSpec {
                id: "user_failed_login_user_window",
                title: "Failed login (username) window",
                policy: PolicyName::LoginUser,
                kind: FieldKind::Window,
            },
        ],
    },
    SectionSpec {
        key: "contact",
        title: "Contact forms",
        capability: Capability::AdministerContactForms,
        fields: &[
            FieldSpec {
                id: "contact_threshold_limit",
                title: "Sending e-mails limit",
                policy: PolicyName::Contact,
                kind: FieldKind::Limit,
            },
            FieldSpec {
                id: "contact_threshold_window",
                title: "Sending e-mails window",
                policy: PolicyName::Contact,
                kind: FieldKind::Window,
            },
        ],
    },
];

fn find_field(id: &str) -> Option<(&'static SectionSpec, &'static FieldSpec)> {
    SECTIONS.iter().find_map(|section| {
        section
            .fields
            .iter()
            .find(|field| field.id == id)
            .map(|field| (section, field))
    })
}

/// Application service for the flood control admin surface.
#[derive(Clone)]
pub struct FloodSettingsService {
    store: PolicyConfigStore,
    oracle: Arc<dyn PermissionOracle>,
}

impl FloodSettingsService {
    /// Creates the service from a policy store and a permission oracle.
    #[must_use]
    pub fn new(store: PolicyConfigStore, oracle: Arc<dyn PermissionOracle>) -> Self {
        Self { store, oracle }
    }

    /// Returns the underlying policy store.
    #[must_use]
    pub fn store(&self) -> &PolicyConfigStore {
        &self.store
    }

    /// Returns one policy if the subject may manage it.
    pub async fn get_policy(&self, subject: &str, name: &str) -> AppResult<FloodPolicy> {
        let name = PolicyName::from_str(name)?;
        self.require_capability(subject, name.capability()).await?;
        self.store.policy(name).await
    }

    /// Returns every policy the subject may manage.
    pub async fn list_policies(&self, subject: &str) -> AppResult<Vec<FloodPolicy>> {
        let mut policies = Vec::new();
        for name in PolicyName::all() {
            if self
                .oracle
                .has_capability(subject, name.capability())
                .await?
            {
                policies.push(self.store.policy(*name).await?);
            }
        }

        Ok(policies)
    }

    /// Applies a partial update to one policy the subject may manage.
    pub async fn update_policy(
        &self,
        subject: &str,
        name: &str,
        update: PolicyUpdate,
    ) -> AppResult<FloodPolicy> {
        let name = PolicyName::from_str(name)?;
        self.require_capability(subject, name.capability()).await?;
        self.store.update_policy(name, update).await
    }

    async fn require_capability(&self, subject: &str, capability: Capability) -> AppResult<()> {
        if self.oracle.has_capability(subject, capability).await? {
            return Ok(());
        }

        warn!(
            subject = %subject,
            capability = capability.as_str(),
            "flood control access denied"
        );
        Err(AppError::Forbidden(format!(
            "subject '{subject}' is missing capability '{}'",
            capability.as_str()
        )))
    }
}
