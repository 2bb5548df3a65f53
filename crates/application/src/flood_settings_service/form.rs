use std::collections::BTreeMap;

use flood_control_core::AppResult;
use flood_control_domain::{Capability, FloodPolicy, PolicyName};

use super::{FieldKind, FloodSettingsService, SECTIONS, SETTINGS_FORM_ID, SectionSpec};
use crate::policy_config_store::ValueOption;

/// Presentation-neutral model of the admin settings form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    /// Stable form identifier.
    pub form_id: &'static str,
    /// Sections in display order.
    pub sections: Vec<FormSection>,
}

/// A group of fields gated by one capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSection {
    /// Stable section key.
    pub key: &'static str,
    /// Section heading.
    pub title: &'static str,
    /// Capability required to see and submit the section.
    pub capability: Capability,
    /// Whether the subject holds the capability.
    pub access: bool,
    /// Fields with current values; empty when `access` is false.
    pub fields: Vec<SelectField>,
}

/// A select list bound to one policy value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectField {
    /// Field identifier used in submissions.
    pub id: &'static str,
    /// Field label.
    pub title: &'static str,
    /// Policy the field edits.
    pub policy: PolicyName,
    /// Selectable values.
    pub options: Vec<ValueOption>,
    /// Currently stored value.
    pub default_value: u32,
}

impl FloodSettingsService {
    /// Builds the settings form for a subject.
    ///
    /// Policies of sections the subject cannot access are not read.
    pub async fn build_form(&self, subject: &str) -> AppResult<SettingsForm> {
        let mut policies: BTreeMap<PolicyName, FloodPolicy> = BTreeMap::new();
        let mut sections = Vec::with_capacity(SECTIONS.len());

        for section in SECTIONS {
            let access = self
                .oracle
                .has_capability(subject, section.capability)
                .await?;
            let fields = if access {
                self.section_fields(section, &mut policies).await?
            } else {
                Vec::new()
            };

            sections.push(FormSection {
                key: section.key,
                title: section.title,
                capability: section.capability,
                access,
                fields,
            });
        }

        Ok(SettingsForm {
            form_id: SETTINGS_FORM_ID,
            sections,
        })
    }

    async fn section_fields(
        &self,
        section: &SectionSpec,
        policies: &mut BTreeMap<PolicyName, FloodPolicy>,
    ) -> AppResult<Vec<SelectField>> {
        let mut fields = Vec::with_capacity(section.fields.len());

        for field in section.fields {
            let policy = match policies.get(&field.policy) {
                Some(policy) => *policy,
                None => {
                    let policy = self.store.policy(field.policy).await?;
                    policies.insert(field.policy, policy);
                    policy
                }
            };

            let (options, default_value) = match field.kind {
                FieldKind::Limit => (self.store.limit_options(), policy.limit().value()),
                FieldKind::Window => (
                    self.store
                        .window_options(field.policy.allows_disabling()),
                    policy.window().seconds(),
                ),
            };

            fields.push(SelectField {
                id: field.id,
                title: field.title,
                policy: field.policy,
                options,
                default_value,
            });
        }

        Ok(fields)
    }
}
