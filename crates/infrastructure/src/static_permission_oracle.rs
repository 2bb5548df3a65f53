use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use flood_control_application::PermissionOracle;
use flood_control_core::AppResult;
use flood_control_domain::Capability;

/// Permission oracle backed by a fixed subject-to-capability table.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionOracle {
    grants: HashMap<String, BTreeSet<Capability>>,
}

impl StaticPermissionOracle {
    /// Creates an oracle that denies everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a capability to a subject.
    #[must_use]
    pub fn grant(mut self, subject: impl Into<String>, capability: Capability) -> Self {
        self.grants
            .entry(subject.into())
            .or_default()
            .insert(capability);
        self
    }
}

impl<S: Into<String>> FromIterator<(S, Capability)> for StaticPermissionOracle {
    fn from_iter<T: IntoIterator<Item = (S, Capability)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |oracle, (subject, capability)| {
                oracle.grant(subject, capability)
            })
    }
}

#[async_trait]
impl PermissionOracle for StaticPermissionOracle {
    async fn has_capability(&self, subject: &str, capability: Capability) -> AppResult<bool> {
        Ok(self
            .grants
            .get(subject)
            .is_some_and(|capabilities| capabilities.contains(&capability)))
    }
}

#[cfg(test)]
mod tests {
    use flood_control_application::PermissionOracle;
    use flood_control_domain::Capability;

    use super::StaticPermissionOracle;

    #[tokio::test]
    async fn only_granted_capabilities_are_reported() {
        let oracle: StaticPermissionOracle =
            [("alice", Capability::AdministerContactForms)].into_iter().collect();

        let contact = oracle
            .has_capability("alice", Capability::AdministerContactForms)
            .await;
        assert!(contact.is_ok_and(|granted| granted));

        let users = oracle
            .has_capability("alice", Capability::AdministerUsers)
            .await;
        assert!(users.is_ok_and(|granted| !granted));

        let stranger = oracle
            .has_capability("bob", Capability::AdministerContactForms)
            .await;
        assert!(stranger.is_ok_and(|granted| !granted));
    }
}
