use std::collections::BTreeMap;
use std::str::FromStr;

use flood_control_core::AppResult;
use flood_control_domain::{ConfigGroup, FloodLimit, FloodPolicy, FloodWindow, PolicyName};
use tracing::info;

use super::PolicyConfigStore;
use crate::flood_control_ports::ConfigChangeSet;

/// Requested change to one policy. Omitted fields keep their stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyUpdate {
    /// New event limit.
    pub limit: Option<u32>,
    /// New window length in seconds.
    pub window: Option<u32>,
}

impl PolicyUpdate {
    /// Creates an update replacing both values.
    #[must_use]
    pub fn full(limit: u32, window: u32) -> Self {
        Self {
            limit: Some(limit),
            window: Some(window),
        }
    }

    /// Returns whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.window.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ValidatedUpdate {
    limit: Option<FloodLimit>,
    window: Option<FloodWindow>,
}

impl ValidatedUpdate {
    fn parse(name: PolicyName, update: PolicyUpdate) -> AppResult<Self> {
        let limit = update.limit.map(FloodLimit::new).transpose()?;
        let window = update
            .window
            .map(|seconds| FloodWindow::new(seconds).and_then(|window| name.check_window(window)))
            .transpose()?;

        Ok(Self { limit, window })
    }

    fn merge(&mut self, later: Self) {
        if later.limit.is_some() {
            self.limit = later.limit;
        }
        if later.window.is_some() {
            self.window = later.window;
        }
    }

    fn stage(&self, name: PolicyName, changes: &mut ConfigChangeSet) -> AppResult<()> {
        if let Some(limit) = self.limit {
            changes.write(name.limit_key(), i64::from(limit.value()))?;
        }
        if let Some(window) = self.window {
            changes.write(name.window_key(), i64::from(window.seconds()))?;
        }

        Ok(())
    }
}

impl PolicyConfigStore {
    /// Replaces both values of the named policy.
    pub async fn set_policy(&self, name: &str, limit: u32, window: u32) -> AppResult<FloodPolicy> {
        let name = PolicyName::from_str(name)?;
        self.update_policy(name, PolicyUpdate::full(limit, window))
            .await
    }

    /// Applies a partial update to one policy and returns the stored result.
    pub async fn update_policy(
        &self,
        name: PolicyName,
        update: PolicyUpdate,
    ) -> AppResult<FloodPolicy> {
        self.apply_updates(&[(name, update)]).await?;
        self.policy(name).await
    }

    /// Validates a batch of updates, then commits one change set per
    /// configuration group.
    ///
    /// Nothing is written when any entry fails validation. Groups commit
    /// independently in [`ConfigGroup::all`] order, so a backend failure on
    /// a later group leaves earlier groups committed. Returns the resulting
    /// policies of every updated name.
    pub async fn apply_updates(
        &self,
        updates: &[(PolicyName, PolicyUpdate)],
    ) -> AppResult<Vec<FloodPolicy>> {
        let mut validated: BTreeMap<PolicyName, ValidatedUpdate> = BTreeMap::new();
        for (name, update) in updates {
            let parsed = ValidatedUpdate::parse(*name, *update)?;
            validated.entry(*name).or_default().merge(parsed);
        }

        let mut policies = Vec::with_capacity(validated.len());
        for group in ConfigGroup::all() {
            let mut changes = ConfigChangeSet::new(*group);
            let mut staged = Vec::new();
            for (name, update) in validated.iter().filter(|(name, _)| name.group() == *group) {
                update.stage(*name, &mut changes)?;
                staged.push(*name);
            }

            let committed = !changes.is_empty();
            if committed {
                let write_count = changes.writes().len();
                self.backend.commit(changes).await?;
                info!(group = %group, write_count, "flood control settings committed");
            }

            for name in staged {
                let policy = self.policy(name).await?;
                if committed {
                    info!(
                        group = %group,
                        policy = %name,
                        limit = policy.limit().value(),
                        window = policy.window().seconds(),
                        "flood control policy stored"
                    );
                }
                policies.push(policy);
            }
        }

        Ok(policies)
    }
}
