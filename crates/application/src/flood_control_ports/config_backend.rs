use async_trait::async_trait;
use flood_control_core::{AppError, AppResult};
use flood_control_domain::{ConfigGroup, ConfigKey};

/// Repository port for persisted flood control settings.
///
/// Implementations must apply a committed change set atomically: readers
/// observe either none or all of its writes.
#[async_trait]
pub trait ConfigBackend: Send + Sync {
    /// Reads one stored value, returning `None` when the key was never written.
    async fn read(&self, key: ConfigKey) -> AppResult<Option<i64>>;

    /// Persists every staged write of one configuration group.
    async fn commit(&self, changes: ConfigChangeSet) -> AppResult<()>;
}

/// Writes staged against one configuration group, saved together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChangeSet {
    group: ConfigGroup,
    writes: Vec<(ConfigKey, i64)>,
}

impl ConfigChangeSet {
    /// Creates an empty change set for a group.
    #[must_use]
    pub fn new(group: ConfigGroup) -> Self {
        Self {
            group,
            writes: Vec::new(),
        }
    }

    /// Stages a value; a later write to the same key replaces the earlier one.
    pub fn write(&mut self, key: ConfigKey, value: i64) -> AppResult<()> {
        if key.group() != self.group {
            return Err(AppError::Internal(format!(
                "key '{key}' cannot be written through a change set for '{}'",
                self.group
            )));
        }

        match self.writes.iter_mut().find(|(staged, _)| *staged == key) {
            Some(entry) => entry.1 = value,
            None => self.writes.push((key, value)),
        }

        Ok(())
    }

    /// Returns the group this change set belongs to.
    #[must_use]
    pub fn group(&self) -> ConfigGroup {
        self.group
    }

    /// Returns the staged writes in staging order.
    #[must_use]
    pub fn writes(&self) -> &[(ConfigKey, i64)] {
        &self.writes
    }

    /// Returns whether nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}
