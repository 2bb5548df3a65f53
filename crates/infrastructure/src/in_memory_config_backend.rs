use std::collections::HashMap;

use async_trait::async_trait;
use flood_control_application::{ConfigBackend, ConfigChangeSet};
use flood_control_core::AppResult;
use flood_control_domain::ConfigKey;
use tokio::sync::RwLock;

use crate::default_settings::default_values;


/// In-memory configuration backend for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryConfigBackend {
    values: RwLock<HashMap<ConfigKey, i64>>,
}

impl InMemoryConfigBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding the default value of every policy.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            values: RwLock::new(default_values().collect()),
        }
    }

    /// Writes default values for keys that have never been written.
    ///
    /// Returns the number of keys seeded.
    pub async fn seed_defaults(&self) -> usize {
        let mut values = self.values.write().await;
        let mut seeded = 0;
        for (key, value) in default_values() {
            if !values.contains_key(&key) {
                values.insert(key, value);
                seeded += 1;
            }
        }

        seeded
    }
}

#[async_trait]
impl ConfigBackend for InMemoryConfigBackend {
    async fn read(&self, key: ConfigKey) -> AppResult<Option<i64>> {
        Ok(self.values.read().await.get(&key).copied())
    }

    async fn commit(&self, changes: ConfigChangeSet) -> AppResult<()> {
        let mut values = self.values.write().await;
        for (key, value) in changes.writes() {
            values.insert(*key, *value);
        }

        Ok(())
    }
}
