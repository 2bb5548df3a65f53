//! Validated storage of flood control policies.

use std::str::FromStr;
use std::sync::Arc;

use flood_control_core::{AppError, AppResult};
use flood_control_domain::{
    ALLOWED_LIMITS, ConfigKey, FloodLimit, FloodPolicy, FloodWindow, PolicyName, allowed_windows,
    format_window,
};

use crate::flood_control_ports::ConfigBackend;

mod updates;

#[cfg(test)]
mod tests;

pub use updates::PolicyUpdate;

/// One selectable value with its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueOption {
    /// Stored value.
    pub value: u32,
    /// Human-readable label.
    pub label: String,
}

/// Application service reading and writing flood control policies.
#[derive(Clone)]
pub struct PolicyConfigStore {
    backend: Arc<dyn ConfigBackend>,
}

impl PolicyConfigStore {
    /// Creates a store over the provided configuration backend.
    #[must_use]
    pub fn new(backend: Arc<dyn ConfigBackend>) -> Self {
        Self { backend }
    }

    /// Returns every policy name the store manages.
    #[must_use]
    pub fn list_policy_names(&self) -> &'static [PolicyName] {
        PolicyName::all()
    }

    /// Returns the allowed limits in ascending order.
    #[must_use]
    pub fn allowed_limits(&self) -> &'static [u32] {
        ALLOWED_LIMITS
    }

    /// Returns the allowed windows in ascending order, led by `0` when
    /// `include_disabled` is set.
    #[must_use]
    pub fn allowed_windows(&self, include_disabled: bool) -> Vec<u32> {
        allowed_windows(include_disabled)
    }

    /// Returns the display label for a window length.
    #[must_use]
    pub fn format_window(&self, window: u32) -> String {
        format_window(window)
    }

    /// Returns limit options labelled by their count.
    #[must_use]
    pub fn limit_options(&self) -> Vec<ValueOption> {
        ALLOWED_LIMITS
            .iter()
            .map(|value| ValueOption {
                value: *value,
                label: value.to_string(),
            })
            .collect()
    }

    /// Returns window options labelled as durations.
    #[must_use]
    pub fn window_options(&self, include_disabled: bool) -> Vec<ValueOption> {
        allowed_windows(include_disabled)
            .into_iter()
            .map(|value| ValueOption {
                value,
                label: format_window(value),
            })
            .collect()
    }

    /// Returns the stored policy for a transport name.
    pub async fn get_policy(&self, name: &str) -> AppResult<FloodPolicy> {
        self.policy(PolicyName::from_str(name)?).await
    }

    /// Returns the stored policy.
    pub async fn policy(&self, name: PolicyName) -> AppResult<FloodPolicy> {
        let limit = self.read_value(name.limit_key()).await?;
        let limit = FloodLimit::new(limit).map_err(|_| corrupted(name.limit_key(), limit))?;

        let window = self.read_value(name.window_key()).await?;
        let window = FloodWindow::new(window).map_err(|_| corrupted(name.window_key(), window))?;

        FloodPolicy::new(name, limit, window)
            .map_err(|_| corrupted(name.window_key(), window.seconds()))
    }

    /// Returns all stored policies in presentation order.
    pub async fn list_policies(&self) -> AppResult<Vec<FloodPolicy>> {
        let mut policies = Vec::with_capacity(PolicyName::all().len());
        for name in PolicyName::all() {
            policies.push(self.policy(*name).await?);
        }

        Ok(policies)
    }

    async fn read_value(&self, key: ConfigKey) -> AppResult<u32> {
        let value = self.backend.read(key).await?.ok_or_else(|| {
            AppError::Internal(format!("flood control setting '{key}' has not been seeded"))
        })?;

        u32::try_from(value).map_err(|_| {
            AppError::Internal(format!(
                "flood control setting '{key}' holds out-of-range value {value}"
            ))
        })
    }
}

fn corrupted(key: ConfigKey, value: u32) -> AppError {
    AppError::Internal(format!(
        "flood control setting '{key}' holds disallowed value {value}"
    ))
}
