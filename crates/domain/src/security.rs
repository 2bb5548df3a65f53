use std::str::FromStr;

use flood_control_core::AppError;
use serde::{Deserialize, Serialize};

/// Capabilities that gate access to flood control policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Allows managing user accounts, including failed-login thresholds.
    AdministerUsers,
    /// Allows managing contact forms, including the e-mail threshold.
    AdministerContactForms,
}

impl Capability {
    /// Returns the stable permission string for this capability.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdministerUsers => "administer users",
            Self::AdministerContactForms => "administer contact forms",
        }
    }

    /// Returns all known capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Capability] = &[
            Capability::AdministerUsers,
            Capability::AdministerContactForms,
        ];

        ALL
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "administer users" => Ok(Self::AdministerUsers),
            "administer contact forms" => Ok(Self::AdministerContactForms),
            other => Err(AppError::Validation(format!(
                "unknown capability value '{other}'"
            ))),
        }
    }
}
