//! Flood control policies and their storage mapping.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use flood_control_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{Capability, FloodLimit, FloodWindow};

/// Identifier of one rate-limited action category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyName {
    /// Failed login attempts counted per client IP address.
    LoginIp,
    /// Failed login attempts counted per username.
    LoginUser,
    /// Contact form e-mails sent by one visitor.
    Contact,
}

impl PolicyName {
    /// Returns the stable identifier for this policy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginIp => "login_ip",
            Self::LoginUser => "login_user",
            Self::Contact => "contact",
        }
    }

    /// Returns all policy names in presentation order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PolicyName] = &[
            PolicyName::LoginIp,
            PolicyName::LoginUser,
            PolicyName::Contact,
        ];

        ALL
    }

    /// Returns the persisted group holding this policy.
    #[must_use]
    pub fn group(&self) -> ConfigGroup {
        match self {
            Self::LoginIp | Self::LoginUser => ConfigGroup::UserFlood,
            Self::Contact => ConfigGroup::ContactSettings,
        }
    }

    /// Returns the storage key of the limit value.
    #[must_use]
    pub fn limit_key(&self) -> ConfigKey {
        let name = match self {
            Self::LoginIp => "ip_limit",
            Self::LoginUser => "user_limit",
            Self::Contact => "flood.limit",
        };

        ConfigKey::new(self.group(), name)
    }

    /// Returns the storage key of the window value.
    #[must_use]
    pub fn window_key(&self) -> ConfigKey {
        let name = match self {
            Self::LoginIp => "ip_window",
            Self::LoginUser => "user_window",
            Self::Contact => "flood.interval",
        };

        ConfigKey::new(self.group(), name)
    }

    /// Returns the capability required to view or change this policy.
    #[must_use]
    pub fn capability(&self) -> Capability {
        match self {
            Self::LoginIp | Self::LoginUser => Capability::AdministerUsers,
            Self::Contact => Capability::AdministerContactForms,
        }
    }

    /// Returns whether a zero window may switch this policy off.
    #[must_use]
    pub fn allows_disabling(&self) -> bool {
        true
    }

    /// Rejects a disabled window when this policy cannot be switched off.
    pub fn check_window(&self, window: FloodWindow) -> AppResult<FloodWindow> {
        if window.is_disabled() && !self.allows_disabling() {
            return Err(AppError::invalid_value(
                "window",
                format!("policy '{self}' cannot be disabled"),
            ));
        }

        Ok(window)
    }

    /// Returns the value the policy is seeded with on a fresh install.
    #[must_use]
    pub fn default_policy(&self) -> FloodPolicy {
        let (limit, window) = match self {
            Self::LoginIp => (50, 3600),
            Self::LoginUser => (5, 21600),
            Self::Contact => (5, 3600),
        };

        FloodPolicy {
            name: *self,
            limit: FloodLimit(limit),
            window: FloodWindow(window),
        }
    }
}

impl Display for PolicyName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PolicyName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "login_ip" => Ok(Self::LoginIp),
            "login_user" => Ok(Self::LoginUser),
            "contact" => Ok(Self::Contact),
            _ => Err(AppError::NotFound(format!(
                "flood control policy '{value}' does not exist"
            ))),
        }
    }
}

/// A configuration object persisted and saved as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigGroup {
    /// Failed-login thresholds owned by the user module.
    #[serde(rename = "user.flood")]
    UserFlood,
    /// Contact module settings, including the e-mail threshold.
    #[serde(rename = "contact.settings")]
    ContactSettings,
}

impl ConfigGroup {
    /// Returns the stable configuration object name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserFlood => "user.flood",
            Self::ContactSettings => "contact.settings",
        }
    }

    /// Returns all groups in commit order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ConfigGroup] = &[ConfigGroup::UserFlood, ConfigGroup::ContactSettings];

        ALL
    }

    /// Returns the policies stored in this group.
    pub fn policies(self) -> impl Iterator<Item = PolicyName> {
        PolicyName::all()
            .iter()
            .copied()
            .filter(move |name| name.group() == self)
    }
}

impl Display for ConfigGroup {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Address of one stored value inside a configuration group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey {
    group: ConfigGroup,
    name: &'static str,
}

impl ConfigKey {
    const fn new(group: ConfigGroup, name: &'static str) -> Self {
        Self { group, name }
    }

    /// Returns the group the key belongs to.
    #[must_use]
    pub fn group(&self) -> ConfigGroup {
        self.group
    }

    /// Returns the key name within its group.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Display for ConfigKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.group, self.name)
    }
}

/// A named `(limit, window)` pair governing one rate-limited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FloodPolicy {
    name: PolicyName,
    limit: FloodLimit,
    window: FloodWindow,
}

impl FloodPolicy {
    /// Creates a policy, rejecting a disabled window where the policy
    /// cannot be switched off.
    pub fn new(name: PolicyName, limit: FloodLimit, window: FloodWindow) -> AppResult<Self> {
        Ok(Self {
            name,
            limit,
            window: name.check_window(window)?,
        })
    }

    /// Creates a policy from raw values, validating both against their
    /// domains.
    pub fn from_values(name: PolicyName, limit: u32, window: u32) -> AppResult<Self> {
        Self::new(name, FloodLimit::new(limit)?, FloodWindow::new(window)?)
    }

    /// Returns the policy name.
    #[must_use]
    pub fn name(&self) -> PolicyName {
        self.name
    }

    /// Returns the event limit.
    #[must_use]
    pub fn limit(&self) -> FloodLimit {
        self.limit
    }

    /// Returns the counting window.
    #[must_use]
    pub fn window(&self) -> FloodWindow {
        self.window
    }
}
