//! Allowed value domains for flood control thresholds and windows.

use flood_control_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Event counts an administrator may choose as a flood threshold.
pub const ALLOWED_LIMITS: &[u32] = &[
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 20, 30, 40, 50, 75, 100, 125, 150, 200, 250, 500,
];

/// Window lengths in seconds an administrator may choose, excluding the
/// disabled value.
pub const ALLOWED_WINDOWS: &[u32] = &[
    60, 180, 300, 600, 900, 1800, 2700, 3600, 10800, 21600, 32400, 43200, 86400,
];

/// Window value that turns a flood check off.
pub const DISABLED_WINDOW: u32 = 0;

/// Returns the window domain, optionally led by the disabled value.
#[must_use]
pub fn allowed_windows(include_disabled: bool) -> Vec<u32> {
    let mut windows = Vec::with_capacity(ALLOWED_WINDOWS.len() + 1);
    if include_disabled {
        windows.push(DISABLED_WINDOW);
    }
    windows.extend_from_slice(ALLOWED_WINDOWS);
    windows
}

/// Maximum number of events allowed inside one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FloodLimit(pub(crate) u32);

impl FloodLimit {
    /// Creates a limit after checking it against [`ALLOWED_LIMITS`].
    pub fn new(value: u32) -> AppResult<Self> {
        if ALLOWED_LIMITS.binary_search(&value).is_err() {
            return Err(AppError::invalid_value(
                "limit",
                format!("{value} is not an allowed limit"),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the raw event count.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for FloodLimit {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FloodLimit> for u32 {
    fn from(value: FloodLimit) -> Self {
        value.0
    }
}

/// Length in seconds of the span a limit is counted over.
///
/// Zero means the check is disabled. Whether a policy may be disabled is
/// decided by [`crate::FloodPolicy::new`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FloodWindow(pub(crate) u32);

impl FloodWindow {
    /// The disabled window.
    pub const DISABLED: Self = Self(DISABLED_WINDOW);

    /// Creates a window after checking it against the window domain.
    pub fn new(seconds: u32) -> AppResult<Self> {
        if seconds != DISABLED_WINDOW && ALLOWED_WINDOWS.binary_search(&seconds).is_err() {
            return Err(AppError::invalid_value(
                "window",
                format!("{seconds} is not an allowed window"),
            ));
        }

        Ok(Self(seconds))
    }

    /// Returns the window length in seconds.
    #[must_use]
    pub fn seconds(self) -> u32 {
        self.0
    }

    /// Returns whether this window turns the check off.
    #[must_use]
    pub fn is_disabled(self) -> bool {
        self.0 == DISABLED_WINDOW
    }
}

impl TryFrom<u32> for FloodWindow {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FloodWindow> for u32 {
    fn from(value: FloodWindow) -> Self {
        value.0
    }
}
