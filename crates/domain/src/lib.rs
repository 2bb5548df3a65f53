//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod interval;
mod limits;
mod policy;
mod security;

pub use interval::{DISABLED_WINDOW_LABEL, format_window};
pub use limits::{
    ALLOWED_LIMITS, ALLOWED_WINDOWS, DISABLED_WINDOW, FloodLimit, FloodWindow, allowed_windows,
};
pub use policy::{ConfigGroup, ConfigKey, FloodPolicy, PolicyName};
pub use security::Capability;
