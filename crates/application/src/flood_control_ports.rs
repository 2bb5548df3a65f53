mod config_backend;
mod permissions;

pub use config_backend::{ConfigBackend, ConfigChangeSet};
pub use permissions::PermissionOracle;
