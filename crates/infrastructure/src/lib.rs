//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod default_settings;
mod in_memory_config_backend;
mod postgres_config_backend;
mod static_permission_oracle;

pub use in_memory_config_backend::InMemoryConfigBackend;
pub use postgres_config_backend::PostgresConfigBackend;
pub use static_permission_oracle::StaticPermissionOracle;
