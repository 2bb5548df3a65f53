//! PostgreSQL-backed configuration backend using the `flood_control_settings` table.

use async_trait::async_trait;
use flood_control_application::{ConfigBackend, ConfigChangeSet};
use flood_control_core::{AppError, AppResult};
use flood_control_domain::ConfigKey;
use sqlx::PgPool;
use tracing::info;

use crate::default_settings::default_values;

/// PostgreSQL implementation of the configuration backend port.
#[derive(Clone)]
pub struct PostgresConfigBackend {
    pool: PgPool,
}

impl PostgresConfigBackend {
    /// Creates a backend with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts default values for keys that have no stored row.
    ///
    /// Returns the number of rows inserted.
    pub async fn seed_defaults(&self) -> AppResult<u64> {
        let mut inserted = 0;
        for (key, value) in default_values() {
            let result = sqlx::query(
                r#"
                INSERT INTO flood_control_settings (config_group, config_key, value)
                VALUES ($1, $2, $3)
                ON CONFLICT (config_group, config_key) DO NOTHING
                "#,
            )
            .bind(key.group().as_str())
            .bind(key.name())
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("failed to seed flood control setting '{key}': {error}"))
            })?;
            inserted += result.rows_affected();
        }

        if inserted > 0 {
            info!(inserted, "seeded flood control defaults");
        }

        Ok(inserted)
    }
}

#[async_trait]
impl ConfigBackend for PostgresConfigBackend {
    async fn read(&self, key: ConfigKey) -> AppResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT value
            FROM flood_control_settings
            WHERE config_group = $1 AND config_key = $2
            "#,
        )
        .bind(key.group().as_str())
        .bind(key.name())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to read flood control setting '{key}': {error}"))
        })
    }

    async fn commit(&self, changes: ConfigChangeSet) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Unavailable(format!("failed to begin transaction: {error}"))
        })?;

        for (key, value) in changes.writes() {
            sqlx::query(
                r#"
                INSERT INTO flood_control_settings (config_group, config_key, value)
                VALUES ($1, $2, $3)
                ON CONFLICT (config_group, config_key) DO UPDATE
                SET value = EXCLUDED.value, updated_at = now()
                "#,
            )
            .bind(key.group().as_str())
            .bind(key.name())
            .bind(*value)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Unavailable(format!(
                    "failed to write flood control setting '{key}': {error}"
                ))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Unavailable(format!(
                "failed to commit '{}' settings: {error}",
                changes.group()
            ))
        })
    }
}
