use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use super::KeyValueStore;
use crate::entity::BotError;

/// Slots stored as rows of the `kv_store` table
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Apply the bundled migrations
    pub async fn migrate(&self) -> Result<(), BotError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&*self.pool)
            .await
            .map_err(|e| BotError::Database(e.into()))?;
        info!("Migrations completed successfully");

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for PostgresStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, BotError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<(), BotError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BotError> {
        sqlx::query("DELETE FROM kv_store WHERE key = $1")
            .bind(key)
            .execute(&*self.pool)
            .await?;

        Ok(())
    }
}
