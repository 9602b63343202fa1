use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{SettingsRepository, StorageError};
use reading_core::model::AppSettings;

use super::SqliteRepository;

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let row = sqlx::query("SELECT reading_speed FROM app_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let reading_speed: f64 = row
            .try_get("reading_speed")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        AppSettings::from_persisted(reading_speed)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_settings (id, reading_speed)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                reading_speed = excluded.reading_speed
            ",
        )
        .bind(1_i64)
        .bind(settings.reading_speed().pages_per_minute())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
