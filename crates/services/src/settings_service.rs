use std::sync::Arc;

use reading_core::model::{AppSettings, ReadingSpeed};
use storage::repository::SettingsRepository;
use tracing::info;

use crate::error::SettingsServiceError;

#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` on storage failures.
    pub async fn load(&self) -> Result<AppSettings, SettingsServiceError> {
        let settings = self.repo.get_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Current reading speed, 1 page per minute unless the user changed it.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` on storage failures.
    pub async fn reading_speed(&self) -> Result<ReadingSpeed, SettingsServiceError> {
        Ok(self.load().await?.reading_speed())
    }

    /// Validate and persist a new reading speed.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError::Settings` for speeds outside 0.5..=5.0, in
    /// which case nothing is written, or `SettingsServiceError::Storage` if
    /// persistence fails.
    pub async fn set_reading_speed(
        &self,
        pages_per_minute: f64,
    ) -> Result<AppSettings, SettingsServiceError> {
        let speed = ReadingSpeed::new(pages_per_minute)?;
        let settings = self.load().await?.with_reading_speed(speed);
        self.repo.save_settings(&settings).await?;
        info!(pages_per_minute, "reading speed updated");
        Ok(settings)
    }
}
