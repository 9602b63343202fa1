//! Shared error types for the services crate.

use thiserror::Error;

use reading_core::model::{FormError, FormErrorKind, SettingsError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `BookService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BookServiceError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl BookServiceError {
    /// Storage failures may succeed when the same request is submitted again;
    /// form errors need the input fixed first.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BookServiceError::Storage(err) if !matches!(err, StorageError::NotFound)
        )
    }

    #[must_use]
    pub fn form_kind(&self) -> Option<FormErrorKind> {
        match self {
            BookServiceError::Form(err) => Some(err.kind()),
            BookServiceError::Storage(_) => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, BookServiceError::Storage(StorageError::NotFound))
    }
}

/// Errors emitted by `SettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while assembling the library view.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibraryError {
    #[error(transparent)]
    Books(#[from] BookServiceError),
    #[error(transparent)]
    Settings(#[from] SettingsServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
