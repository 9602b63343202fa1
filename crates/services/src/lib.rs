#![forbid(unsafe_code)]

pub mod app_services;
pub mod book_service;
pub mod error;
pub mod library_view;
pub mod settings_service;

pub use reading_core::Clock;

pub use app_services::AppServices;
pub use book_service::BookService;
pub use error::{AppServicesError, BookServiceError, LibraryError, SettingsServiceError};
pub use library_view::{LibraryRow, LibraryView};
pub use settings_service::SettingsService;
