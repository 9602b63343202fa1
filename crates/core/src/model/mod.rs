mod app_settings;
mod author;
mod book;
mod form;
mod ids;

pub use app_settings::{AppSettings, ReadingSpeed, SettingsError};
pub use author::Author;
pub use book::{Book, BookDetails, BookError};
pub use form::{BookForm, FormError, FormErrorKind, FormField};
pub use ids::{BookId, ParseIdError};
