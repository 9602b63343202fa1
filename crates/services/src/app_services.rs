use std::sync::Arc;

use reading_core::BookFilter;
use storage::repository::Storage;

use crate::Clock;
use crate::book_service::BookService;
use crate::error::{AppServicesError, LibraryError};
use crate::library_view::LibraryView;
use crate::settings_service::SettingsService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    books: Arc<BookService>,
    settings: Arc<SettingsService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let books = Arc::new(BookService::new(clock, Arc::clone(&storage.books)));
        let settings = Arc::new(SettingsService::new(Arc::clone(&storage.settings)));
        Self { books, settings }
    }

    #[must_use]
    pub fn books(&self) -> Arc<BookService> {
        Arc::clone(&self.books)
    }

    #[must_use]
    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings)
    }

    /// Load the collection and the reading speed and build the list view.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError` if either repository fails.
    pub async fn library(&self, filter: BookFilter) -> Result<LibraryView, LibraryError> {
        let books = self.books.list_books().await?;
        let speed = self.settings.reading_speed().await?;
        Ok(LibraryView::build(&books, filter, speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reading_core::model::BookForm;
    use reading_core::time::fixed_now;

    #[tokio::test]
    async fn library_uses_persisted_speed() {
        let services = AppServices::from_storage(&Storage::in_memory(), Clock::fixed(fixed_now()));
        let book = services
            .books()
            .add_book(&BookForm {
                title: "Ancillary Justice".into(),
                publication_year: "2013".into(),
                page_count: "200".into(),
                price: "9".into(),
                author_name: "Ann".into(),
                author_surname: "Leckie".into(),
            })
            .await
            .unwrap();
        services.books().set_page(book.id(), 101).await.unwrap();
        services.settings().set_reading_speed(2.0).await.unwrap();

        let view = services.library(BookFilter::All).await.unwrap();
        assert_eq!(view.rows[0].time_left_label, "49m left");
    }
}
