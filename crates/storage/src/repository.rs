use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reading_core::model::{AppSettings, Book, BookDetails, BookError, BookId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert payload for a book that has no id yet.
#[derive(Debug, Clone)]
pub struct NewBookRecord {
    pub details: BookDetails,
    pub current_page: u32,
    pub created_at: DateTime<Utc>,
}

impl NewBookRecord {
    /// A freshly added book, positioned on page 1.
    #[must_use]
    pub fn from_details(details: BookDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            details,
            current_page: 1,
            created_at,
        }
    }

    /// Attach the id assigned by the repository.
    ///
    /// # Errors
    ///
    /// Returns `BookError::CurrentPageOutOfRange` if `current_page` does not
    /// fit the page count.
    pub fn into_book(self, id: BookId) -> Result<Book, BookError> {
        Book::from_persisted(id, self.details, self.current_page, self.created_at)
    }
}

/// Repository contract for the book collection.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new book and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the book cannot be stored.
    async fn insert_book(&self, book: NewBookRecord) -> Result<BookId, StorageError>;

    /// Overwrite an existing book in place.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id is unknown, or other storage errors.
    async fn update_book(&self, book: &Book) -> Result<(), StorageError>;

    /// Delete one book.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id is unknown, or other storage errors.
    async fn delete_book(&self, id: BookId) -> Result<(), StorageError>;

    /// Delete every book, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on persistence failures.
    async fn delete_all_books(&self) -> Result<u64, StorageError>;

    /// Fetch a book by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on persistence failures.
    async fn get_book(&self, id: BookId) -> Result<Option<Book>, StorageError>;

    /// All books in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on persistence failures.
    async fn list_books(&self) -> Result<Vec<Book>, StorageError>;
}

/// Repository contract for user preferences.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load persisted settings, `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on persistence failures.
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError>;

    /// Persist settings, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on persistence failures.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    books: Arc<Mutex<BTreeMap<BookId, Book>>>,
    next_id: Arc<Mutex<u64>>,
    settings: Arc<Mutex<Option<AppSettings>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl BookRepository for InMemoryRepository {
    async fn insert_book(&self, book: NewBookRecord) -> Result<BookId, StorageError> {
        let id = {
            let mut next = self.next_id.lock().map_err(poisoned)?;
            *next += 1;
            BookId::new(*next)
        };
        let book = book
            .into_book(id)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let mut guard = self.books.lock().map_err(poisoned)?;
        guard.insert(id, book);
        Ok(id)
    }

    async fn update_book(&self, book: &Book) -> Result<(), StorageError> {
        let mut guard = self.books.lock().map_err(poisoned)?;
        match guard.get_mut(&book.id()) {
            Some(slot) => {
                *slot = book.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }

    async fn delete_book(&self, id: BookId) -> Result<(), StorageError> {
        let mut guard = self.books.lock().map_err(poisoned)?;
        guard.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }

    async fn delete_all_books(&self) -> Result<u64, StorageError> {
        let mut guard = self.books.lock().map_err(poisoned)?;
        let removed = guard.len() as u64;
        guard.clear();
        Ok(removed)
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>, StorageError> {
        let guard = self.books.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_books(&self) -> Result<Vec<Book>, StorageError> {
        let guard = self.books.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let guard = self.settings.lock().map_err(poisoned)?;
        Ok(*guard)
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let mut guard = self.settings.lock().map_err(poisoned)?;
        *guard = Some(*settings);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub books: Arc<dyn BookRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let books: Arc<dyn BookRepository> = Arc::new(repo.clone());
        let settings: Arc<dyn SettingsRepository> = Arc::new(repo);
        Self { books, settings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reading_core::model::{Author, ReadingSpeed};
    use reading_core::time::fixed_now;

    fn details(title: &str, pages: u32) -> BookDetails {
        BookDetails::new(title, 1990, pages, 4.0, Author::new("Terry", "Pratchett").unwrap())
            .unwrap()
    }

    #[tokio::test]
    async fn assigns_increasing_ids_and_lists_in_insertion_order() {
        let repo = InMemoryRepository::new();
        let a = repo
            .insert_book(NewBookRecord::from_details(details("Mort", 300), fixed_now()))
            .await
            .unwrap();
        let b = repo
            .insert_book(NewBookRecord::from_details(details("Guards! Guards!", 400), fixed_now()))
            .await
            .unwrap();
        assert!(a < b);

        let books = repo.list_books().await.unwrap();
        let titles: Vec<_> = books.iter().map(Book::title).collect();
        assert_eq!(titles, ["Mort", "Guards! Guards!"]);
        assert!(books.iter().all(|book| book.current_page() == 1));
    }

    #[tokio::test]
    async fn update_and_delete_require_existing_id() {
        let repo = InMemoryRepository::new();
        let ghost = Book::new(BookId::new(99), details("Ghost", 10), fixed_now());
        assert!(matches!(
            repo.update_book(&ghost).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            repo.delete_book(BookId::new(99)).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_persists_page_and_delete_all_clears() {
        let repo = InMemoryRepository::new();
        let id = repo
            .insert_book(NewBookRecord::from_details(details("Mort", 300), fixed_now()))
            .await
            .unwrap();
        let mut book = repo.get_book(id).await.unwrap().unwrap();
        book.set_current_page(120);
        repo.update_book(&book).await.unwrap();
        assert_eq!(repo.get_book(id).await.unwrap().unwrap().current_page(), 120);

        assert_eq!(repo.delete_all_books().await.unwrap(), 1);
        assert!(repo.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_settings().await.unwrap().is_none());
        let settings = AppSettings::new(ReadingSpeed::new(2.5).unwrap());
        repo.save_settings(&settings).await.unwrap();
        assert_eq!(repo.get_settings().await.unwrap(), Some(settings));
    }
}
