use std::sync::Arc;

use reading_core::model::{Book, BookForm, BookId};
use storage::repository::{BookRepository, NewBookRecord, StorageError};
use tracing::{debug, info, warn};

use crate::Clock;
use crate::error::BookServiceError;

/// Orchestrates the book collection: add/edit forms, deletion and paging.
#[derive(Clone)]
pub struct BookService {
    clock: Clock,
    books: Arc<dyn BookRepository>,
}

impl BookService {
    #[must_use]
    pub fn new(clock: Clock, books: Arc<dyn BookRepository>) -> Self {
        Self { clock, books }
    }

    /// Validate the add form and persist a new book on page 1.
    ///
    /// Nothing is stored when validation fails. On a storage failure the
    /// caller still holds `form` and may submit it again.
    ///
    /// # Errors
    ///
    /// Returns `BookServiceError::Form` for validation failures.
    /// Returns `BookServiceError::Storage` if persistence fails.
    pub async fn add_book(&self, form: &BookForm) -> Result<Book, BookServiceError> {
        let now = self.clock.now();
        let details = form.validate(self.clock.current_year())?;
        let record = NewBookRecord::from_details(details, now);

        let id = self
            .books
            .insert_book(record.clone())
            .await
            .inspect_err(|err| warn!(error = %err, "failed to save new book"))?;
        let book = record
            .into_book(id)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        info!(%id, title = book.title(), "book added");
        Ok(book)
    }

    /// Apply the edit form to an existing book in place.
    ///
    /// The book keeps its id and reading position (clamped if the page count
    /// shrank).
    ///
    /// # Errors
    ///
    /// Returns `BookServiceError::Form` for validation failures.
    /// Returns `BookServiceError::Storage` (`NotFound` for unknown ids) if
    /// repository access fails.
    pub async fn edit_book(&self, id: BookId, form: &BookForm) -> Result<Book, BookServiceError> {
        let details = form.validate(self.clock.current_year())?;
        let mut book = self.require_book(id).await?;
        book.apply_details(details);
        self.books
            .update_book(&book)
            .await
            .inspect_err(|err| warn!(%id, error = %err, "failed to save edited book"))?;
        info!(%id, title = book.title(), "book edited");
        Ok(book)
    }

    /// Delete a single book.
    ///
    /// # Errors
    ///
    /// Returns `BookServiceError::Storage` if the book is missing or
    /// persistence fails.
    pub async fn delete_book(&self, id: BookId) -> Result<(), BookServiceError> {
        self.books.delete_book(id).await?;
        info!(%id, "book deleted");
        Ok(())
    }

    /// Delete every book, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `BookServiceError::Storage` if persistence fails.
    pub async fn clear_books(&self) -> Result<u64, BookServiceError> {
        let removed = self.books.delete_all_books().await?;
        info!(removed, "library cleared");
        Ok(removed)
    }

    /// Fetch a book by ID. Returns `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `BookServiceError::Storage` if repository access fails.
    pub async fn get_book(&self, id: BookId) -> Result<Option<Book>, BookServiceError> {
        let book = self.books.get_book(id).await?;
        Ok(book)
    }

    /// All books, in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `BookServiceError::Storage` if repository access fails.
    pub async fn list_books(&self) -> Result<Vec<Book>, BookServiceError> {
        let books = self.books.list_books().await?;
        debug!(count = books.len(), "listed books");
        Ok(books)
    }

    /// Jump to `page`, clamped into the book's range, and persist it.
    ///
    /// # Errors
    ///
    /// Returns `BookServiceError::Storage` if the book is missing or
    /// persistence fails.
    pub async fn set_page(&self, id: BookId, page: u32) -> Result<Book, BookServiceError> {
        self.move_page(id, |book| book.set_current_page(page)).await
    }

    /// Turn forward one page.
    ///
    /// # Errors
    ///
    /// Returns `BookServiceError::Storage` if the book is missing or
    /// persistence fails.
    pub async fn next_page(&self, id: BookId) -> Result<Book, BookServiceError> {
        self.move_page(id, Book::next_page).await
    }

    /// Turn back one page.
    ///
    /// # Errors
    ///
    /// Returns `BookServiceError::Storage` if the book is missing or
    /// persistence fails.
    pub async fn previous_page(&self, id: BookId) -> Result<Book, BookServiceError> {
        self.move_page(id, Book::previous_page).await
    }

    async fn move_page(
        &self,
        id: BookId,
        step: impl FnOnce(&mut Book) -> u32,
    ) -> Result<Book, BookServiceError> {
        let mut book = self.require_book(id).await?;
        let before = book.current_page();
        let after = step(&mut book);
        if after != before {
            self.books.update_book(&book).await?;
            debug!(%id, from = before, to = after, "page changed");
        }
        Ok(book)
    }

    async fn require_book(&self, id: BookId) -> Result<Book, BookServiceError> {
        self.books
            .get_book(id)
            .await?
            .ok_or(BookServiceError::Storage(StorageError::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use reading_core::model::FormErrorKind;
    use reading_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn service() -> (BookService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        let service = BookService::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()));
        (service, repo)
    }

    fn form(title: &str, pages: &str) -> BookForm {
        BookForm {
            title: title.into(),
            publication_year: "1937".into(),
            page_count: pages.into(),
            price: "7.99".into(),
            author_name: "J. R. R.".into(),
            author_surname: "Tolkien".into(),
        }
    }

    #[tokio::test]
    async fn add_book_starts_on_page_one() {
        let (service, repo) = service();
        let book = service.add_book(&form("The Hobbit", "310")).await.unwrap();
        assert_eq!(book.current_page(), 1);
        assert_eq!(book.created_at(), fixed_now());

        let stored = repo.get_book(book.id()).await.unwrap().unwrap();
        assert_eq!(stored, book);
    }

    #[tokio::test]
    async fn future_year_is_rejected_without_persisting() {
        let (service, repo) = service();
        let mut input = form("From the Future", "100");
        input.publication_year = "3000".into();

        let err = service.add_book(&input).await.unwrap_err();
        assert_eq!(err.form_kind(), Some(FormErrorKind::Year));
        assert!(!err.is_retryable());
        assert!(repo.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unparsable_page_count_is_rejected_without_persisting() {
        let (service, repo) = service();
        let err = service.add_book(&form("Bad", "abc")).await.unwrap_err();
        assert_eq!(err.form_kind(), Some(FormErrorKind::General));
        assert!(repo.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_keeps_identity_and_position() {
        let (service, _repo) = service();
        let book = service.add_book(&form("The Hobbit", "310")).await.unwrap();
        service.set_page(book.id(), 120).await.unwrap();

        let edited = service
            .edit_book(book.id(), &form("The Hobbit (illustrated)", "320"))
            .await
            .unwrap();
        assert_eq!(edited.id(), book.id());
        assert_eq!(edited.current_page(), 120);
        assert_eq!(edited.page_count(), 320);

        let all = service.list_books().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title(), "The Hobbit (illustrated)");
    }

    #[tokio::test]
    async fn edit_with_invalid_form_leaves_book_untouched() {
        let (service, _repo) = service();
        let book = service.add_book(&form("The Hobbit", "310")).await.unwrap();
        let err = service
            .edit_book(book.id(), &form("", "310"))
            .await
            .unwrap_err();
        assert!(matches!(err, BookServiceError::Form(_)));
        let stored = service.get_book(book.id()).await.unwrap().unwrap();
        assert_eq!(stored.title(), "The Hobbit");
    }

    #[tokio::test]
    async fn edit_unknown_book_is_not_found() {
        let (service, _repo) = service();
        let err = service
            .edit_book(BookId::new(5), &form("Nope", "10"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn paging_is_clamped_and_persisted() {
        let (service, repo) = service();
        let book = service.add_book(&form("Short", "3")).await.unwrap();

        assert_eq!(service.previous_page(book.id()).await.unwrap().current_page(), 1);
        assert_eq!(service.next_page(book.id()).await.unwrap().current_page(), 2);
        assert_eq!(service.set_page(book.id(), 99).await.unwrap().current_page(), 3);
        assert_eq!(service.next_page(book.id()).await.unwrap().current_page(), 3);
        assert_eq!(service.set_page(book.id(), 0).await.unwrap().current_page(), 1);

        service.set_page(book.id(), 2).await.unwrap();
        let stored = repo.get_book(book.id()).await.unwrap().unwrap();
        assert_eq!(stored.current_page(), 2);
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let (service, _repo) = service();
        let a = service.add_book(&form("A", "10")).await.unwrap();
        service.add_book(&form("B", "10")).await.unwrap();
        service.add_book(&form("B", "10")).await.unwrap();

        service.delete_book(a.id()).await.unwrap();
        assert!(service.delete_book(a.id()).await.unwrap_err().is_not_found());
        assert_eq!(service.clear_books().await.unwrap(), 2);
        assert!(service.list_books().await.unwrap().is_empty());
    }
}
