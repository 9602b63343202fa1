use async_trait::async_trait;
use reading_core::model::{Book, BookId};
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{book_id_from_i64, book_id_to_i64, map_book_row};
use crate::repository::{BookRepository, NewBookRecord, StorageError};

const BOOK_COLUMNS: &str = "id, title, publication_year, page_count, current_page, price, \
                            author_name, author_surname, created_at";

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl BookRepository for SqliteRepository {
    async fn insert_book(&self, book: NewBookRecord) -> Result<BookId, StorageError> {
        let details = &book.details;
        let res = sqlx::query(
            r"
            INSERT INTO books (title, publication_year, page_count, current_page, price, author_name, author_surname, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(details.title())
        .bind(i64::from(details.publication_year()))
        .bind(i64::from(details.page_count()))
        .bind(i64::from(book.current_page))
        .bind(details.price())
        .bind(details.author().name())
        .bind(details.author().surname())
        .bind(book.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        let id = book_id_from_i64(res.last_insert_rowid())?;
        debug!(%id, "inserted book row");
        Ok(id)
    }

    async fn update_book(&self, book: &Book) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE books SET
                title = ?2,
                publication_year = ?3,
                page_count = ?4,
                current_page = ?5,
                price = ?6,
                author_name = ?7,
                author_surname = ?8
            WHERE id = ?1
            ",
        )
        .bind(book_id_to_i64(book.id())?)
        .bind(book.title())
        .bind(i64::from(book.publication_year()))
        .bind(i64::from(book.page_count()))
        .bind(i64::from(book.current_page()))
        .bind(book.price())
        .bind(book.author().name())
        .bind(book.author().surname())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        debug!(id = %book.id(), "updated book row");
        Ok(())
    }

    async fn delete_book(&self, id: BookId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(book_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_all_books(&self) -> Result<u64, StorageError> {
        let res = sqlx::query("DELETE FROM books")
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(res.rows_affected())
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>, StorageError> {
        let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"))
            .bind(book_id_to_i64(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_book_row).transpose()
    }

    async fn list_books(&self) -> Result<Vec<Book>, StorageError> {
        let rows = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut books = Vec::with_capacity(rows.len());
        for row in &rows {
            books.push(map_book_row(row)?);
        }
        Ok(books)
    }
}
