use reading_core::model::{Author, Book, BookDetails, BookId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn book_id_from_i64(v: i64) -> Result<BookId, StorageError> {
    u64::try_from(v)
        .map(BookId::new)
        .map_err(|_| StorageError::Serialization("book_id sign overflow".into()))
}

pub(crate) fn book_id_to_i64(id: BookId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("book_id overflow".into()))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn i32_from_i64(field: &'static str, v: i64) -> Result<i32, StorageError> {
    i32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_book_row(row: &SqliteRow) -> Result<Book, StorageError> {
    let author = Author::new(
        row.try_get::<String, _>("author_name").map_err(ser)?,
        row.try_get::<String, _>("author_surname").map_err(ser)?,
    )
    .map_err(ser)?;

    let details = BookDetails::new(
        row.try_get::<String, _>("title").map_err(ser)?,
        i32_from_i64(
            "publication_year",
            row.try_get::<i64, _>("publication_year").map_err(ser)?,
        )?,
        u32_from_i64("page_count", row.try_get::<i64, _>("page_count").map_err(ser)?)?,
        row.try_get::<f64, _>("price").map_err(ser)?,
        author,
    )
    .map_err(ser)?;

    Book::from_persisted(
        book_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        details,
        u32_from_i64(
            "current_page",
            row.try_get::<i64, _>("current_page").map_err(ser)?,
        )?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_ids_are_rejected() {
        assert!(book_id_from_i64(-1).is_err());
        assert_eq!(book_id_from_i64(7).unwrap(), BookId::new(7));
    }

    #[test]
    fn ids_beyond_i64_are_rejected() {
        assert!(book_id_to_i64(BookId::new(u64::MAX)).is_err());
        assert_eq!(book_id_to_i64(BookId::new(3)).unwrap(), 3);
    }
}
