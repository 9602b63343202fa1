//! Presentation model for the book list: one row per visible book plus the
//! "visible / total" counter.

use serde::Serialize;

use reading_core::model::{Book, BookId, ReadingSpeed};
use reading_core::{BookFilter, ReadingStatus, TimeLeft, status, time_left};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryRow {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub status: ReadingStatus,
    pub percent: u8,
    pub current_page: u32,
    pub page_count: u32,
    pub time_left: TimeLeft,
    pub time_left_label: String,
}

impl LibraryRow {
    #[must_use]
    pub fn from_book(book: &Book, speed: ReadingSpeed) -> Self {
        let left = time_left(book, speed);
        Self {
            id: book.id(),
            title: book.title().to_owned(),
            author: book.author().full_name(),
            status: book.reading_status(),
            percent: status(book),
            current_page: book.current_page(),
            page_count: book.page_count(),
            time_left: left,
            time_left_label: left.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryView {
    pub filter: BookFilter,
    pub rows: Vec<LibraryRow>,
    pub visible: usize,
    pub total: usize,
}

impl LibraryView {
    #[must_use]
    pub fn build(books: &[Book], filter: BookFilter, speed: ReadingSpeed) -> Self {
        let rows: Vec<LibraryRow> = filter
            .apply(books)
            .into_iter()
            .map(|book| LibraryRow::from_book(book, speed))
            .collect();
        Self {
            filter,
            visible: rows.len(),
            total: books.len(),
            rows,
        }
    }

    /// `"{visible} / {total}"`
    #[must_use]
    pub fn counter(&self) -> String {
        format!("{} / {}", self.visible, self.total)
    }

    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reading_core::model::{Author, BookDetails};
    use reading_core::time::fixed_now;

    fn book(id: u64, pages: u32, current: u32) -> Book {
        let details = BookDetails::new(
            format!("Book {id}"),
            2010,
            pages,
            1.0,
            Author::new("Ann", "Leckie").unwrap(),
        )
        .unwrap();
        Book::from_persisted(BookId::new(id), details, current, fixed_now()).unwrap()
    }

    fn shelf() -> Vec<Book> {
        vec![book(1, 300, 1), book(2, 300, 1), book(3, 200, 101), book(4, 100, 100)]
    }

    #[test]
    fn rows_carry_progress_and_time_left() {
        let view = LibraryView::build(
            &shelf(),
            BookFilter::InProgress,
            ReadingSpeed::new(2.0).unwrap(),
        );
        assert_eq!(view.counter(), "1 / 4");
        let row = &view.rows[0];
        assert_eq!(row.id, BookId::new(3));
        assert_eq!(row.status, ReadingStatus::InProgress);
        assert_eq!(row.percent, 50);
        assert_eq!(row.time_left_label, "49m left");
        assert_eq!(row.author, "Ann Leckie");
    }

    #[test]
    fn all_filter_keeps_order() {
        let view = LibraryView::build(&shelf(), BookFilter::All, ReadingSpeed::default());
        let ids: Vec<u64> = view.rows.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, [1, 2, 3, 4]);
        assert_eq!(view.rows[0].time_left_label, "4h 59m left");
        assert_eq!(view.rows[3].time_left_label, "Finished");
        assert_eq!(view.rows[3].percent, 100);
    }

    #[test]
    fn json_uses_snake_case_enums() {
        let view = LibraryView::build(&shelf(), BookFilter::Completed, ReadingSpeed::default());
        let json: serde_json::Value = serde_json::from_str(&view.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["filter"], "completed");
        assert_eq!(json["visible"], 1);
        assert_eq!(json["rows"][0]["status"], "completed");
        assert_eq!(json["rows"][0]["time_left"], "finished");
        assert_eq!(json["rows"][0]["id"], 4);
    }

    #[test]
    fn empty_library() {
        let view = LibraryView::build(&[], BookFilter::NotStarted, ReadingSpeed::default());
        assert!(view.rows.is_empty());
        assert_eq!(view.counter(), "0 / 0");
    }
}
