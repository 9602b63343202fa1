//! Status buckets and the list filter built on them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::model::Book;

/// Where a reader is in a book. Every book is in exactly one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl ReadingStatus {
    /// Classify a book. Being on the last page wins over being on page 1,
    /// so a single-page book counts as completed.
    #[must_use]
    pub fn of(book: &Book) -> Self {
        if book.current_page() == book.page_count() {
            ReadingStatus::Completed
        } else if book.current_page() == 1 {
            ReadingStatus::NotStarted
        } else {
            ReadingStatus::InProgress
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReadingStatus::NotStarted => "Not Started",
            ReadingStatus::InProgress => "In Progress",
            ReadingStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookFilter {
    #[default]
    All,
    NotStarted,
    InProgress,
    Completed,
}

impl BookFilter {
    /// Display order of the filter picker.
    pub const ALL: [BookFilter; 4] = [
        BookFilter::All,
        BookFilter::NotStarted,
        BookFilter::InProgress,
        BookFilter::Completed,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BookFilter::All => "All",
            BookFilter::NotStarted => ReadingStatus::NotStarted.label(),
            BookFilter::InProgress => ReadingStatus::InProgress.label(),
            BookFilter::Completed => ReadingStatus::Completed.label(),
        }
    }

    #[must_use]
    pub fn matches(self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::NotStarted => book.reading_status() == ReadingStatus::NotStarted,
            BookFilter::InProgress => book.reading_status() == ReadingStatus::InProgress,
            BookFilter::Completed => book.reading_status() == ReadingStatus::Completed,
        }
    }

    /// Books passing the filter, in their original order. The input is untouched.
    #[must_use]
    pub fn apply<'a>(self, books: &'a [Book]) -> Vec<&'a Book> {
        books.iter().filter(|book| self.matches(book)).collect()
    }
}

impl fmt::Display for BookFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown filter {raw:?} (expected all, not-started, in-progress or completed)")]
pub struct ParseFilterError {
    raw: String,
}

impl FromStr for BookFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "all" => Ok(BookFilter::All),
            "notstarted" => Ok(BookFilter::NotStarted),
            "inprogress" => Ok(BookFilter::InProgress),
            "completed" => Ok(BookFilter::Completed),
            _ => Err(ParseFilterError { raw: s.to_string() }),
        }
    }
}
