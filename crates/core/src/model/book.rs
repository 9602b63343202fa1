use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::filter::ReadingStatus;
use crate::model::author::Author;
use crate::model::ids::BookId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum BookError {
    #[error("book title cannot be empty")]
    EmptyTitle,

    #[error("author name cannot be empty")]
    EmptyAuthorName,

    #[error("author surname cannot be empty")]
    EmptyAuthorSurname,

    #[error("page count must be > 0")]
    ZeroPageCount,

    #[error("price must be a finite, non-negative amount")]
    InvalidPrice,

    #[error("current page {current_page} is outside 1..={page_count}")]
    CurrentPageOutOfRange { current_page: u32, page_count: u32 },
}

//
// ─── DETAILS ───────────────────────────────────────────────────────────────────
//

/// The user-editable part of a book: everything the add/edit form captures.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetails {
    title: String,
    publication_year: i32,
    page_count: u32,
    price: f64,
    author: Author,
}

impl BookDetails {
    /// Creates validated book details.
    ///
    /// # Errors
    ///
    /// Returns `BookError::EmptyTitle` for a blank title,
    /// `BookError::ZeroPageCount` when `page_count == 0` and
    /// `BookError::InvalidPrice` for negative or non-finite prices.
    pub fn new(
        title: impl Into<String>,
        publication_year: i32,
        page_count: u32,
        price: f64,
        author: Author,
    ) -> Result<Self, BookError> {
        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            return Err(BookError::EmptyTitle);
        }
        if page_count == 0 {
            return Err(BookError::ZeroPageCount);
        }
        if !price.is_finite() || price < 0.0 {
            return Err(BookError::InvalidPrice);
        }

        Ok(Self {
            title: title.to_owned(),
            publication_year,
            page_count,
            price,
            author,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn publication_year(&self) -> i32 {
        self.publication_year
    }

    #[must_use]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    #[must_use]
    pub fn author(&self) -> &Author {
        &self.author
    }
}

//
// ─── BOOK ──────────────────────────────────────────────────────────────────────
//

/// A tracked book with its reading position.
///
/// `1 <= current_page <= page_count` holds for every value of this type:
/// all mutators clamp into that range.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    id: BookId,
    details: BookDetails,
    current_page: u32,
    created_at: DateTime<Utc>,
}

impl Book {
    /// Creates an unopened book positioned on page 1.
    #[must_use]
    pub fn new(id: BookId, details: BookDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            details,
            current_page: 1,
            created_at,
        }
    }

    /// Rehydrate a book from storage.
    ///
    /// # Errors
    ///
    /// Returns `BookError::CurrentPageOutOfRange` if the stored position
    /// violates the page invariant.
    pub fn from_persisted(
        id: BookId,
        details: BookDetails,
        current_page: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, BookError> {
        if current_page == 0 || current_page > details.page_count {
            return Err(BookError::CurrentPageOutOfRange {
                current_page,
                page_count: details.page_count,
            });
        }
        Ok(Self {
            id,
            details,
            current_page,
            created_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    #[must_use]
    pub fn details(&self) -> &BookDetails {
        &self.details
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.details.title()
    }

    #[must_use]
    pub fn publication_year(&self) -> i32 {
        self.details.publication_year()
    }

    #[must_use]
    pub fn page_count(&self) -> u32 {
        self.details.page_count()
    }

    #[must_use]
    pub fn price(&self) -> f64 {
        self.details.price()
    }

    #[must_use]
    pub fn author(&self) -> &Author {
        self.details.author()
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn reading_status(&self) -> ReadingStatus {
        ReadingStatus::of(self)
    }

    /// Move to `page`, clamped into `1..=page_count`. Returns the stored page.
    pub fn set_current_page(&mut self, page: u32) -> u32 {
        self.current_page = page.clamp(1, self.page_count());
        self.current_page
    }

    /// Advance one page; stays put on the last page.
    pub fn next_page(&mut self) -> u32 {
        self.set_current_page(self.current_page.saturating_add(1))
    }

    /// Go back one page; stays put on page 1.
    pub fn previous_page(&mut self) -> u32 {
        self.set_current_page(self.current_page.saturating_sub(1))
    }

    /// Replace the editable details in place, keeping id and reading position.
    ///
    /// The position is clamped if the new page count is shorter.
    pub fn apply_details(&mut self, details: BookDetails) {
        self.details = details;
        self.current_page = self.current_page.clamp(1, self.page_count());
    }

    /// Text shown in the reading view for the current page.
    #[must_use]
    pub fn page_content(&self) -> String {
        format!(
            "This is page {} of {} by {}.",
            self.current_page,
            self.title(),
            self.author().full_name()
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
