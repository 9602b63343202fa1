use std::fmt;

use thiserror::Error;

use crate::model::author::Author;
use crate::model::book::{Book, BookDetails, BookError};

/// The six text inputs of the add/edit book form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    PublicationYear,
    PageCount,
    Price,
    AuthorName,
    AuthorSurname,
}

impl FormField {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::PublicationYear => "Publication Year",
            FormField::PageCount => "Number of Pages",
            FormField::Price => "Price",
            FormField::AuthorName => "Author Name",
            FormField::AuthorSurname => "Author Surname",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse classification used to pick the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormErrorKind {
    /// Missing field or unparsable/invalid value.
    General,
    /// Publication year lies in the future.
    Year,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(FormField),

    #[error("{0} is not a valid number")]
    InvalidNumber(FormField),

    #[error("number of pages must be greater than zero")]
    InvalidPageCount,

    #[error("price must be a non-negative amount")]
    InvalidPrice,

    #[error("publication year {year} is after the current year {current_year}")]
    FutureYear { year: i32, current_year: i32 },
}

impl FormError {
    #[must_use]
    pub fn kind(&self) -> FormErrorKind {
        match self {
            FormError::FutureYear { .. } => FormErrorKind::Year,
            _ => FormErrorKind::General,
        }
    }
}

impl From<BookError> for FormError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::EmptyTitle => FormError::MissingField(FormField::Title),
            BookError::EmptyAuthorName => FormError::MissingField(FormField::AuthorName),
            BookError::EmptyAuthorSurname => FormError::MissingField(FormField::AuthorSurname),
            BookError::ZeroPageCount | BookError::CurrentPageOutOfRange { .. } => {
                FormError::InvalidPageCount
            }
            BookError::InvalidPrice => FormError::InvalidPrice,
        }
    }
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub publication_year: String,
    pub page_count: String,
    pub price: String,
    pub author_name: String,
    pub author_surname: String,
}

impl BookForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the form with an existing book, for editing.
    #[must_use]
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title().to_owned(),
            publication_year: book.publication_year().to_string(),
            page_count: book.page_count().to_string(),
            price: book.price().to_string(),
            author_name: book.author().name().to_owned(),
            author_surname: book.author().surname().to_owned(),
        }
    }

    /// True once every field has content; gates the Save action.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.first_missing().is_none()
    }

    fn fields(&self) -> [(FormField, &str); 6] {
        [
            (FormField::Title, self.title.as_str()),
            (FormField::PublicationYear, self.publication_year.as_str()),
            (FormField::PageCount, self.page_count.as_str()),
            (FormField::Price, self.price.as_str()),
            (FormField::AuthorName, self.author_name.as_str()),
            (FormField::AuthorSurname, self.author_surname.as_str()),
        ]
    }

    fn first_missing(&self) -> Option<FormField> {
        self.fields()
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
    }

    /// Validate the form into typed book details.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingField` for empty inputs,
    /// `FormError::InvalidNumber` when year, page count or price fail to
    /// parse, `FormError::InvalidPageCount`/`FormError::InvalidPrice` for
    /// out-of-range numbers and `FormError::FutureYear` when the publication
    /// year exceeds `current_year`.
    pub fn validate(&self, current_year: i32) -> Result<BookDetails, FormError> {
        if let Some(field) = self.first_missing() {
            return Err(FormError::MissingField(field));
        }

        let year: i32 = parse_field(&self.publication_year, FormField::PublicationYear)?;
        let pages: i64 = parse_field(&self.page_count, FormField::PageCount)?;
        let price: f64 = parse_field(&self.price, FormField::Price)?;

        let pages = u32::try_from(pages).map_err(|_| FormError::InvalidPageCount)?;

        if year > current_year {
            return Err(FormError::FutureYear { year, current_year });
        }

        let author = Author::new(&*self.author_name, &*self.author_surname)?;
        Ok(BookDetails::new(&*self.title, year, pages, price, author)?)
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, field: FormField) -> Result<T, FormError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| FormError::InvalidNumber(field))
}
