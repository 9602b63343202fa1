use super::book::BookError;

/// Name/surname pair credited on a book.
///
/// Owned by its `Book`; there is no update path once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    name: String,
    surname: String,
}

impl Author {
    /// Creates an author from trimmed, non-empty parts.
    ///
    /// # Errors
    ///
    /// Returns `BookError::EmptyAuthorName` or `BookError::EmptyAuthorSurname`
    /// when the respective part is empty or whitespace-only.
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Result<Self, BookError> {
        let name = name.into();
        let surname = surname.into();
        let name = name.trim();
        let surname = surname.trim();
        if name.is_empty() {
            return Err(BookError::EmptyAuthorName);
        }
        if surname.is_empty() {
            return Err(BookError::EmptyAuthorSurname);
        }
        Ok(Self {
            name: name.to_owned(),
            surname: surname.to_owned(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn surname(&self) -> &str {
        &self.surname
    }

    /// `"{name} {surname}"`, as shown under a book title.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_parts() {
        let author = Author::new("  Ursula ", " Le Guin ").unwrap();
        assert_eq!(author.name(), "Ursula");
        assert_eq!(author.surname(), "Le Guin");
        assert_eq!(author.full_name(), "Ursula Le Guin");
    }

    #[test]
    fn rejects_blank_parts() {
        assert_eq!(Author::new(" ", "Le Guin"), Err(BookError::EmptyAuthorName));
        assert_eq!(Author::new("Ursula", ""), Err(BookError::EmptyAuthorSurname));
    }
}
