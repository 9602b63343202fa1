//! Derived reading progress: completion percentage and time left.

use std::fmt;

use serde::Serialize;

use crate::model::{Book, ReadingSpeed};

/// Percentage of the book already read, `0..=100`.
///
/// Page `n` counts the `n - 1` pages before it as read, so an unopened book
/// is at 0 and only the last page reports 100.
#[must_use]
pub fn status(book: &Book) -> u8 {
    let current = u64::from(book.current_page());
    let total = u64::from(book.page_count());
    if current >= total {
        return 100;
    }
    let percent = (current - 1) * 100 / total;
    u8::try_from(percent).unwrap_or(100)
}

/// Estimated reading time remaining at `speed`.
#[must_use]
pub fn time_left(book: &Book, speed: ReadingSpeed) -> TimeLeft {
    let pages_left = book.page_count().saturating_sub(book.current_page());
    if pages_left == 0 {
        return TimeLeft::Finished;
    }
    let minutes = (f64::from(pages_left) / speed.pages_per_minute()).floor();
    // speed >= 0.5 and pages_left fits in u32, so the quotient is finite and non-negative.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let minutes = minutes as u64;
    TimeLeft::Minutes(minutes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeLeft {
    Finished,
    Minutes(u64),
}

impl TimeLeft {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, TimeLeft::Finished)
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TimeLeft::Finished => f.write_str("Finished"),
            TimeLeft::Minutes(minutes) if minutes >= 60 => {
                write!(f, "{}h {}m left", minutes / 60, minutes % 60)
            }
            TimeLeft::Minutes(minutes) => write!(f, "{minutes}m left"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, BookDetails, BookId};
    use crate::time::fixed_now;

    fn book(pages: u32, current: u32) -> Book {
        let details = BookDetails::new(
            "Book",
            2000,
            pages,
            5.0,
            Author::new("Jane", "Doe").unwrap(),
        )
        .unwrap();
        Book::from_persisted(BookId::new(1), details, current, fixed_now()).unwrap()
    }

    fn speed(ppm: f64) -> ReadingSpeed {
        ReadingSpeed::new(ppm).unwrap()
    }

    #[test]
    fn status_is_zero_on_first_page() {
        assert_eq!(status(&book(300, 1)), 0);
        assert_eq!(status(&book(2, 1)), 0);
    }

    #[test]
    fn status_is_hundred_on_last_page() {
        assert_eq!(status(&book(300, 300)), 100);
        assert_eq!(status(&book(1, 1)), 100);
    }

    #[test]
    fn status_floors_pages_read() {
        assert_eq!(status(&book(200, 101)), 50);
        assert_eq!(status(&book(3, 2)), 33);
        assert_eq!(status(&book(100, 100)), 100);
        assert_eq!(status(&book(100, 99)), 98);
    }

    #[test]
    fn time_left_under_an_hour() {
        let left = time_left(&book(200, 101), speed(2.0));
        assert_eq!(left, TimeLeft::Minutes(49));
        assert_eq!(left.to_string(), "49m left");
    }

    #[test]
    fn time_left_over_an_hour() {
        let left = time_left(&book(300, 1), speed(1.0));
        assert_eq!(left, TimeLeft::Minutes(299));
        assert_eq!(left.to_string(), "4h 59m left");
    }

    #[test]
    fn time_left_exactly_one_hour() {
        assert_eq!(time_left(&book(61, 1), speed(1.0)).to_string(), "1h 0m left");
    }

    #[test]
    fn time_left_rounds_down_to_zero_minutes() {
        assert_eq!(time_left(&book(10, 9), speed(5.0)).to_string(), "0m left");
    }

    #[test]
    fn finished_iff_on_last_page() {
        assert!(time_left(&book(10, 10), speed(1.0)).is_finished());
        assert_eq!(time_left(&book(10, 10), speed(0.5)).to_string(), "Finished");
    }

    #[test]
    fn slowest_speed_gives_bounded_estimate() {
        let left = time_left(&book(u32::MAX, 1), speed(0.5));
        assert_eq!(left, TimeLeft::Minutes((u64::from(u32::MAX) - 1) * 2));
        assert!(!time_left(&book(10, 9), speed(5.0)).is_finished());
    }
}
