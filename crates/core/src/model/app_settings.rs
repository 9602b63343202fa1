use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("reading speed must be between 0.5 and 5.0 pages per minute in steps of 0.5, got {0}")]
    InvalidReadingSpeed(f64),
}

/// Pages read per minute, a multiple of 0.5 in `0.5..=5.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ReadingSpeed(f64);

impl ReadingSpeed {
    pub const DEFAULT_PAGES_PER_MINUTE: f64 = 1.0;
    pub const MIN_PAGES_PER_MINUTE: f64 = 0.5;
    pub const MAX_PAGES_PER_MINUTE: f64 = 5.0;
    pub const STEP: f64 = 0.5;

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidReadingSpeed` for values outside
    /// `0.5..=5.0`, off the 0.5 step, or non-finite.
    pub fn new(pages_per_minute: f64) -> Result<Self, SettingsError> {
        let in_range = (Self::MIN_PAGES_PER_MINUTE..=Self::MAX_PAGES_PER_MINUTE)
            .contains(&pages_per_minute);
        let on_step = (pages_per_minute / Self::STEP).fract() == 0.0;
        if !in_range || !on_step {
            return Err(SettingsError::InvalidReadingSpeed(pages_per_minute));
        }
        Ok(Self(pages_per_minute))
    }

    #[must_use]
    pub fn pages_per_minute(self) -> f64 {
        self.0
    }
}

impl Default for ReadingSpeed {
    fn default() -> Self {
        Self(Self::DEFAULT_PAGES_PER_MINUTE)
    }
}

impl fmt::Display for ReadingSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} pages per minute", self.0)
    }
}

/// User preferences persisted alongside the library.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AppSettings {
    reading_speed: ReadingSpeed,
}

impl AppSettings {
    #[must_use]
    pub fn new(reading_speed: ReadingSpeed) -> Self {
        Self { reading_speed }
    }

    /// Rebuild settings from a stored raw speed.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the stored speed is out of range.
    pub fn from_persisted(reading_speed: f64) -> Result<Self, SettingsError> {
        Ok(Self::new(ReadingSpeed::new(reading_speed)?))
    }

    #[must_use]
    pub fn reading_speed(&self) -> ReadingSpeed {
        self.reading_speed
    }

    #[must_use]
    pub fn with_reading_speed(mut self, reading_speed: ReadingSpeed) -> Self {
        self.reading_speed = reading_speed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_speed_is_one_page_per_minute() {
        let settings = AppSettings::default();
        assert!((settings.reading_speed().pages_per_minute() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_positive_and_non_finite_speeds() {
        for raw in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(ReadingSpeed::new(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn accepts_bounds_and_half_steps() {
        assert_eq!(ReadingSpeed::new(0.5).unwrap().to_string(), "0.5 pages per minute");
        assert_eq!(ReadingSpeed::new(5.0).unwrap().to_string(), "5.0 pages per minute");
        assert_eq!(ReadingSpeed::new(2.5).unwrap().to_string(), "2.5 pages per minute");
    }

    #[test]
    fn rejects_speeds_outside_range_or_off_step() {
        for raw in [0.04, 0.25, 0.49, 5.5, 100.0, 1e-300, 0.75, 1.2] {
            assert_eq!(
                ReadingSpeed::new(raw),
                Err(SettingsError::InvalidReadingSpeed(raw)),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn from_persisted_validates() {
        assert!(AppSettings::from_persisted(-2.0).is_err());
        let settings = AppSettings::from_persisted(2.5).unwrap();
        assert!((settings.reading_speed().pages_per_minute() - 2.5).abs() < f64::EPSILON);
    }
}
