#![forbid(unsafe_code)]

pub mod error;
pub mod filter;
pub mod model;
pub mod progress;
pub mod time;

pub use error::Error;
pub use filter::{BookFilter, ReadingStatus};
pub use progress::{TimeLeft, status, time_left};
pub use time::Clock;
