#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    BookRepository, InMemoryRepository, NewBookRecord, SettingsRepository, Storage, StorageError,
};
