use std::sync::Arc;

use reading_core::BookFilter;
use reading_core::model::{BookForm, FormErrorKind};
use reading_core::time::fixed_now;
use services::{AppServices, BookService, Clock, SettingsService};
use storage::repository::Storage;

fn form(title: &str, year: &str, pages: &str) -> BookForm {
    BookForm {
        title: title.into(),
        publication_year: year.into(),
        page_count: pages.into(),
        price: "15.00".into(),
        author_name: "Becky".into(),
        author_surname: "Chambers".into(),
    }
}

#[tokio::test]
async fn library_flow_add_read_filter_edit_clear() {
    let storage = Storage::sqlite("sqlite:file:memdb_library_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let clock = Clock::fixed(fixed_now());
    let books = BookService::new(clock, Arc::clone(&storage.books));
    let settings = SettingsService::new(Arc::clone(&storage.settings));

    let a = books.add_book(&form("Wayfarer 1", "2014", "100")).await.unwrap();
    let b = books.add_book(&form("Wayfarer 2", "2016", "100")).await.unwrap();
    let c = books.add_book(&form("Wayfarer 3", "2018", "100")).await.unwrap();
    books.add_book(&form("Wayfarer 4", "2025", "100")).await.unwrap_err();

    books.set_page(b.id(), 50).await.unwrap();
    books.set_page(c.id(), 100).await.unwrap();
    settings.set_reading_speed(2.0).await.unwrap();

    let services = AppServices::from_storage(&storage, clock);
    let completed = services.library(BookFilter::Completed).await.unwrap();
    assert_eq!(completed.counter(), "1 / 3");
    assert_eq!(completed.rows[0].id, c.id());
    assert_eq!(completed.rows[0].time_left_label, "Finished");

    let not_started = services.library(BookFilter::NotStarted).await.unwrap();
    assert_eq!(not_started.rows.len(), 1);
    assert_eq!(not_started.rows[0].id, a.id());
    assert_eq!(not_started.rows[0].time_left_label, "49m left");

    let edited = books
        .edit_book(b.id(), &form("Wayfarer 2: A Closed and Common Orbit", "2016", "40"))
        .await
        .unwrap();
    assert_eq!(edited.id(), b.id());
    assert_eq!(edited.current_page(), 40);
    let completed = services.library(BookFilter::Completed).await.unwrap();
    assert_eq!(completed.visible, 2);

    assert_eq!(books.clear_books().await.unwrap(), 3);
    let all = services.library(BookFilter::All).await.unwrap();
    assert_eq!(all.counter(), "0 / 0");
}

#[tokio::test]
async fn future_year_is_a_year_error_and_nothing_is_saved() {
    let storage = Storage::in_memory();
    let books = BookService::new(Clock::fixed(fixed_now()), Arc::clone(&storage.books));

    let err = books
        .add_book(&form("Time Travel", "3000", "10"))
        .await
        .unwrap_err();
    assert_eq!(err.form_kind(), Some(FormErrorKind::Year));

    let err = books
        .add_book(&form("Bad Pages", "2000", "abc"))
        .await
        .unwrap_err();
    assert_eq!(err.form_kind(), Some(FormErrorKind::General));

    assert!(books.list_books().await.unwrap().is_empty());
}
