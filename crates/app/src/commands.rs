use std::error::Error;
use std::future::Future;
use std::io::{BufRead, Write};

use reading_core::BookFilter;
use reading_core::model::{Book, BookForm, BookId, FormErrorKind};
use services::{AppServices, BookServiceError, LibraryRow, LibraryView, SettingsServiceError};
use tracing::info;

use crate::args::{Command, FormPatch};

type CommandResult<T = ()> = Result<T, Box<dyn Error>>;

/// Run one parsed command against `services`.
///
/// Prompts are written to `out` and answered from `input`.
pub async fn execute(
    services: &AppServices,
    command: Command,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> CommandResult {
    match command {
        Command::List { filter, json } => list(services, filter, json, out).await,
        Command::Add(form) => add(services, &form, input, out).await,
        Command::Edit { id, patch } => edit(services, id, patch, input, out).await,
        Command::Show { id } => show(services, id, out).await,
        Command::Page { id, page } => {
            let book = services
                .books()
                .set_page(id, page)
                .await
                .map_err(|e| describe(Some(id), &e))?;
            print_position(services, &book, out).await
        }
        Command::Next { id } => {
            let book = services
                .books()
                .next_page(id)
                .await
                .map_err(|e| describe(Some(id), &e))?;
            print_position(services, &book, out).await
        }
        Command::Prev { id } => {
            let book = services
                .books()
                .previous_page(id)
                .await
                .map_err(|e| describe(Some(id), &e))?;
            print_position(services, &book, out).await
        }
        Command::Delete { id } => {
            services
                .books()
                .delete_book(id)
                .await
                .map_err(|e| describe(Some(id), &e))?;
            writeln!(out, "Deleted book {id}")?;
            Ok(())
        }
        Command::Clear { yes } => clear(services, yes, input, out).await,
        Command::Speed { pages_per_minute } => speed(services, pages_per_minute, out).await,
        Command::Help => {
            crate::args::print_usage();
            Ok(())
        }
    }
}

fn describe(id: Option<BookId>, err: &BookServiceError) -> String {
    match (err.form_kind(), id) {
        (Some(FormErrorKind::Year), _) => format!("Invalid publication year: {err}"),
        (Some(FormErrorKind::General), _) => {
            format!("Please fill in all fields correctly: {err}")
        }
        (None, Some(id)) if err.is_not_found() => format!("No book with id {id}"),
        (None, _) => format!("Storage error: {err}"),
    }
}

/// Ask a yes/no question. Anything but `y`/`yes` (including EOF) is a no.
fn confirm(input: &mut impl BufRead, out: &mut impl Write, question: &str) -> CommandResult<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Submit the same form until it is saved, rejected, or the user gives up.
///
/// Returns `Ok(None)` when the user declines to retry.
async fn submit_with_retry<F, Fut>(
    id: Option<BookId>,
    input: &mut impl BufRead,
    out: &mut impl Write,
    mut submit: F,
) -> CommandResult<Option<Book>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Book, BookServiceError>>,
{
    loop {
        match submit().await {
            Ok(book) => return Ok(Some(book)),
            Err(err) if err.is_retryable() => {
                writeln!(out, "Could not save the book: {err}")?;
                if !confirm(input, out, "Retry?")? {
                    return Ok(None);
                }
            }
            Err(err) => return Err(describe(id, &err).into()),
        }
    }
}

async fn list(
    services: &AppServices,
    filter: BookFilter,
    json: bool,
    out: &mut impl Write,
) -> CommandResult {
    let view = services.library(filter).await?;
    if json {
        writeln!(out, "{}", view.to_json_pretty()?)?;
        return Ok(());
    }
    print_library(&view, out)
}

fn print_library(view: &LibraryView, out: &mut impl Write) -> CommandResult {
    writeln!(
        out,
        "Filter: {}    Books Visible: {}",
        view.filter.label(),
        view.counter()
    )?;
    if view.rows.is_empty() {
        writeln!(out, "No books.")?;
        return Ok(());
    }
    for row in &view.rows {
        print_row(row, out)?;
    }
    Ok(())
}

fn print_row(row: &LibraryRow, out: &mut impl Write) -> CommandResult {
    writeln!(out, "{:>4}  {} by {}", row.id, row.title, row.author)?;
    writeln!(
        out,
        "      {} {}%  page {}/{}  {}",
        row.status.label(),
        row.percent,
        row.current_page,
        row.page_count,
        row.time_left_label
    )?;
    Ok(())
}

async fn add(
    services: &AppServices,
    form: &BookForm,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> CommandResult {
    let books = services.books();
    let books = books.as_ref();
    let saved = submit_with_retry(None, input, out, move || books.add_book(form)).await?;
    match saved {
        Some(book) => writeln!(out, "Added book {}: {}", book.id(), book.title())?,
        None => writeln!(out, "Cancelled; nothing was saved.")?,
    }
    Ok(())
}

async fn edit(
    services: &AppServices,
    id: BookId,
    patch: FormPatch,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> CommandResult {
    let books = services.books();
    let current = books
        .get_book(id)
        .await?
        .ok_or_else(|| format!("No book with id {id}"))?;
    let form = patch.apply(BookForm::from_book(&current));

    let books = books.as_ref();
    let form = &form;
    let saved = submit_with_retry(Some(id), input, out, move || books.edit_book(id, form)).await?;
    match saved {
        Some(book) => writeln!(out, "Updated book {}: {}", book.id(), book.title())?,
        None => writeln!(out, "Cancelled; book {id} was not changed.")?,
    }
    Ok(())
}

async fn show(services: &AppServices, id: BookId, out: &mut impl Write) -> CommandResult {
    let book = services
        .books()
        .get_book(id)
        .await?
        .ok_or_else(|| format!("No book with id {id}"))?;
    writeln!(
        out,
        "{} by {} ({}), {} pages, {:.2}",
        book.title(),
        book.author().full_name(),
        book.publication_year(),
        book.page_count(),
        book.price()
    )?;
    print_position(services, &book, out).await
}

async fn print_position(services: &AppServices, book: &Book, out: &mut impl Write) -> CommandResult {
    let speed = services.settings().reading_speed().await?;
    let row = LibraryRow::from_book(book, speed);
    writeln!(out, "{}", book.page_content())?;
    writeln!(
        out,
        "{}: {}% read, {}",
        row.status.label(),
        row.percent,
        row.time_left_label
    )?;
    Ok(())
}

async fn clear(
    services: &AppServices,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> CommandResult {
    if !yes
        && !confirm(
            input,
            out,
            "Delete all books? This action cannot be undone.",
        )?
    {
        writeln!(out, "Nothing deleted.")?;
        return Ok(());
    }
    let removed = services.books().clear_books().await?;
    writeln!(out, "Deleted {removed} books")?;
    Ok(())
}

async fn speed(
    services: &AppServices,
    pages_per_minute: Option<f64>,
    out: &mut impl Write,
) -> CommandResult {
    let settings = services.settings();
    let speed = match pages_per_minute {
        None => settings.reading_speed().await?,
        Some(value) => {
            let saved = settings.set_reading_speed(value).await.map_err(|err| match err {
                SettingsServiceError::Settings(inner) => inner.to_string(),
                other => format!("Storage error: {other}"),
            })?;
            info!(pages_per_minute = value, "reading speed set from cli");
            saved.reading_speed()
        }
    };
    writeln!(out, "Reading speed: {speed}")?;
    Ok(())
}
