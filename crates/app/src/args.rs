use std::fmt;

use reading_core::BookFilter;
use reading_core::model::{BookForm, BookId};

pub const DB_URL_ENV: &str = "READING_DB_URL";
const DEFAULT_DB_URL: &str = "sqlite:reading.sqlite3";

#[derive(Debug, PartialEq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidBookId { raw: String },
    InvalidPage { raw: String },
    InvalidSpeed { raw: String },
    InvalidFilter { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidBookId { raw } => write!(f, "invalid book id: {raw}"),
            ArgsError::InvalidPage { raw } => write!(f, "invalid page number: {raw}"),
            ArgsError::InvalidSpeed { raw } => write!(f, "invalid reading speed: {raw}"),
            ArgsError::InvalidFilter { raw } => write!(
                f,
                "invalid --filter value: {raw} (all, not-started, in-progress, completed)"
            ),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Field overrides for `edit`; `None` keeps the stored value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormPatch {
    pub title: Option<String>,
    pub publication_year: Option<String>,
    pub page_count: Option<String>,
    pub price: Option<String>,
    pub author_name: Option<String>,
    pub author_surname: Option<String>,
}

impl FormPatch {
    pub fn apply(self, mut form: BookForm) -> BookForm {
        if let Some(v) = self.title {
            form.title = v;
        }
        if let Some(v) = self.publication_year {
            form.publication_year = v;
        }
        if let Some(v) = self.page_count {
            form.page_count = v;
        }
        if let Some(v) = self.price {
            form.price = v;
        }
        if let Some(v) = self.author_name {
            form.author_name = v;
        }
        if let Some(v) = self.author_surname {
            form.author_surname = v;
        }
        form
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List { filter: BookFilter, json: bool },
    Add(BookForm),
    Edit { id: BookId, patch: FormPatch },
    Show { id: BookId },
    Page { id: BookId, page: u32 },
    Next { id: BookId },
    Prev { id: BookId },
    Delete { id: BookId },
    Clear { yes: bool },
    Speed { pages_per_minute: Option<f64> },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub db_url: String,
    pub command: Command,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  reading [--db <sqlite_url>] <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list   [--filter all|not-started|in-progress|completed] [--json]");
    eprintln!("  add    --title <t> --year <y> --pages <n> --price <p>");
    eprintln!("         --author-name <name> --author-surname <surname>");
    eprintln!("  edit   <id> [any add option]");
    eprintln!("  show   <id>");
    eprintln!("  page   <id> <page>");
    eprintln!("  next   <id>");
    eprintln!("  prev   <id>");
    eprintln!("  delete <id>");
    eprintln!("  clear  [--yes]");
    eprintln!("  speed  [<pages_per_minute>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {DB_URL_ENV}, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_id(args: &mut impl Iterator<Item = String>) -> Result<BookId, ArgsError> {
    let raw = args.next().ok_or(ArgsError::MissingArgument { name: "id" })?;
    raw.parse().map_err(|_| ArgsError::InvalidBookId { raw })
}

fn no_more(args: &mut impl Iterator<Item = String>) -> Result<(), ArgsError> {
    match args.next() {
        Some(extra) => Err(ArgsError::UnknownArg(extra)),
        None => Ok(()),
    }
}

fn parse_patch(args: &mut impl Iterator<Item = String>) -> Result<FormPatch, ArgsError> {
    let mut patch = FormPatch::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--title" => patch.title = Some(require_value(args, "--title")?),
            "--year" => patch.publication_year = Some(require_value(args, "--year")?),
            "--pages" => patch.page_count = Some(require_value(args, "--pages")?),
            "--price" => patch.price = Some(require_value(args, "--price")?),
            "--author-name" => patch.author_name = Some(require_value(args, "--author-name")?),
            "--author-surname" => {
                patch.author_surname = Some(require_value(args, "--author-surname")?);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(patch)
}

fn parse_command(mut args: impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let Some(name) = args.next() else {
        return Ok(Command::List {
            filter: BookFilter::All,
            json: false,
        });
    };

    let command = match name.as_str() {
        "list" | "ls" => {
            let mut filter = BookFilter::All;
            let mut json = false;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--filter" | "-f" => {
                        let value = require_value(&mut args, "--filter")?;
                        filter = value
                            .parse()
                            .map_err(|_| ArgsError::InvalidFilter { raw: value.clone() })?;
                    }
                    "--json" => json = true,
                    _ => return Err(ArgsError::UnknownArg(arg)),
                }
            }
            Command::List { filter, json }
        }
        // Missing fields are left empty and reported by form validation.
        "add" => Command::Add(parse_patch(&mut args)?.apply(BookForm::new())),
        "edit" => {
            let id = require_id(&mut args)?;
            let patch = parse_patch(&mut args)?;
            Command::Edit { id, patch }
        }
        "show" | "open" => {
            let id = require_id(&mut args)?;
            no_more(&mut args)?;
            Command::Show { id }
        }
        "page" => {
            let id = require_id(&mut args)?;
            let raw = args
                .next()
                .ok_or(ArgsError::MissingArgument { name: "page" })?;
            let page = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ArgsError::InvalidPage { raw: raw.clone() })?;
            no_more(&mut args)?;
            Command::Page { id, page }
        }
        "next" => {
            let id = require_id(&mut args)?;
            no_more(&mut args)?;
            Command::Next { id }
        }
        "prev" => {
            let id = require_id(&mut args)?;
            no_more(&mut args)?;
            Command::Prev { id }
        }
        "delete" | "rm" => {
            let id = require_id(&mut args)?;
            no_more(&mut args)?;
            Command::Delete { id }
        }
        "clear" => {
            let mut yes = false;
            for arg in args.by_ref() {
                match arg.as_str() {
                    "--yes" | "-y" => yes = true,
                    _ => return Err(ArgsError::UnknownArg(arg)),
                }
            }
            Command::Clear { yes }
        }
        "speed" => {
            let pages_per_minute = match args.next() {
                Some(raw) => Some(
                    raw.trim()
                        .parse::<f64>()
                        .map_err(|_| ArgsError::InvalidSpeed { raw: raw.clone() })?,
                ),
                None => None,
            };
            no_more(&mut args)?;
            Command::Speed { pages_per_minute }
        }
        "help" | "--help" | "-h" => Command::Help,
        _ => return Err(ArgsError::UnknownCommand(name)),
    };
    Ok(command)
}

impl Args {
    /// Parse the process arguments (without the program name).
    ///
    /// `--db` may appear anywhere; it overrides `READING_DB_URL`.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url =
            normalize_sqlite_url(env_db_url.unwrap_or_else(|| DEFAULT_DB_URL.into()));
        let mut rest = Vec::new();

        let mut argv = argv.into_iter();
        while let Some(arg) = argv.next() {
            if arg == "--db" {
                let value = require_value(&mut argv, "--db")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidDbUrl { raw: value });
                }
                db_url = normalize_sqlite_url(value);
            } else {
                rest.push(arg);
            }
        }

        let command = parse_command(rest.into_iter())?;
        Ok(Self { db_url, command })
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
