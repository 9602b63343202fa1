use std::fmt;

use chrono::{DateTime, Utc};
use reading_core::model::{AppSettings, Author, BookDetails, ReadingSpeed};
use storage::repository::{NewBookRecord, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    books: u32,
    speed: Option<f64>,
    clear: bool,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBooks { raw: String },
    InvalidSpeed { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBooks { raw } => write!(f, "invalid --books value: {raw}"),
            ArgsError::InvalidSpeed { raw } => write!(f, "invalid --speed value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("READING_DB_URL").unwrap_or_else(|_| "sqlite:reading.sqlite3".into());
        let mut books = std::env::var("READING_SEED_BOOKS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(6);
        let mut speed: Option<f64> = None;
        let mut clear = false;
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--books" => {
                    let value = require_value(&mut args, "--books")?;
                    books = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidBooks { raw: value.clone() })?;
                }
                "--speed" => {
                    let value = require_value(&mut args, "--speed")?;
                    let parsed = value
                        .parse::<f64>()
                        .map_err(|_| ArgsError::InvalidSpeed { raw: value.clone() })?;
                    speed = Some(parsed);
                }
                "--clear" => clear = true,
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            books,
            speed,
            clear,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>   SQLite URL (default: sqlite:reading.sqlite3)");
    eprintln!("  --books <n>         Number of sample books to insert (default: 6)");
    eprintln!("  --speed <ppm>       Also store a reading speed (0.5 to 5.0, steps of 0.5)");
    eprintln!("  --clear             Delete existing books first");
    eprintln!("  --now <rfc3339>     Timestamp used for created_at (default: now)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  READING_DB_URL, READING_SEED_BOOKS");
}

// (title, year, pages, price, name, surname, fraction of pages read)
const SAMPLES: &[(&str, i32, u32, f64, &str, &str, f64)] = &[
    ("The Left Hand of Darkness", 1969, 304, 10.99, "Ursula", "Le Guin", 0.0),
    ("Dune", 1965, 412, 12.50, "Frank", "Herbert", 0.4),
    ("Kindred", 1979, 264, 9.00, "Octavia", "Butler", 1.0),
    ("Solaris", 1961, 204, 8.25, "Stanislaw", "Lem", 0.75),
    ("Neuromancer", 1984, 271, 11.00, "William", "Gibson", 0.0),
    ("Flatland", 1884, 1, 2.00, "Edwin", "Abbott", 0.0),
];

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    if args.clear {
        let removed = storage.books.delete_all_books().await?;
        println!("Removed {removed} existing books");
    }

    for i in 0..args.books {
        let idx = (i as usize) % SAMPLES.len();
        let (title, year, pages, price, name, surname, read) = SAMPLES[idx];
        let details = BookDetails::new(title, year, pages, price, Author::new(name, surname)?)?;
        let mut record = NewBookRecord::from_details(details, now);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let page = (f64::from(pages) * read).round() as u32;
        record.current_page = page.clamp(1, pages);
        storage.books.insert_book(record).await?;
    }

    if let Some(speed) = args.speed {
        let settings = AppSettings::new(ReadingSpeed::new(speed)?);
        storage.settings.save_settings(&settings).await?;
    }

    println!("Seeded {} books into {}", args.books, args.db_url);

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
