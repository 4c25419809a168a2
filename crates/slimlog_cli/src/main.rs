//! Slimlog CLI
//!
//! A command-line diet diary: log foods eaten per meal, configure food
//! metadata, record body measurements and notes. State is kept in a single
//! conditionally-written blob under the data directory, optionally
//! encrypted with a passphrase, and synced through the same engine the
//! application uses.

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use slimlog_model::{today, Category, DietLog, Meal, MeasurementType};
use slimlog_store::{BlobStore, EncryptedBlobStore, EncryptionKey, FileBlobStore};
use slimlog_sync::{DietReducer, SyncConfig, SyncEngine};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Blob key the diary document is stored under.
const DIARY_KEY: &str = "diary";

/// Slimlog command-line diet diary.
#[derive(Parser)]
#[command(name = "slimlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(global = true, long)]
    data_dir: Option<PathBuf>,

    /// Passphrase for at-rest encryption of the diary blob
    #[arg(global = true, long, env = "SLIMLOG_PASSPHRASE")]
    passphrase: Option<String>,

    /// Day to operate on, YYYY-MM-DD (defaults to today)
    #[arg(global = true, long)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one helping of a configured food at a meal
    Ate {
        /// Meal: breakfast, lunch, tea or pud
        meal: Meal,
        /// Food name
        food: String,
    },

    /// Remove one helping of a food from a meal
    Delete {
        /// Meal: breakfast, lunch, tea or pud
        meal: Meal,
        /// Food name
        food: String,
    },

    /// Configure a new food and record one helping of it
    AddFood {
        /// Food name
        name: String,
        /// Calories per helping
        calories: f64,
        /// Grouping category
        #[arg(long, default_value = "other")]
        category: Category,
        /// Meal to record the first helping against
        #[arg(long, default_value = "tea")]
        meal: Meal,
    },

    /// Record a body measurement for the day
    Measure {
        /// What to measure: waist or weight
        kind: MeasurementType,
        /// The measured value
        value: f64,
    },

    /// Set the day's note
    Note {
        /// The note text
        text: String,
    },

    /// Show the day's log
    Show,

    /// List configured foods
    Foods,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("slimlog"),
    };
    let store = build_store(data_dir, cli.passphrase.as_deref())?;

    let date = cli.date.unwrap_or_else(today);
    let engine = SyncEngine::new(
        SyncConfig::new(DIARY_KEY),
        store,
        DietReducer,
        DietLog::starting_on(date),
    );

    // Offline-first: a failed load is reported but editing proceeds on the
    // last known (here: default) state.
    if let Err(e) = engine.initialize() {
        eprintln!("warning: could not load diary: {e}");
    }

    commands::run(&engine, date, cli.command)?;

    engine.flush()?;
    Ok(())
}

fn build_store(
    data_dir: PathBuf,
    passphrase: Option<&str>,
) -> Result<Box<dyn BlobStore>, Box<dyn std::error::Error>> {
    let file = FileBlobStore::open(data_dir)?;
    Ok(match passphrase {
        Some(passphrase) => {
            let key =
                EncryptionKey::derive_from_passphrase(passphrase.as_bytes(), DIARY_KEY.as_bytes())?;
            Box::new(EncryptedBlobStore::new(file, &key))
        }
        None => Box::new(file),
    })
}
