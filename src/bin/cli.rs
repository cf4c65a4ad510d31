//! linekv CLI
//!
//! Command-line interface for a local linekv store.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use linekv::{Config, MatchRule, Store};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// linekv CLI
#[derive(Parser, Debug)]
#[command(name = "linekv")]
#[command(about = "CLI for the linekv local key-value store")]
#[command(version)]
struct Args {
    /// Data file path (the key index is kept next to it)
    #[arg(short, long, default_value = "store/store.json")]
    store: PathBuf,

    /// Refuse writes once the data file reaches this many bytes
    #[arg(long)]
    max_size: Option<u64>,

    /// Delete any line containing the key text instead of matching the key field
    #[arg(long)]
    substring_delete: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a value under a new key
    Write {
        /// The key to write
        key: String,

        /// The value, as JSON (bare text is stored as a string)
        value: String,
    },

    /// Print the value stored under a key
    Read {
        /// The key to read
        key: String,
    },

    /// Delete a key
    Delete {
        /// The key to delete
        key: String,
    },

    /// Print every record as a table
    Show,

    /// List keys in insertion order
    Keys,

    /// Print every record as one JSON object
    Export,

    /// Compare the key index against the data file
    Check,

    /// Rebuild the key index from the data file
    Repair,

    /// Remove the store's files and directory
    Drop,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,linekv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> linekv::Result<()> {
    let mut builder = Config::builder().data_path(&args.store);
    if let Some(max) = args.max_size {
        builder = builder.max_data_size(max);
    }
    if args.substring_delete {
        builder = builder.match_rule(MatchRule::Substring);
    }

    let mut store = Store::open(builder.build())?;

    match args.command {
        Commands::Write { key, value } => {
            store.write(&key, &parse_value(&value))?;
            println!("Data Stored Successfully");
        }
        Commands::Read { key } => {
            println!("{}", store.read(&key)?);
        }
        Commands::Delete { key } => {
            store.delete(&key)?;
            println!("Data Deleted Successfully");
        }
        Commands::Show => {
            print!("{}", store.render_table()?);
        }
        Commands::Keys => {
            for key in store.keys() {
                println!("{}", key);
            }
        }
        Commands::Export => {
            println!("{}", serde_json::to_string_pretty(&store.export()?)?);
        }
        Commands::Check => {
            let report = store.check()?;
            print_report(&report);
        }
        Commands::Repair => {
            let report = store.repair()?;
            print_report(&report);
            if !report.is_consistent() {
                println!("Index rebuilt ({} keys)", store.len());
            }
        }
        Commands::Drop => {
            store.delete_store()?;
            println!("Store deleted");
        }
    }

    Ok(())
}

/// JSON if it parses, otherwise the raw text as a string
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_report(report: &linekv::ConsistencyReport) {
    if report.is_consistent() {
        println!("Store is consistent");
        return;
    }
    for key in &report.missing_records {
        println!("indexed without record: {}", key);
    }
    for key in &report.unindexed_records {
        println!("record without index entry: {}", key);
    }
    for key in &report.duplicate_records {
        println!("duplicate record lines: {}", key);
    }
}
