//! `avail` CLI — query bookable slots against a JSON booking snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Slots for a service over a date range (snapshot from file)
//! avail slots -i snapshot.json --storefront sf1 --service svc1 \
//!     --from 2026-03-16 --to 2026-03-22
//!
//! # Snapshot via stdin
//! cat snapshot.json | avail slots --storefront sf1 --service svc1 \
//!     --from 2026-03-16 --to 2026-03-16
//!
//! # Resolved open/closed blocks for one civil day (debugging view)
//! avail day -i snapshot.json --storefront sf1 --service svc1 --date 2026-03-16
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, Read};

use avail_engine::resolver::resolve_day;
use avail_engine::rules::windows_for_day;
use avail_engine::types::format_minutes;
use avail_engine::{compute_availability, AvailabilityQuery, MemoryStore, Snapshot};

#[derive(Parser)]
#[command(name = "avail", version, about = "Availability resolution engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute bookable slots for a service over an inclusive date range
    Slots {
        /// Snapshot JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Storefront id
        #[arg(long)]
        storefront: String,
        /// Service id
        #[arg(long)]
        service: String,
        /// First civil date of the range (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last civil date of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show the resolved open/closed blocks for one civil day
    Day {
        /// Snapshot JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Storefront id
        #[arg(long)]
        storefront: String,
        /// Service id
        #[arg(long)]
        service: String,
        /// Civil date to resolve (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Slots {
            input,
            storefront,
            service,
            from,
            to,
            output,
        } => {
            let store = load_store(input.as_deref())?;
            let query = AvailabilityQuery {
                storefront_id: storefront,
                service_id: service,
                start_date: from,
                end_date: to,
            };
            let response =
                compute_availability(&store, &query).context("Availability computation failed")?;
            let pretty = serde_json::to_string_pretty(&response)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Day {
            input,
            storefront,
            service,
            date,
        } => {
            let store = load_store(input.as_deref())?;
            let snapshot = store.snapshot();
            if !snapshot.storefronts.iter().any(|s| s.id == storefront) {
                anyhow::bail!("Unknown storefront: {storefront}");
            }
            let rules: Vec<_> = snapshot
                .rules
                .iter()
                .filter(|r| r.storefront_id == storefront)
                .cloned()
                .collect();
            let drops: Vec<_> = snapshot
                .drops
                .iter()
                .filter(|d| d.storefront_id == storefront)
                .cloned()
                .collect();

            let windows = windows_for_day(&rules, &drops, &service, date);
            let blocks = resolve_day(&windows);
            println!("{date}");
            for block in &blocks {
                let state = if block.is_available {
                    format!("OPEN  max={}", block.max_concurrent)
                } else {
                    "CLOSED".to_string()
                };
                let source = if block.source_id.is_empty() {
                    String::new()
                } else {
                    format!("  ({})", block.source_id)
                };
                println!(
                    "  {}-{}  {}{}",
                    format_minutes(block.start_minute),
                    format_minutes(block.end_minute),
                    state,
                    source
                );
            }
        }
    }

    Ok(())
}

/// Read the snapshot from a file (or stdin), validate it, and wrap it in a
/// `MemoryStore`.
fn load_store(path: Option<&str>) -> Result<MemoryStore> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read snapshot from stdin")?;
            buf
        }
    };
    let snapshot = Snapshot::from_json(&json).context("Failed to parse snapshot")?;
    snapshot.validate().context("Snapshot failed validation")?;
    Ok(MemoryStore::new(snapshot))
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write output file: {}", path)),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
