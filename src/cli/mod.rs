pub mod classify;
pub mod config;
pub mod convert;
pub mod preview;

use std::path::Path;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::batch::{Batch, LogEntry};
use crate::error::{HachToanError, Result};
use crate::importer::SkipReason;
use crate::mapper::MapOptions;
use crate::models::Layout;
use crate::period::Period;
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "hachtoan",
    version,
    about = "Convert daily cash-collection workbooks into accounting-import spreadsheets."
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a collection workbook into a ZIP of import workbooks.
    Convert {
        #[command(flatten)]
        batch: BatchArgs,
        /// Directory for the archive (default: settings output_dir)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
    /// Show what a conversion would produce without writing anything.
    Preview {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Show the category a department / content label falls under.
    Classify {
        /// Department or ward label, e.g. 'Khoa Vaccine'
        department: String,
        /// Content description label
        #[arg(long)]
        content: Option<String>,
    },
    /// Inspect or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args)]
pub struct BatchArgs {
    /// Path to the collection workbook (.xlsx / .xls)
    pub file: String,
    /// Document-number suffix, e.g. A, B1, NV123
    #[arg(long)]
    pub suffix: Option<String>,
    /// Reporting month 1-12 (default: taken from the file name)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
    /// Reporting year (default: taken from the file name)
    #[arg(long)]
    pub year: Option<i32>,
    /// Output layout: receipt, journal (default: settings layout)
    #[arg(long)]
    pub layout: Option<String>,
    /// Last year booked through POS (default: settings cutoff_year)
    #[arg(long = "cutoff-year")]
    pub cutoff_year: Option<i32>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current settings.
    Show,
    /// Change one setting.
    Set {
        /// One of: cutoff_year, bank_account, bank_name, layout, output_dir
        key: String,
        value: String,
    },
}

impl BatchArgs {
    pub fn period(&self) -> Period {
        let file_name = Path::new(&self.file)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Period::resolve(self.month, self.year, &file_name)
    }

    pub fn suffix(&self) -> Option<String> {
        self.suffix
            .as_deref()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
    }

    /// Merge command-line values over settings.
    pub fn map_options(&self, settings: &Settings, period: &Period) -> Result<MapOptions> {
        let layout = match &self.layout {
            Some(key) => {
                Layout::from_key(key).ok_or_else(|| HachToanError::UnknownLayout(key.clone()))?
            }
            None => settings.layout,
        };
        Ok(MapOptions {
            suffix: self.suffix().unwrap_or_default(),
            year: period.year,
            cutoff_year: self.cutoff_year.unwrap_or(settings.cutoff_year),
            layout,
            bank_account: settings.bank_account.clone(),
            bank_name: settings.bank_name.clone(),
        })
    }
}

pub(crate) fn describe_period(period: &Period) {
    match (period.month, period.year) {
        (Some(m), Some(y)) => println!("Period: {m:02}/{y}"),
        _ => println!(
            "{}",
            "Could not determine month and year; use --month/--year. Archive prefix: TBD".yellow()
        ),
    }
}

pub(crate) fn print_log(batch: &Batch) {
    println!("Processing log");
    for entry in &batch.log {
        match entry {
            LogEntry::Skipped { sheet, reason: SkipReason::NotADaySheet } => {
                println!("  - Skipped sheet '{sheet}' (not a day number)");
            }
            LogEntry::Skipped { sheet, reason: SkipReason::MissingColumns(cols) } => {
                println!(
                    "  - {} sheet '{sheet}' is missing columns: {}",
                    "Warning:".yellow(),
                    cols.join(", ")
                );
            }
            LogEntry::Dropped { day, rows } => {
                println!("  - {day}: dropped {rows} rows (zero amount, no visit date or no payer)");
            }
            LogEntry::Converted { day, category, mode, rows } => {
                println!("  - {day} ({}) [{}]: {rows} rows", category.code(), mode.code());
            }
        }
    }
}
