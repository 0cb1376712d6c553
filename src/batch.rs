use std::path::Path;

use tracing::{debug, info};

use crate::categorizer::classify_record;
use crate::error::Result;
use crate::importer::{read_workbook, SheetOutcome, SkipReason};
use crate::mapper::{map_record, MapOptions};
use crate::models::{Category, Mode, OutputRecord};

/// Rows of one day, category and direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub day: String,
    pub category: Category,
    pub mode: Mode,
    pub rows: Vec<OutputRecord>,
}

impl Group {
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    Skipped { sheet: String, reason: SkipReason },
    Dropped { day: String, rows: usize },
    Converted { day: String, category: Category, mode: Mode, rows: usize },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    /// In sheet order, then category, then mode.
    pub groups: Vec<Group>,
    pub log: Vec<LogEntry>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }

    /// Sum of all groups in one direction.
    pub fn total(&self, mode: Mode) -> f64 {
        self.groups
            .iter()
            .filter(|g| g.mode == mode)
            .map(Group::total)
            .sum()
    }

    /// Days that produced output, in sheet order.
    pub fn days(&self) -> Vec<&str> {
        let mut days: Vec<&str> = Vec::new();
        for g in &self.groups {
            if !days.contains(&g.day.as_str()) {
                days.push(&g.day);
            }
        }
        days
    }

    #[cfg(test)]
    pub fn group(&self, day: &str, category: Category, mode: Mode) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.day == day && g.category == category && g.mode == mode)
    }
}

/// Classify, split by direction and map every imported record.
pub fn build_batch(sheets: Vec<SheetOutcome>, opts: &MapOptions) -> Batch {
    let mut batch = Batch::default();
    for outcome in sheets {
        let sheet = match outcome {
            SheetOutcome::Imported(sheet) => sheet,
            SheetOutcome::Skipped { sheet, reason } => {
                batch.log.push(LogEntry::Skipped { sheet, reason });
                continue;
            }
        };
        if sheet.dropped > 0 {
            batch.log.push(LogEntry::Dropped {
                day: sheet.day.clone(),
                rows: sheet.dropped,
            });
        }

        let classified: Vec<_> = sheet
            .records
            .iter()
            .filter_map(|r| Mode::from_amount(r.amount).map(|m| (r, classify_record(r), m)))
            .collect();
        for (r, category, _) in &classified {
            debug!(day = %sheet.day, row = r.row, category = category.code(), "classified row");
        }

        for category in Category::ALL {
            for mode in Mode::ALL {
                let rows: Vec<OutputRecord> = classified
                    .iter()
                    .filter(|(_, c, m)| *c == category && *m == mode)
                    .map(|(r, c, m)| map_record(r, *c, *m, opts))
                    .collect();
                if rows.is_empty() {
                    continue;
                }
                info!(
                    day = %sheet.day,
                    category = category.code(),
                    mode = mode.code(),
                    rows = rows.len(),
                    "mapped group"
                );
                batch.log.push(LogEntry::Converted {
                    day: sheet.day.clone(),
                    category,
                    mode,
                    rows: rows.len(),
                });
                batch.groups.push(Group {
                    day: sheet.day.clone(),
                    category,
                    mode,
                    rows,
                });
            }
        }
    }
    batch
}

/// Read a collection workbook and build its batch.
pub fn load(file_path: &Path, opts: &MapOptions) -> Result<Batch> {
    let sheets = read_workbook(file_path)?;
    Ok(build_batch(sheets, opts))
}
