use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, Reader};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::fmt::{excel_serial_to_date, parse_date_text};
use crate::models::{CashRecord, Cell};

pub const COL_DEPARTMENT: &str = "KHOA/BỘ PHẬN";
pub const COL_CONTENT: &str = "NỘI DUNG THU";
pub const COL_AMOUNT: &str = "TIỀN MẶT";
pub const COL_VISIT_DATE: &str = "NGÀY KHÁM";
pub const COL_POSTING_DATE: &str = "NGÀY QUỸ";
pub const COL_PAYER: &str = "HỌ VÀ TÊN";

const REQUIRED_COLUMNS: &[&str] = &[COL_DEPARTMENT, COL_AMOUNT, COL_VISIT_DATE, COL_PAYER];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Daily sheets are named by day number, e.g. `1`, `15`, `3.1` or `3,1`.
pub fn is_day_sheet(name: &str) -> bool {
    ['.', ','].iter().any(|sep| {
        let s = name.replacen(*sep, "", 1);
        !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
    })
}

pub fn parse_amount(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => {
            let s = s.replace([',', ' '], "");
            s.trim().parse::<f64>().ok()?
        }
        Cell::Empty | Cell::Date(_) => return None,
    };
    value.is_finite().then_some(value)
}

pub fn parse_date_cell(cell: &Cell) -> Option<chrono::NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::Number(n) => excel_serial_to_date(*n),
        Cell::Text(s) => parse_date_text(s),
        Cell::Empty => None,
    }
}

/// Subtotal rows have no visit date or payer, or a `-` placeholder.
fn is_placeholder(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Text(s) => s.trim() == "-",
        _ => false,
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) if s.trim().is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => dt.as_datetime().map_or(Cell::Empty, |d| Cell::Date(d.date())),
            Data::DateTimeIso(s) => parse_date_text(s).map_or_else(|| Cell::Text(s.clone()), Cell::Date),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

// ---------------------------------------------------------------------------
// Sheet parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NotADaySheet,
    MissingColumns(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetImport {
    pub day: String,
    pub records: Vec<CashRecord>,
    /// Rows dropped for a zero/unreadable amount or a missing visit date or payer.
    pub dropped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetOutcome {
    Imported(SheetImport),
    Skipped { sheet: String, reason: SkipReason },
}

struct Columns {
    department: usize,
    content: Option<usize>,
    amount: usize,
    visit_date: usize,
    posting_date: Option<usize>,
    payer: usize,
}

fn locate_columns(header: &[Cell]) -> std::result::Result<Columns, Vec<String>> {
    let index: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_text().trim().to_uppercase(), i))
        .rev()
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !index.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(missing);
    }

    Ok(Columns {
        department: index[COL_DEPARTMENT],
        content: index.get(COL_CONTENT).copied(),
        amount: index[COL_AMOUNT],
        visit_date: index[COL_VISIT_DATE],
        posting_date: index.get(COL_POSTING_DATE).copied(),
        payer: index[COL_PAYER],
    })
}

/// Parse the rows of one sheet; the first row is the header and sits at
/// 1-based sheet row `first_row`.
pub fn parse_sheet(name: &str, rows: &[Vec<Cell>], first_row: usize) -> SheetOutcome {
    if !is_day_sheet(name) {
        info!(sheet = name, "skipping sheet that is not a day number");
        return SheetOutcome::Skipped {
            sheet: name.to_string(),
            reason: SkipReason::NotADaySheet,
        };
    }

    let header = rows.first().map(Vec::as_slice).unwrap_or_default();
    let cols = match locate_columns(header) {
        Ok(cols) => cols,
        Err(missing) => {
            warn!(sheet = name, ?missing, "sheet is missing required columns");
            return SheetOutcome::Skipped {
                sheet: name.to_string(),
                reason: SkipReason::MissingColumns(missing),
            };
        }
    };

    let empty = Cell::Empty;
    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (i, row) in rows.iter().enumerate().skip(1) {
        let get = |idx: usize| row.get(idx).unwrap_or(&empty);
        let row_number = first_row + i;

        let amount = match parse_amount(get(cols.amount)) {
            Some(a) if a != 0.0 => a,
            _ => {
                dropped += 1;
                continue;
            }
        };
        let visit_cell = get(cols.visit_date);
        if is_placeholder(visit_cell) {
            debug!(sheet = name, row = row_number, "dropping row without visit date");
            dropped += 1;
            continue;
        }
        let payer_cell = get(cols.payer);
        if is_placeholder(payer_cell) {
            debug!(sheet = name, row = row_number, "dropping row without payer");
            dropped += 1;
            continue;
        }

        let visit_date = parse_date_cell(visit_cell);
        let posting_date = match cols.posting_date {
            Some(idx) => parse_date_cell(get(idx)),
            None => visit_date,
        };
        let content = cols
            .content
            .map(|idx| get(idx).as_text())
            .filter(|s| !s.trim().is_empty());

        records.push(CashRecord {
            row: row_number,
            department: get(cols.department).as_text(),
            content,
            visit_date,
            posting_date,
            payer: payer_cell.as_text(),
            amount,
        });
    }

    info!(sheet = name, records = records.len(), dropped, "parsed sheet");
    SheetOutcome::Imported(SheetImport {
        day: name.to_string(),
        records,
        dropped,
    })
}

// ---------------------------------------------------------------------------
// Workbook reading
// ---------------------------------------------------------------------------

/// Read every sheet of a collection workbook, in workbook order.
pub fn read_workbook(file_path: &Path) -> Result<Vec<SheetOutcome>> {
    let mut workbook = calamine::open_workbook_auto(file_path)?;
    let names = workbook.sheet_names().to_owned();
    info!(file = %file_path.display(), sheets = names.len(), "opened workbook");

    let mut outcomes = Vec::with_capacity(names.len());
    for name in &names {
        if !is_day_sheet(name) {
            outcomes.push(parse_sheet(name, &[], 1));
            continue;
        }
        let range = workbook.worksheet_range(name)?;
        let first_row = range.start().map_or(1, |(r, _)| r as usize + 1);
        let rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();
        outcomes.push(parse_sheet(name, &rows, first_row));
    }
    Ok(outcomes)
}
