use chrono::{Datelike, NaiveDate};

use crate::fmt::{format_date, format_name, DateStyle};
use crate::models::{CashRecord, Category, Layout, Mode, OutputRecord};

pub const DEFAULT_CUTOFF_YEAR: i32 = 2022;

const DOCUMENT_PREFIX: &str = "NVK";
const CREDIT_ACCOUNT: &str = "131";
const JOURNAL_DEBIT_ACCOUNT: &str = "13686A";
const JOURNAL_DEBIT_OBJECT: &str = "NCC00002";
const JOURNAL_PROJECT_CODE: &str = "003";

/// Debit account per category: (through the cutoff year, after it).
const DEBIT_ACCOUNTS: &[(Category, &str, &str)] = &[
    (Category::General, "1368", "1121"),
    (Category::Pharmacy, "1368", "1121"),
    (Category::Vaccine, "1368", "1121"),
    (Category::Card, "1368", "1121"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub suffix: String,
    pub year: Option<i32>,
    pub cutoff_year: i32,
    pub layout: Layout,
    pub bank_account: String,
    pub bank_name: String,
}

impl MapOptions {
    /// Years up to the cutoff were collected through POS terminals.
    /// An unknown year is treated as such.
    pub fn has_pos(&self) -> bool {
        self.year.map_or(true, |y| y <= self.cutoff_year)
    }
}

pub struct AccountCodes {
    pub debit: &'static str,
    pub credit: &'static str,
}

pub fn account_codes(category: Category, has_pos: bool) -> AccountCodes {
    let debit = DEBIT_ACCOUNTS
        .iter()
        .find(|(c, _, _)| *c == category)
        .map(|(_, pos, bank)| if has_pos { *pos } else { *bank })
        .unwrap_or_default();
    AccountCodes {
        debit,
        credit: CREDIT_ACCOUNT,
    }
}

/// `NVK` + category + ddmmyyyy + suffix, or `NVK_INVALID_` + suffix when the date is unreadable.
pub fn document_number(category: Category, date: Option<NaiveDate>, suffix: &str) -> String {
    match date {
        Some(d) => format!(
            "{DOCUMENT_PREFIX}{}{:02}{:02}{}{suffix}",
            category.code(),
            d.day(),
            d.month(),
            d.year()
        ),
        None => format!("{DOCUMENT_PREFIX}_INVALID_{suffix}"),
    }
}

/// Journal vouchers are numbered by mode: `PT20240305_A`.
pub fn journal_document_number(mode: Mode, date: Option<NaiveDate>, suffix: &str) -> String {
    match date {
        Some(d) => format!(
            "{}{}{:02}{:02}_{suffix}",
            mode.code(),
            d.year(),
            d.month(),
            d.day()
        ),
        None => format!("{}_INVALID_{suffix}", mode.code()),
    }
}

/// "Thu tiền khám chữa bệnh qua pos ngày 05/03/2024"
pub fn description(category: Category, mode: Mode, with_pos: bool, date_text: &str) -> String {
    let pos_phrase = if with_pos { " qua pos" } else { "" };
    format!(
        "{} {}{pos_phrase} ngày {date_text}",
        mode.verb(),
        category.service_phrase()
    )
}

/// Derive the output record for one classified transaction.
pub fn map_record(
    record: &CashRecord,
    category: Category,
    mode: Mode,
    opts: &MapOptions,
) -> OutputRecord {
    let payer = format_name(&record.payer);
    let amount = record.amount.abs();
    match opts.layout {
        Layout::Receipt => {
            let has_pos = opts.has_pos();
            let date_text = format_date(record.posting_date, DateStyle::DayFirst);
            let desc = description(category, mode, has_pos, &date_text);
            let codes = account_codes(category, has_pos);
            OutputRecord {
                posting_date: date_text.clone(),
                document_date: date_text,
                document_number: document_number(category, record.posting_date, &opts.suffix),
                object_code: category.object_code().to_string(),
                object_name: payer.clone(),
                bank_account: opts.bank_account.clone(),
                bank_name: opts.bank_name.clone(),
                accounting_description: format!("{desc} {payer}"),
                description: desc,
                debit_account: codes.debit.to_string(),
                credit_account: codes.credit.to_string(),
                amount,
                ..Default::default()
            }
        }
        Layout::Journal => {
            let document_date = format_date(record.visit_date, DateStyle::MonthFirst);
            let desc = description(category, mode, false, &document_date);
            OutputRecord {
                posting_date: format_date(record.posting_date, DateStyle::MonthFirst),
                document_number: journal_document_number(mode, record.visit_date, &opts.suffix),
                document_date,
                object_code: category.object_code().to_string(),
                object_name: payer.clone(),
                accounting_description: format!("{desc} - {payer}"),
                description: desc,
                debit_account: JOURNAL_DEBIT_ACCOUNT.to_string(),
                credit_account: CREDIT_ACCOUNT.to_string(),
                debit_object: JOURNAL_DEBIT_OBJECT.to_string(),
                project_code: JOURNAL_PROJECT_CODE.to_string(),
                amount,
                ..Default::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(year: Option<i32>, layout: Layout) -> MapOptions {
        MapOptions {
            suffix: "A1".to_string(),
            year,
            cutoff_year: DEFAULT_CUTOFF_YEAR,
            layout,
            bank_account: "1290153594".to_string(),
            bank_name: "BIDV".to_string(),
        }
    }

    fn record(amount: f64) -> CashRecord {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5);
        CashRecord {
            row: 2,
            department: "Khám nội".to_string(),
            content: None,
            visit_date: date,
            posting_date: date,
            payer: " nguyễn - văn A \n ghi chú".to_string(),
            amount,
        }
    }

    #[test]
    fn test_has_pos_cutoff() {
        assert!(opts(Some(2021), Layout::Receipt).has_pos());
        assert!(opts(Some(2022), Layout::Receipt).has_pos());
        assert!(!opts(Some(2023), Layout::Receipt).has_pos());
        assert!(opts(None, Layout::Receipt).has_pos());
    }

    #[test]
    fn test_debit_account_follows_year() {
        let rec = record(1_500_000.0);
        let old = map_record(&rec, Category::General, Mode::Receipt, &opts(Some(2021), Layout::Receipt));
        let new = map_record(&rec, Category::General, Mode::Receipt, &opts(Some(2024), Layout::Receipt));
        assert_eq!(old.debit_account, "1368");
        assert_eq!(new.debit_account, "1121");
        assert_eq!(old.credit_account, "131");
    }

    #[test]
    fn test_document_number() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(document_number(Category::Vaccine, d, "A1"), "NVKVACCINE05032024A1");
        assert_eq!(document_number(Category::Card, None, "A1"), "NVK_INVALID_A1");
        assert_eq!(journal_document_number(Mode::Payment, d, "B"), "PC20240305_B");
        assert_eq!(journal_document_number(Mode::Receipt, None, "B"), "PT_INVALID_B");
    }

    #[test]
    fn test_receipt_layout_fields() {
        let out = map_record(
            &record(1_500_000.0),
            Category::General,
            Mode::Receipt,
            &opts(Some(2021), Layout::Receipt),
        );
        assert_eq!(out.posting_date, "05/03/2024");
        assert_eq!(out.document_date, "05/03/2024");
        assert_eq!(out.document_number, "NVKKCB05032024A1");
        assert_eq!(out.object_code, "KHACHLE01");
        assert_eq!(out.object_name, "Nguyễn Văn A");
        assert_eq!(out.description, "Thu tiền khám chữa bệnh qua pos ngày 05/03/2024");
        assert_eq!(
            out.accounting_description,
            "Thu tiền khám chữa bệnh qua pos ngày 05/03/2024 Nguyễn Văn A"
        );
        assert_eq!(out.bank_account, "1290153594");
        assert_eq!(out.amount, 1_500_000.0);
    }

    #[test]
    fn test_payment_amount_is_absolute() {
        let out = map_record(
            &record(-200_000.0),
            Category::Pharmacy,
            Mode::Payment,
            &opts(Some(2024), Layout::Receipt),
        );
        assert_eq!(out.amount, 200_000.0);
        assert_eq!(out.description, "Chi tiền bán thuốc ngày 05/03/2024");
    }

    #[test]
    fn test_unreadable_date_degrades() {
        let mut rec = record(50_000.0);
        rec.posting_date = None;
        let out = map_record(&rec, Category::Vaccine, Mode::Receipt, &opts(Some(2024), Layout::Receipt));
        assert_eq!(out.posting_date, "");
        assert_eq!(out.document_number, "NVK_INVALID_A1");
        assert_eq!(out.description, "Thu tiền tiêm vacxin ngày ");
    }

    #[test]
    fn test_journal_layout_fields() {
        let mut rec = record(300_000.0);
        rec.posting_date = NaiveDate::from_ymd_opt(2024, 3, 6);
        let out = map_record(&rec, Category::Card, Mode::Receipt, &opts(Some(2021), Layout::Journal));
        assert_eq!(out.document_date, "03/05/2024");
        assert_eq!(out.posting_date, "03/06/2024");
        assert_eq!(out.document_number, "PT20240305_A1");
        assert_eq!(out.description, "Thu tiền trả thẻ ngày 03/05/2024");
        assert_eq!(out.accounting_description, "Thu tiền trả thẻ ngày 03/05/2024 - Nguyễn Văn A");
        assert_eq!(out.debit_account, "13686A");
        assert_eq!(out.debit_object, "NCC00002");
        assert_eq!(out.object_code, "KHACHLE04");
        assert_eq!(out.project_code, "003");
        assert_eq!(out.bank_account, "");
    }
}
