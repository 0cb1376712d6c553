use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Business line a cash transaction is booked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    General,
    Pharmacy,
    Vaccine,
    Card,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::General,
        Category::Pharmacy,
        Category::Vaccine,
        Category::Card,
    ];

    /// Short code used in document numbers and archive folder names.
    pub fn code(&self) -> &'static str {
        match self {
            Self::General => "KCB",
            Self::Pharmacy => "THUOC",
            Self::Vaccine => "VACCINE",
            Self::Card => "THE",
        }
    }

    /// Accounting object (customer) code.
    pub fn object_code(&self) -> &'static str {
        match self {
            Self::General => "KHACHLE01",
            Self::Pharmacy => "KHACHLE02",
            Self::Vaccine => "KHACHLE03",
            Self::Card => "KHACHLE04",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "Khách hàng lẻ - Khám chữa bệnh",
            Self::Pharmacy => "Khách hàng lẻ - Bán thuốc",
            Self::Vaccine => "Khách hàng lẻ - Tiêm vacxin",
            Self::Card => "Khách hàng lẻ - Trả thẻ",
        }
    }

    /// Last segment of the label, lowercased: "khám chữa bệnh", "bán thuốc", ...
    pub fn service_phrase(&self) -> String {
        self.label()
            .rsplit('-')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }
}

/// Cash direction, decided by the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    Receipt,
    Payment,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Receipt, Mode::Payment];

    pub fn from_amount(amount: f64) -> Option<Mode> {
        if amount > 0.0 {
            Some(Self::Receipt)
        } else if amount < 0.0 {
            Some(Self::Payment)
        } else {
            None
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Receipt => "PT",
            Self::Payment => "PC",
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Receipt => "Thu tiền",
            Self::Payment => "Chi tiền",
        }
    }
}

/// Output column template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Cash receipt / payment voucher import (13 columns).
    #[default]
    Receipt,
    /// General journal import (33 columns).
    Journal,
}

const ALL_LAYOUTS: &[Layout] = &[Layout::Receipt, Layout::Journal];

impl Layout {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Journal => "journal",
        }
    }

    pub fn from_key(key: &str) -> Option<Layout> {
        let key = key.trim().to_lowercase();
        ALL_LAYOUTS.iter().find(|l| l.key() == key).copied()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Receipt => RECEIPT_COLUMNS,
            Self::Journal => JOURNAL_COLUMNS,
        }
    }

    /// Project an output record onto this layout's columns.
    pub fn row(&self, rec: &OutputRecord) -> Vec<OutputValue> {
        let text = |s: &str| OutputValue::Text(s.to_string());
        match self {
            Self::Receipt => vec![
                text(&rec.posting_date),
                text(&rec.document_date),
                text(&rec.document_number),
                text(&rec.object_code),
                text(&rec.object_name),
                text(&rec.bank_account),
                text(&rec.bank_name),
                text(""),
                text(&rec.description),
                text(&rec.accounting_description),
                text(&rec.debit_account),
                text(&rec.credit_account),
                OutputValue::Amount(rec.amount),
            ],
            Self::Journal => {
                let mut row = vec![
                    text(""),
                    text(&rec.document_date),
                    text(&rec.posting_date),
                    text(&rec.document_number),
                    text(&rec.description),
                    text(""),
                    text(&rec.accounting_description),
                    text(&rec.debit_account),
                    text(&rec.credit_account),
                    OutputValue::Amount(rec.amount),
                    text(&rec.debit_object),
                    text(&rec.object_code),
                    text(&rec.bank_account),
                    text(""),
                    text(""),
                    text(""),
                    text(&rec.project_code),
                ];
                row.resize(JOURNAL_COLUMNS.len(), OutputValue::Text(String::new()));
                row
            }
        }
    }
}

const RECEIPT_COLUMNS: &[&str] = &[
    "Ngày hạch toán (*)",
    "Ngày chứng từ (*)",
    "Số chứng từ (*)",
    "Mã đối tượng",
    "Tên đối tượng",
    "Nộp vào TK",
    "Mở tại ngân hàng",
    "Lý do thu",
    "Diễn giải lý do thu",
    "Diễn giải (hạch toán)",
    "TK Nợ (*)",
    "TK Có (*)",
    "Số tiền",
];

const JOURNAL_COLUMNS: &[&str] = &[
    "Hiển thị trên sổ",
    "Ngày chứng từ (*)",
    "Ngày hạch toán (*)",
    "Số chứng từ (*)",
    "Diễn giải",
    "Hạn thanh toán",
    "Diễn giải (Hạch toán)",
    "TK Nợ (*)",
    "TK Có (*)",
    "Số tiền",
    "Đối tượng Nợ",
    "Đối tượng Có",
    "TK ngân hàng",
    "Khoản mục CP",
    "Đơn vị",
    "Đối tượng THCP",
    "Công trình",
    "Hợp đồng bán",
    "CP không hợp lý",
    "Mã thống kê",
    "Diễn giải (Thuế)",
    "TK thuế GTGT",
    "Tiền thuế GTGT",
    "% thuế GTGT",
    "Giá trị HHDV chưa thuế",
    "Mẫu số HĐ",
    "Ngày hóa đơn",
    "Ký hiệu HĐ",
    "Số hóa đơn",
    "Nhóm HHDV mua vào",
    "Mã đối tượng thuế",
    "Tên đối tượng thuế",
    "Mã số thuế đối tượng thuế",
];

/// A source cell, independent of the workbook reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    /// Text rendering used for labels and headers. Whole numbers drop the ".0".
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One row of a daily collection sheet that survived filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct CashRecord {
    /// 1-based row number in the source sheet, header included.
    pub row: usize,
    pub department: String,
    pub content: Option<String>,
    /// `NGÀY KHÁM`
    pub visit_date: Option<NaiveDate>,
    /// `NGÀY QUỸ`, or the visit date when the sheet has no such column.
    pub posting_date: Option<NaiveDate>,
    pub payer: String,
    pub amount: f64,
}

/// A row ready to be written into an import workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputRecord {
    pub posting_date: String,
    pub document_date: String,
    pub document_number: String,
    pub object_code: String,
    pub object_name: String,
    pub bank_account: String,
    pub bank_name: String,
    pub description: String,
    pub accounting_description: String,
    pub debit_account: String,
    pub credit_account: String,
    pub debit_object: String,
    pub project_code: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    Text(String),
    Amount(f64),
}
