use chrono::{Duration, NaiveDate, NaiveDateTime};

/// How dates are rendered in an output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// dd/mm/yyyy
    DayFirst,
    /// mm/dd/yyyy
    MonthFirst,
}

impl DateStyle {
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::DayFirst => "%d/%m/%Y",
            Self::MonthFirst => "%m/%d/%Y",
        }
    }
}

/// Format a date, or an empty string when it could not be read.
pub fn format_date(date: Option<NaiveDate>, style: DateStyle) -> String {
    date.map(|d| d.format(style.pattern()).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
pub fn parse_formatted_date(raw: &str, style: DateStyle) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), style.pattern()).ok()
}

const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const ISO_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a free-text date from the source sheet: day-first, then ISO.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DAY_FIRST_FORMATS
        .iter()
        .chain(ISO_FORMATS)
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
}

pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Clean a payer name: first line only, no hyphens, single spaces, title case.
pub fn format_name(raw: &str) -> String {
    let first_line = raw
        .trim()
        .split(['\n', '\r', '\t', '\u{00A0}', '\u{2003}'])
        .next()
        .unwrap_or_default();
    let cleaned = first_line.replace('-', "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Format an amount with thousands separators: 1,500,000
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let int_part = format!("{:.0}", val.abs());

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}")
    } else {
        with_commas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_name_first_line_hyphens_title_case() {
        assert_eq!(format_name(" nguyễn - văn A \n ghi chú"), "Nguyễn Văn A");
        assert_eq!(format_name("TRẦN THỊ  BÌNH"), "Trần Thị Bình");
        assert_eq!(format_name("le\u{00A0}van c"), "Le");
        assert_eq!(format_name(""), "");
    }

    #[test]
    fn test_format_date_styles() {
        let d = ymd(2024, 3, 5);
        assert_eq!(format_date(Some(d), DateStyle::DayFirst), "05/03/2024");
        assert_eq!(format_date(Some(d), DateStyle::MonthFirst), "03/05/2024");
        assert_eq!(format_date(None, DateStyle::DayFirst), "");
    }

    #[test]
    fn test_format_then_parse_roundtrip() {
        for d in [ymd(2024, 3, 5), ymd(2023, 12, 31), ymd(2020, 2, 29)] {
            for style in [DateStyle::DayFirst, DateStyle::MonthFirst] {
                let s = format_date(Some(d), style);
                assert_eq!(parse_formatted_date(&s, style), Some(d));
            }
        }
    }

    #[test]
    fn test_parse_date_text_day_first() {
        assert_eq!(parse_date_text("05/03/2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date_text("5-3-2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date_text("05.03.2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date_text("05/03/2024 14:30:00"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_parse_date_text_iso() {
        assert_eq!(parse_date_text("2024-03-05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date_text("2024-03-05 08:00:00"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_parse_date_text_rejects_garbage() {
        assert_eq!(parse_date_text("-"), None);
        assert_eq!(parse_date_text("32/01/2024"), None);
        assert_eq!(parse_date_text("hôm nay"), None);
        assert_eq!(parse_date_text("   "), None);
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(45667.0), Some(ymd(2025, 1, 10)));
        assert_eq!(excel_serial_to_date(45667.75), Some(ymd(2025, 1, 10)));
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1_500_000.0), "1,500,000");
        assert_eq!(money(-250_000.0), "-250,000");
        assert_eq!(money(0.0), "0");
        assert_eq!(money(999.0), "999");
    }
}
