use std::sync::OnceLock;

use regex::Regex;

/// Reporting month and year, as far as they are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Period {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl Period {
    /// Explicit values win over whatever the file name says.
    pub fn resolve(month: Option<u32>, year: Option<i32>, file_name: &str) -> Period {
        let detected = detect_period(file_name);
        Period {
            month: month.or(detected.map(|(m, _)| m)),
            year: year.or(detected.map(|(_, y)| y)),
        }
    }

    /// Archive and folder prefix: `T05_2024`, or `TBD` when either part is unknown.
    pub fn prefix(&self) -> String {
        match (self.month, self.year) {
            (Some(m), Some(y)) => format!("T{m:02}_{y}"),
            _ => "TBD".to_string(),
        }
    }
}

fn period_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{4})[._-]?\s*(\d{2})|\s*(\d{2})[._-]?\s*(\d{4})").expect("valid regex")
    })
}

/// Find `(month, year)` in a file name such as `Thu tien 2024-05.xlsx` or `T05.2024.xlsx`.
pub fn detect_period(file_name: &str) -> Option<(u32, i32)> {
    let caps = period_re().captures(file_name)?;
    let year = caps.get(1).or_else(|| caps.get(4))?.as_str().parse::<i32>().ok()?;
    let month = caps.get(2).or_else(|| caps.get(3))?.as_str().parse::<u32>().ok()?;
    if (1..=12).contains(&month) {
        Some((month, year))
    } else {
        None
    }
}
