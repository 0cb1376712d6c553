use crate::models::{CashRecord, Category};

/// Keyword rules checked in order; the first hit wins.
const RULES: &[(&[&str], Category)] = &[
    (&["VACCINE", "VACXIN"], Category::Vaccine),
    (&["THUỐC"], Category::Pharmacy),
    (&["THẺ"], Category::Card),
];

fn match_label(label: &str) -> Option<Category> {
    let upper = label.to_uppercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| upper.contains(k)))
        .map(|(_, category)| *category)
}

/// Classify by department label, then by content label, defaulting to general care.
pub fn classify(department: &str, content: Option<&str>) -> Category {
    match_label(department)
        .or_else(|| content.and_then(match_label))
        .unwrap_or(Category::General)
}

pub fn classify_record(record: &CashRecord) -> Category {
    classify(&record.department, record.content.as_deref())
}
