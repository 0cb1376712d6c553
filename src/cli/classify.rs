use crate::categorizer::classify;
use crate::error::Result;

pub fn run(department: &str, content: Option<&str>) -> Result<()> {
    let category = classify(department, content);
    println!(
        "{} ({}, {})",
        category.code(),
        category.object_code(),
        category.label()
    );
    Ok(())
}
