use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, KEYS};

pub fn show() -> Result<()> {
    let settings = load_settings();
    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    for key in KEYS {
        table.add_row(vec![
            Cell::new(key),
            Cell::new(settings.get(key).unwrap_or_default()),
        ]);
    }
    println!("Settings ({})\n{table}", settings_path().display());
    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let mut settings = load_settings();
    settings.set(key, value)?;
    save_settings(&settings)?;
    println!("{key} = {}", settings.get(key).unwrap_or_default());
    Ok(())
}
