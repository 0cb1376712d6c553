use std::path::Path;

use comfy_table::{Cell, CellAlignment, Table};

use crate::batch::load;
use crate::cli::{describe_period, print_log, BatchArgs};
use crate::error::Result;
use crate::exporter::{entry_path, sheet_pages};
use crate::fmt::money;
use crate::models::Mode;
use crate::settings::load_settings;

pub fn run(args: &BatchArgs) -> Result<()> {
    let settings = load_settings();
    let period = args.period();
    let opts = args.map_options(&settings, &period)?;
    describe_period(&period);

    let batch = load(Path::new(&args.file), &opts)?;
    print_log(&batch);
    if batch.is_empty() {
        println!("No valid rows after filtering.");
        return Ok(());
    }

    let prefix = period.prefix();
    let mut table = Table::new();
    table.set_header(vec!["Workbook", "Sheets", "Rows", "Total"]);
    for group in &batch.groups {
        let sheets: Vec<String> = sheet_pages(group.mode, &group.rows)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        table.add_row(vec![
            Cell::new(entry_path(&prefix, group.category, &group.day)),
            Cell::new(sheets.join(", ")),
            Cell::new(group.rows.len()).set_alignment(CellAlignment::Right),
            Cell::new(money(group.total())).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    println!(
        "{} rows, receipts {}, payments {} ({} layout, has POS: {})",
        batch.row_count(),
        money(batch.total(Mode::Receipt)),
        money(batch.total(Mode::Payment)),
        opts.layout.key(),
        if opts.has_pos() { "yes" } else { "no" }
    );
    Ok(())
}
