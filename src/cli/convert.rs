use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::batch::load;
use crate::cli::{describe_period, print_log, BatchArgs};
use crate::error::{HachToanError, Result};
use crate::exporter::export_archive;
use crate::settings::load_settings;

pub fn run(args: &BatchArgs, output_dir: Option<&str>) -> Result<()> {
    if args.suffix().is_none() {
        return Err(HachToanError::MissingSuffix);
    }
    let settings = load_settings();
    let period = args.period();
    let opts = args.map_options(&settings, &period)?;
    describe_period(&period);

    let batch = load(Path::new(&args.file), &opts)?;
    println!("Read {} ({} rows kept)", args.file, batch.row_count());
    print_log(&batch);

    if batch.is_empty() {
        println!("{}", "No valid rows after filtering; nothing written.".yellow());
        return Ok(());
    }

    let out_dir = PathBuf::from(output_dir.unwrap_or(&settings.output_dir));
    let path = export_archive(&out_dir, &period.prefix(), opts.layout, &batch)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}
