use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::batch::{Batch, Group};
use crate::error::Result;
use crate::models::{Category, Layout, Mode, OutputRecord, OutputValue};

/// Maximum data rows per worksheet.
pub const PAGE_SIZE: usize = 500;

/// Split rows into worksheet pages: `PT`, `PT 2`, `PT 3`, ...
pub fn sheet_pages(mode: Mode, rows: &[OutputRecord]) -> Vec<(String, &[OutputRecord])> {
    rows.chunks(PAGE_SIZE)
        .enumerate()
        .map(|(i, chunk)| {
            let name = if i == 0 {
                mode.code().to_string()
            } else {
                format!("{} {}", mode.code(), i + 1)
            };
            (name, chunk)
        })
        .collect()
}

/// Render one day's workbook: receipt pages first, then payment pages.
pub fn render_workbook(layout: Layout, groups: &[&Group]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format("#,##0");
    let columns = layout.columns();

    for mode in Mode::ALL {
        let Some(group) = groups.iter().find(|g| g.mode == mode) else {
            continue;
        };
        for (name, page) in sheet_pages(mode, &group.rows) {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&name)?;
            for (col, title) in columns.iter().enumerate() {
                worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
            }
            for (i, rec) in page.iter().enumerate() {
                let row = (i + 1) as u32;
                for (col, value) in layout.row(rec).iter().enumerate() {
                    match value {
                        OutputValue::Text(s) => {
                            worksheet.write_string(row, col as u16, s.as_str())?;
                        }
                        OutputValue::Amount(a) => {
                            worksheet.write_number_with_format(row, col as u16, *a, &money_format)?;
                        }
                    }
                }
            }
            worksheet.autofit();
            debug!(sheet = %name, rows = page.len(), "wrote worksheet");
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Path of a day's workbook inside the archive: `T05_2024_KCB/3.1.xlsx`.
pub fn entry_path(prefix: &str, category: Category, day: &str) -> String {
    format!(
        "{prefix}_{}/{}.xlsx",
        category.code(),
        day.replace(',', ".").trim()
    )
}

/// Write one workbook per (category, day) into a ZIP archive. Returns the entry count.
pub fn write_archive<W: Write + Seek>(
    writer: W,
    prefix: &str,
    layout: Layout,
    batch: &Batch,
) -> Result<usize> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let days = batch.days();
    let mut entries = 0usize;

    for category in Category::ALL {
        for day in &days {
            let groups: Vec<&Group> = batch
                .groups
                .iter()
                .filter(|g| g.category == category && g.day == *day)
                .collect();
            if groups.is_empty() {
                continue;
            }
            let bytes = render_workbook(layout, &groups)?;
            let path = entry_path(prefix, category, day);
            zip.start_file(path.as_str(), options)?;
            zip.write_all(&bytes)?;
            debug!(entry = %path, bytes = bytes.len(), "added archive entry");
            entries += 1;
        }
    }

    zip.finish()?;
    Ok(entries)
}

/// Build the archive in memory and write `{prefix}.zip` into `output_dir`.
/// Nothing is written if any workbook fails to render.
pub fn export_archive(output_dir: &Path, prefix: &str, layout: Layout, batch: &Batch) -> Result<PathBuf> {
    let mut buffer = Cursor::new(Vec::new());
    let entries = write_archive(&mut buffer, prefix, layout, batch)?;

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{prefix}.zip"));
    std::fs::write(&path, buffer.into_inner())?;
    info!(path = %path.display(), entries, "wrote archive");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Read;

    fn out(n: usize) -> Vec<OutputRecord> {
        (0..n)
            .map(|i| OutputRecord {
                document_number: format!("NVKKCB05032024A{i}"),
                amount: 1000.0,
                ..Default::default()
            })
            .collect()
    }

    fn group(day: &str, category: Category, mode: Mode, n: usize) -> Group {
        Group {
            day: day.to_string(),
            category,
            mode,
            rows: out(n),
        }
    }

    #[test]
    fn test_sheet_pages_split_at_500() {
        let rows = out(1001);
        let pages = sheet_pages(Mode::Receipt, &rows);
        let summary: Vec<(&str, usize)> = pages.iter().map(|(n, p)| (n.as_str(), p.len())).collect();
        assert_eq!(summary, vec![("PT", 500), ("PT 2", 500), ("PT 3", 1)]);
    }

    #[test]
    fn test_sheet_pages_exact_page() {
        let rows = out(500);
        let pages = sheet_pages(Mode::Payment, &rows);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].0, "PC");
    }

    #[test]
    fn test_entry_path() {
        assert_eq!(entry_path("T05_2024", Category::General, "3,1"), "T05_2024_KCB/3.1.xlsx");
        assert_eq!(entry_path("TBD", Category::Card, "12"), "TBD_THE/12.xlsx");
    }

    #[test]
    fn test_render_workbook_sheets_and_values() {
        let receipts = group("5", Category::General, Mode::Receipt, 2);
        let payments = group("5", Category::General, Mode::Payment, 1);
        let bytes = render_workbook(Layout::Receipt, &[&payments, &receipts]).unwrap();

        let mut wb: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(wb.sheet_names(), vec!["PT".to_string(), "PC".to_string()]);
        let range = wb.worksheet_range("PT").unwrap();
        assert_eq!(range.height(), 3);
        assert_eq!(range.get((0, 0)), Some(&Data::String("Ngày hạch toán (*)".to_string())));
        assert_eq!(range.get((1, 2)), Some(&Data::String("NVKKCB05032024A0".to_string())));
        assert_eq!(range.get((1, 12)), Some(&Data::Float(1000.0)));
    }

    #[test]
    fn test_journal_rows_fill_every_column() {
        let rec = OutputRecord {
            amount: 5.0,
            ..Default::default()
        };
        for layout in [Layout::Receipt, Layout::Journal] {
            let row = layout.row(&rec);
            assert_eq!(row.len(), layout.columns().len());
            let amount_col = layout.columns().iter().position(|c| *c == "Số tiền").unwrap();
            assert_eq!(row[amount_col], OutputValue::Amount(5.0));
        }
    }

    #[test]
    fn test_archive_has_one_workbook_per_category_day() {
        let batch = Batch {
            groups: vec![
                group("1", Category::General, Mode::Receipt, 3),
                group("1", Category::General, Mode::Payment, 1),
                group("1", Category::Vaccine, Mode::Receipt, 1),
                group("2", Category::General, Mode::Receipt, 1),
            ],
            log: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = export_archive(dir.path(), "T03_2024", Layout::Receipt, &batch).unwrap();
        assert_eq!(path.file_name().unwrap(), "T03_2024.zip");

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "T03_2024_KCB/1.xlsx".to_string(),
                "T03_2024_KCB/2.xlsx".to_string(),
                "T03_2024_VACCINE/1.xlsx".to_string(),
            ]
        );

        let mut bytes = Vec::new();
        archive
            .by_name("T03_2024_KCB/1.xlsx")
            .unwrap()
            .read_to_end(&mut bytes)
            .unwrap();
        let wb: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(wb.sheet_names(), vec!["PT".to_string(), "PC".to_string()]);
    }
}
