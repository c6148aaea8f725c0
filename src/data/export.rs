use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::PopulationRow;

/// Default file name offered by the save dialog.
pub const DEFAULT_EXPORT_NAME: &str = "filtered_population.csv";

const SPLIT_HEADER: [&str; 5] = ["age_label", "age_numeric", "total", "male", "female"];
const TOTAL_HEADER: [&str; 3] = ["age_label", "age_numeric", "total"];

/// A row of a table built without the by-sex source.
#[derive(Serialize)]
struct TotalOnlyRow<'a> {
    age_label: &'a str,
    age_numeric: u32,
    total: u64,
}

/// Write rows as CSV, no index column. The header is
/// `age_label,age_numeric,total,male,female`, or just
/// `age_label,age_numeric,total` when `by_sex` is false.
pub fn write_csv<'a, W: Write>(
    writer: W,
    rows: impl IntoIterator<Item = &'a PopulationRow>,
    by_sex: bool,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut empty = true;
    for row in rows {
        let written = if by_sex {
            wtr.serialize(row)
        } else {
            wtr.serialize(TotalOnlyRow {
                age_label: &row.age_label,
                age_numeric: row.age_numeric,
                total: row.total,
            })
        };
        written.context("writing CSV row")?;
        empty = false;
    }
    if empty {
        // serde only emits the header together with the first record
        let header: &[&str] = if by_sex { &SPLIT_HEADER } else { &TOTAL_HEADER };
        wtr.write_record(header).context("writing CSV header")?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

/// Export rows to a file on disk.
pub fn export_csv<'a>(
    path: &Path,
    rows: impl IntoIterator<Item = &'a PopulationRow>,
    by_sex: bool,
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, rows, by_sex).with_context(|| format!("exporting to {}", path.display()))
}
