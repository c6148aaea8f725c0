use encoding_rs::{Encoding, EUC_KR};

use super::error::{PopulationError, Result};
use super::model::{RawCell, RawTable};
use crate::config::Source;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Resolve an encoding label. `cp949` is not a WHATWG label but is what the
/// Korean statistics portals call their exports; EUC-KR in `encoding_rs` is
/// the windows-949 superset, so it maps there.
pub fn resolve_encoding(label: &str) -> Option<&'static Encoding> {
    let label = label.trim();
    if label.eq_ignore_ascii_case("cp949") {
        return Some(EUC_KR);
    }
    Encoding::for_label(label.as_bytes())
}

/// Load one raw source table.
///
/// A path source is checked for existence first (→ `MissingSource`). The
/// bytes are decoded with `encoding` unless they start with a BOM, then
/// parsed as CSV with a mandatory header row and at least one data row.
pub fn load_raw_table(source: &Source, encoding: &'static Encoding, delimiter: u8) -> Result<RawTable> {
    let name = source.display_name();
    let bytes = match source {
        Source::Path(path) => {
            if !path.exists() {
                return Err(PopulationError::MissingSource(path.display().to_string()));
            }
            std::fs::read(path).map_err(|e| PopulationError::parse(&name, e))?
        }
        Source::Stream { bytes, .. } => bytes.to_vec(),
    };

    let text = decode(&name, &bytes, encoding)?;
    parse_csv(&name, &text, delimiter)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn decode(name: &str, bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(PopulationError::parse(
            name,
            format!("malformed {} byte sequence", used.name()),
        ));
    }
    if used != encoding {
        log::debug!("{name}: BOM found, decoding as {}", used.name());
    }
    Ok(text.into_owned())
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

fn parse_csv(name: &str, text: &str, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PopulationError::parse(name, format!("reading header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| PopulationError::parse(name, format!("row {row_no}: {e}")))?;
        rows.push(record.iter().map(RawCell::from_text).collect());
    }

    if rows.is_empty() {
        return Err(PopulationError::parse(name, "no data row below the header"));
    }
    if rows.len() > 1 {
        log::debug!("{name}: {} data rows, only the first is used", rows.len());
    }

    Ok(RawTable {
        name: name.to_string(),
        headers,
        rows,
    })
}
