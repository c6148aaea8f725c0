use super::error::{PopulationError, Result};
use super::model::{RawCell, RawTable};

/// Only the first data row of each source is consulted.
const DATA_ROW: usize = 0;

/// Normalise one count cell: absent → 0, integers pass through, text has its
/// thousands separators stripped before parsing. Negative or non-numeric
/// values are errors naming `column`.
pub fn normalize_cell(cell: &RawCell, column: &str) -> Result<u64> {
    let invalid = || PopulationError::CellNormalization {
        column: column.to_string(),
        value: cell.to_string(),
    };
    match cell {
        RawCell::Absent => Ok(0),
        RawCell::Integer(i) => u64::try_from(*i).map_err(|_| invalid()),
        RawCell::Text(s) => {
            let digits: String = s.trim().chars().filter(|&c| c != ',').collect();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            digits.parse::<u64>().map_err(|_| invalid())
        }
    }
}

/// Counts of row 0 restricted to `columns`, in the order given.
pub fn extract_counts(table: &RawTable, columns: &[usize]) -> Result<Vec<u64>> {
    columns
        .iter()
        .map(|&col| normalize_cell(table.cell(DATA_ROW, col), &table.headers[col]))
        .collect()
}
