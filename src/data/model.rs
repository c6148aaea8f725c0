use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RawCell – a single cell of a raw CSV table
// ---------------------------------------------------------------------------

/// A raw cell as read from the source, before count normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCell {
    /// Empty cell. Normalises to a count of 0.
    Absent,
    Integer(i64),
    /// Anything else, e.g. `"12,345"`.
    Text(String),
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Absent => write!(f, "<absent>"),
            RawCell::Integer(i) => write!(f, "{i}"),
            RawCell::Text(s) => write!(f, "{s}"),
        }
    }
}

impl RawCell {
    /// Guess the cell type from its text, the way the loader sees it.
    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return RawCell::Absent;
        }
        if let Ok(i) = s.parse::<i64>() {
            return RawCell::Integer(i);
        }
        RawCell::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// RawTable – header row plus data rows of one source
// ---------------------------------------------------------------------------

/// One raw source table: a header row of column labels and its data rows.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Display name of the source (file name or upload name) for messages.
    pub name: String,
    pub headers: Vec<String>,
    /// Each row has exactly `headers.len()` cells.
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    /// Build a table from string cells, typing each one with [`RawCell::from_text`].
    #[cfg(test)]
    pub fn from_strings(name: &str, headers: &[&str], rows: &[&[&str]]) -> Self {
        RawTable {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| RawCell::from_text(c)).collect())
                .collect(),
        }
    }

    /// Cell at (`row`, `col`). Out-of-range cells read as absent.
    pub fn cell(&self, row: usize, col: usize) -> &RawCell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&RawCell::Absent)
    }
}

// ---------------------------------------------------------------------------
// AgeBucket / PopulationRow – the tidy output
// ---------------------------------------------------------------------------

/// A canonical age bucket, e.g. `"35"` → 35 or `"100+"` → 100.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AgeBucket {
    pub label: String,
    /// Lower bound of the bucket.
    pub numeric: u32,
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// One tidy record per age bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationRow {
    pub age_label: String,
    pub age_numeric: u32,
    pub total: u64,
    pub male: u64,
    pub female: u64,
}

/// The assembled tidy table, in source column order. Read-only once built;
/// a reload builds a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationTable {
    rows: Vec<PopulationRow>,
    /// `false` when built from the total table alone; `male`/`female` are
    /// then 0 and carry no information.
    by_sex: bool,
}

impl PopulationTable {
    pub(crate) fn new(rows: Vec<PopulationRow>, by_sex: bool) -> Self {
        PopulationTable { rows, by_sex }
    }

    /// Whether the male/female columns were filled from a by-sex table.
    pub fn has_sex_split(&self) -> bool {
        self.by_sex
    }

    pub fn rows(&self) -> &[PopulationRow] {
        &self.rows
    }

    /// Number of age buckets.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows at the given indices, in the order given.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a PopulationRow> + 'a {
        indices.iter().filter_map(|&i| self.rows.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_types_cells() {
        assert_eq!(RawCell::from_text(""), RawCell::Absent);
        assert_eq!(RawCell::from_text("  "), RawCell::Absent);
        assert_eq!(RawCell::from_text("42"), RawCell::Integer(42));
        assert_eq!(RawCell::from_text("-3"), RawCell::Integer(-3));
        assert_eq!(
            RawCell::from_text("12,345"),
            RawCell::Text("12,345".to_string())
        );
    }

    #[test]
    fn cell_out_of_range_is_absent() {
        let table = RawTable::from_strings("t", &["a"], &[&["1"]]);
        assert_eq!(table.cell(0, 0), &RawCell::Integer(1));
        assert_eq!(table.cell(0, 5), &RawCell::Absent);
        assert_eq!(table.cell(3, 0), &RawCell::Absent);
    }
}
