use super::error::{PopulationError, Result};
use super::model::PopulationTable;

/// Upper end of the age slider.
pub const MAX_AGE: u32 = 100;

// ---------------------------------------------------------------------------
// Age range predicate
// ---------------------------------------------------------------------------

/// Inclusive range on `age_numeric`, always within `0..=MAX_AGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    min: u32,
    max: u32,
}

impl Default for AgeRange {
    fn default() -> Self {
        AgeRange { min: 0, max: MAX_AGE }
    }
}

impl AgeRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max || max > MAX_AGE {
            return Err(PopulationError::InvalidRange { min, max });
        }
        Ok(AgeRange { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, age: u32) -> bool {
        self.min <= age && age <= self.max
    }
}

/// Indices of rows whose bucket lower bound lies in `range`, in source order.
pub fn filtered_indices(table: &PopulationTable, range: AgeRange) -> Vec<usize> {
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| range.contains(row.age_numeric))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Ranking for the "largest / smallest age groups" tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Largest,
    Smallest,
}

/// Up to `n` of the `visible` rows ranked by total population.
/// Ties keep their source order.
pub fn ranked_indices(table: &PopulationTable, visible: &[usize], n: usize, order: Order) -> Vec<usize> {
    let rows = table.rows();
    let mut ranked: Vec<usize> = visible.iter().copied().filter(|&i| i < rows.len()).collect();
    match order {
        Order::Largest => ranked.sort_by(|&a, &b| rows[b].total.cmp(&rows[a].total)),
        Order::Smallest => ranked.sort_by_key(|&i| rows[i].total),
    }
    ranked.truncate(n);
    ranked
}
