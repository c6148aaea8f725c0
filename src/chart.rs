use std::f64::consts::TAU;

use serde::Deserialize;

use crate::data::model::PopulationRow;

// ---------------------------------------------------------------------------
// Chart selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Area,
    Pie,
    /// Male to the left, female to the right.
    Pyramid,
}

impl ChartType {
    pub const ALL: [ChartType; 5] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Area,
        ChartType::Pie,
        ChartType::Pyramid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
            ChartType::Area => "Area",
            ChartType::Pie => "Pie",
            ChartType::Pyramid => "Population Pyramid",
        }
    }
}

// ---------------------------------------------------------------------------
// Series preparation (pure; the plot module only draws these)
// ---------------------------------------------------------------------------

/// One point of a total-population series, positioned by its index along
/// the category axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPoint {
    pub label: String,
    pub x: f64,
    pub value: f64,
}

pub fn total_series<'a>(rows: impl IntoIterator<Item = &'a PopulationRow>) -> Vec<CategoryPoint> {
    rows.into_iter()
        .enumerate()
        .map(|(i, r)| CategoryPoint {
            label: r.age_label.clone(),
            x: i as f64,
            value: r.total as f64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub fraction: f64,
    /// Radians, counter-clockwise from 12 o'clock.
    pub start: f64,
    pub end: f64,
}

/// Share of the total per bucket. Empty when everything sums to zero;
/// zero-sized buckets get no slice.
pub fn pie_slices<'a>(rows: impl IntoIterator<Item = &'a PopulationRow>) -> Vec<PieSlice> {
    let rows: Vec<&PopulationRow> = rows.into_iter().collect();
    let sum: u64 = rows.iter().map(|r| r.total).sum();
    if sum == 0 {
        return Vec::new();
    }

    let mut start = 0.0;
    rows.iter()
        .filter(|r| r.total > 0)
        .map(|r| {
            let fraction = r.total as f64 / sum as f64;
            let end = start + fraction * TAU;
            let slice = PieSlice {
                label: r.age_label.clone(),
                fraction,
                start,
                end,
            };
            start = end;
            slice
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PyramidBar {
    pub label: String,
    pub y: f64,
    /// Drawn to the left, so non-positive.
    pub male: f64,
    pub female: f64,
}

pub fn pyramid_bars<'a>(rows: impl IntoIterator<Item = &'a PopulationRow>) -> Vec<PyramidBar> {
    rows.into_iter()
        .enumerate()
        .map(|(i, r)| PyramidBar {
            label: r.age_label.clone(),
            y: i as f64,
            male: -(r.male as f64),
            female: r.female as f64,
        })
        .collect()
}
