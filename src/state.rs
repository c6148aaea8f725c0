use std::path::Path;

use anyhow::Result;
use encoding_rs::Encoding;

use crate::chart::ChartType;
use crate::config::{DashboardConfig, Source};
use crate::data::export::export_csv;
use crate::data::filter::{AgeRange, Order, ranked_indices};
use crate::data::model::PopulationRow;
use crate::data::{Dashboard, rebuild};

/// Rows shown in each of the "largest / smallest" tables.
pub const RANKING_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSlot {
    Total,
    SexSplit,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Every input change goes
/// through [`AppState::refresh`], which rebuilds the dashboard from scratch.
pub struct AppState {
    pub total: Option<Source>,
    pub sex_split: Option<Source>,
    encoding: &'static Encoding,
    delimiter: u8,

    /// Slider positions, inclusive.
    pub age_min: u32,
    pub age_max: u32,

    pub chart_type: ChartType,

    /// Result of the last successful rebuild; `None` after a failure.
    pub dashboard: Option<Dashboard>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn from_config(config: DashboardConfig) -> Result<Self> {
        let range = config.initial_range()?;
        let mut state = Self {
            encoding: config.encoding()?,
            delimiter: config.delimiter_byte()?,
            total: config.total,
            sex_split: config.sex_split,
            age_min: range.min(),
            age_max: range.max(),
            chart_type: config.chart_type,
            dashboard: None,
            status_message: None,
        };
        state.refresh();
        Ok(state)
    }

    /// Rebuild the table from the current sources and slider range.
    pub fn refresh(&mut self) {
        let result = AgeRange::new(self.age_min, self.age_max).and_then(|range| {
            rebuild(
                self.total.as_ref(),
                self.sex_split.as_ref(),
                self.encoding,
                self.delimiter,
                range,
            )
        });

        match result {
            Ok(dashboard) => {
                log::info!(
                    "rebuilt population table: {} age buckets, {} in range {}..={}",
                    dashboard.table.len(),
                    dashboard.visible.len(),
                    self.age_min,
                    self.age_max
                );
                if !dashboard.table.has_sex_split() && self.chart_type == ChartType::Pyramid {
                    log::info!("no by-sex table loaded; switching from pyramid to bar chart");
                    self.chart_type = ChartType::Bar;
                }
                self.dashboard = Some(dashboard);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("rebuild failed: {e}");
                self.dashboard = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Replace one source (file picked or uploaded) and rebuild.
    pub fn set_source(&mut self, slot: SourceSlot, source: Source) {
        log::info!("{slot:?} source set to {}", source.display_name());
        match slot {
            SourceSlot::Total => self.total = Some(source),
            SourceSlot::SexSplit => self.sex_split = Some(source),
        }
        self.refresh();
    }

    /// Move the range, keeping `min <= max` by dragging the other end along.
    pub fn set_range(&mut self, min: u32, max: u32, min_moved: bool) {
        let (min, max) = match (min > max, min_moved) {
            (true, true) => (min, min),
            (true, false) => (max, max),
            (false, _) => (min, max),
        };
        if (min, max) != (self.age_min, self.age_max) {
            self.age_min = min;
            self.age_max = max;
            self.refresh();
        }
    }

    /// Whether the current table has male/female counts; the pyramid chart
    /// needs them.
    pub fn has_sex_split(&self) -> bool {
        self.dashboard
            .as_ref()
            .is_some_and(|d| d.table.has_sex_split())
    }

    /// Rows currently in range, in source order.
    pub fn visible_rows(&self) -> Vec<&PopulationRow> {
        match &self.dashboard {
            Some(d) => d.table.select(&d.visible).collect(),
            None => Vec::new(),
        }
    }

    /// The largest or smallest age groups among the visible rows.
    pub fn ranking(&self, order: Order) -> Vec<&PopulationRow> {
        match &self.dashboard {
            Some(d) => {
                let idx = ranked_indices(&d.table, &d.visible, RANKING_SIZE, order);
                idx.iter().map(|&i| &d.table.rows()[i]).collect()
            }
            None => Vec::new(),
        }
    }

    pub fn export_visible(&self, path: &Path) -> Result<()> {
        let rows = self.visible_rows();
        export_csv(path, rows.iter().copied(), self.has_sex_split())?;
        log::info!("exported {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}
