//! Data layer: raw sources, reshaping, filtering, export.
//!
//! Architecture:
//! ```text
//!  total.csv        by_sex.csv        (CP949, one data row each;
//!      │                 │             by_sex.csv is optional)
//!      │                 │
//!      ▼                 ▼
//!   ┌──────────────────────────┐
//!   │  loader                   │  decode + parse → RawTable
//!   └──────────────────────────┘
//!      │                 │
//!      ▼                 ▼
//!   ┌──────────────────────────┐
//!   │  builder                  │  columns → labels → extract → assemble
//!   │                           │  (total only: no male/female counts)
//!   └──────────────────────────┘
//!               │
//!               ▼
//!   ┌──────────────────────────┐
//!   │  PopulationTable          │  one tidy row per age bucket
//!   └──────────────────────────┘
//!               │
//!               ▼
//!   ┌──────────────────────────┐
//!   │  filter                   │  age range → visible indices
//!   └──────────────────────────┘
//! ```

pub mod builder;
pub mod columns;
pub mod error;
pub mod export;
pub mod extract;
pub mod filter;
pub mod labels;
pub mod loader;
pub mod model;

use encoding_rs::Encoding;

use crate::config::Source;
use error::{PopulationError, Result};
use filter::AgeRange;
use model::PopulationTable;

/// Everything one render cycle needs: the table and the rows in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub table: PopulationTable,
    pub visible: Vec<usize>,
}

/// Rebuild the dashboard from scratch. Pure in its inputs; nothing is cached
/// between calls.
///
/// The total table is required. Without a by-sex table the result is a
/// total-only table (see [`builder::build_total_table`]).
pub fn rebuild(
    total: Option<&Source>,
    sex_split: Option<&Source>,
    encoding: &'static Encoding,
    delimiter: u8,
    range: AgeRange,
) -> Result<Dashboard> {
    let total = total.ok_or_else(|| PopulationError::MissingSource("total population table".into()))?;
    let total = loader::load_raw_table(total, encoding, delimiter)?;

    let table = match sex_split {
        Some(sex_split) => {
            let sex_split = loader::load_raw_table(sex_split, encoding, delimiter)?;
            builder::build_population_table(&total, &sex_split)?
        }
        None => builder::build_total_table(&total)?,
    };
    let visible = filter::filtered_indices(&table, range);
    Ok(Dashboard { table, visible })
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::EUC_KR;
    use std::sync::Arc;

    fn stream(name: &str, text: &str) -> Source {
        let (bytes, _, _) = EUC_KR.encode(text);
        Source::Stream {
            name: name.to_string(),
            bytes: Arc::from(bytes.into_owned()),
        }
    }

    fn sources() -> (Source, Source) {
        (
            stream(
                "total.csv",
                "행정구역,2025년04월_계_0세,2025년04월_계_5세,2025년04월_계_100세 이상\n경기도,\"1,000\",\"2,000\",50\n",
            ),
            stream(
                "by_sex.csv",
                "행정구역,2025년04월_남_0세,2025년04월_남_5세,2025년04월_남_100세 이상,\
                 2025년04월_여_0세,2025년04월_여_5세,2025년04월_여_100세 이상\n\
                 경기도,600,\"1,200\",20,400,800,30\n",
            ),
        )
    }

    #[test]
    fn rebuild_filters_after_building() {
        let (total, sex) = sources();
        let dash = rebuild(Some(&total), Some(&sex), EUC_KR, b',', AgeRange::new(5, 100).unwrap()).unwrap();
        assert_eq!(dash.table.len(), 3);
        assert_eq!(dash.visible, vec![1, 2]);
        let last = &dash.table.rows()[2];
        assert_eq!((last.age_label.as_str(), last.total, last.male, last.female), ("100+", 50, 20, 30));
    }

    #[test]
    fn rebuild_twice_is_identical() {
        let (total, sex) = sources();
        let a = rebuild(Some(&total), Some(&sex), EUC_KR, b',', AgeRange::default()).unwrap();
        let b = rebuild(Some(&total), Some(&sex), EUC_KR, b',', AgeRange::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.visible.len(), a.table.len());
    }

    #[test]
    fn unset_total_is_missing() {
        let (_, sex) = sources();
        assert!(matches!(
            rebuild(None, Some(&sex), EUC_KR, b',', AgeRange::default()),
            Err(PopulationError::MissingSource(_))
        ));
    }

    #[test]
    fn total_alone_builds_total_only_table() {
        let (total, _) = sources();
        let dash = rebuild(Some(&total), None, EUC_KR, b',', AgeRange::new(0, 5).unwrap()).unwrap();
        assert!(!dash.table.has_sex_split());
        assert_eq!(dash.visible, vec![0, 1]);
        let totals: Vec<u64> = dash.table.rows().iter().map(|r| r.total).collect();
        assert_eq!(totals, vec![1000, 2000, 50]);
    }

    #[test]
    fn sex_table_without_age_columns_is_still_rejected() {
        let (total, _) = sources();
        let sex = stream("by_sex.csv", "행정구역\n경기도\n");
        assert!(matches!(
            rebuild(Some(&total), Some(&sex), EUC_KR, b',', AgeRange::default()),
            Err(PopulationError::Alignment { .. })
        ));
    }
}
