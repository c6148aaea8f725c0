use super::columns::{sex_age_columns, total_age_columns};
use super::error::{PopulationError, Result, Sequence};
use super::extract::extract_counts;
use super::labels::parse_age_labels;
use super::model::{AgeBucket, PopulationRow, PopulationTable, RawTable};

// ---------------------------------------------------------------------------
// DemographicTableBuilder entry-point
// ---------------------------------------------------------------------------

/// Reshape the first data row of a total-by-age table and a by-age-and-sex
/// table into one tidy row per age bucket.
///
/// Steps:
/// 1. classify age columns (total; male/female)
/// 2. parse each group's headers into buckets and require all three
///    bucket sequences to be identical
/// 3. normalise the counts of row 0
/// 4. zip into [`PopulationRow`]s, in source column order
pub fn build_population_table(total: &RawTable, sex_split: &RawTable) -> Result<PopulationTable> {
    let total_cols = total_age_columns(&total.headers);
    let sex_cols = sex_age_columns(&sex_split.headers)?;

    let buckets = parse_age_labels(&total.headers, &total_cols)?;
    let male_buckets = parse_age_labels(&sex_split.headers, &sex_cols.male)?;
    let female_buckets = parse_age_labels(&sex_split.headers, &sex_cols.female)?;

    check_buckets(Sequence::Total, &buckets, Sequence::Male, &male_buckets)?;
    check_buckets(Sequence::Total, &buckets, Sequence::Female, &female_buckets)?;

    let total_counts = extract_counts(total, &total_cols)?;
    let male_counts = extract_counts(sex_split, &sex_cols.male)?;
    let female_counts = extract_counts(sex_split, &sex_cols.female)?;

    let table = assemble(buckets, total_counts, male_counts, female_counts)?;
    log::debug!(
        "built population table from '{}' and '{}': {} buckets",
        total.name,
        sex_split.name,
        table.len()
    );
    Ok(table)
}

/// Reshape the total-by-age table alone, for when no by-sex table is
/// loaded. The rows carry `male = female = 0` and the table reports
/// [`PopulationTable::has_sex_split`] as `false`.
pub fn build_total_table(total: &RawTable) -> Result<PopulationTable> {
    let total_cols = total_age_columns(&total.headers);
    let buckets = parse_age_labels(&total.headers, &total_cols)?;
    let counts = extract_counts(total, &total_cols)?;

    let rows = buckets
        .into_iter()
        .zip(counts)
        .map(|(bucket, total)| PopulationRow {
            age_label: bucket.label,
            age_numeric: bucket.numeric,
            total,
            male: 0,
            female: 0,
        })
        .collect::<Vec<_>>();
    log::debug!("built total-only table from '{}': {} buckets", total.name, rows.len());
    Ok(PopulationTable::new(rows, false))
}

/// Require two bucket sequences to match in length, labels and order.
/// Buckets compare by label as well as numeric value, so `05세` and `5세`
/// are different buckets.
fn check_buckets(
    left: Sequence,
    left_buckets: &[AgeBucket],
    right: Sequence,
    right_buckets: &[AgeBucket],
) -> Result<()> {
    if left_buckets.len() != right_buckets.len() {
        return Err(PopulationError::Alignment {
            left,
            right,
            detail: format!(
                "{} {left} buckets but {} {right} buckets",
                left_buckets.len(),
                right_buckets.len()
            ),
        });
    }
    let mismatch = left_buckets
        .iter()
        .zip(right_buckets)
        .position(|(a, b)| a != b);
    if let Some(pos) = mismatch {
        return Err(PopulationError::Alignment {
            left,
            right,
            detail: format!(
                "bucket #{pos} is '{}' in {left} but '{}' in {right}",
                left_buckets[pos], right_buckets[pos]
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Table assembler
// ---------------------------------------------------------------------------

/// Zip buckets with their three count sequences. Never truncates: any length
/// conflict is reported against the bucket sequence.
pub fn assemble(
    buckets: Vec<AgeBucket>,
    total: Vec<u64>,
    male: Vec<u64>,
    female: Vec<u64>,
) -> Result<PopulationTable> {
    for (seq, counts) in [
        (Sequence::Total, &total),
        (Sequence::Male, &male),
        (Sequence::Female, &female),
    ] {
        if counts.len() != buckets.len() {
            return Err(PopulationError::Alignment {
                left: Sequence::Total,
                right: seq,
                detail: format!(
                    "{} age buckets but {} {seq} counts",
                    buckets.len(),
                    counts.len()
                ),
            });
        }
    }

    let rows = buckets
        .into_iter()
        .zip(total)
        .zip(male)
        .zip(female)
        .map(|(((bucket, total), male), female)| PopulationRow {
            age_label: bucket.label,
            age_numeric: bucket.numeric,
            total,
            male,
            female,
        })
        .collect();

    Ok(PopulationTable::new(rows, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, numeric: u32, total: u64, male: u64, female: u64) -> PopulationRow {
        PopulationRow {
            age_label: label.to_string(),
            age_numeric: numeric,
            total,
            male,
            female,
        }
    }

    fn sample_total() -> RawTable {
        RawTable::from_strings("total", &["0세", "5세", "100세이상"], &[&["1,000", "2,000", "50"]])
    }

    fn sample_sex_split() -> RawTable {
        RawTable::from_strings(
            "sex",
            &["남_0세", "남_5세", "남_100세이상", "여_0세", "여_5세", "여_100세이상"],
            &[&["600", "1,200", "20", "400", "800", "30"]],
        )
    }

    #[test]
    fn end_to_end_scenario() {
        let table = build_population_table(&sample_total(), &sample_sex_split()).unwrap();
        assert_eq!(
            table.rows(),
            &[
                row("0", 0, 1000, 600, 400),
                row("5", 5, 2000, 1200, 800),
                row("100+", 100, 50, 20, 30),
            ]
        );
    }

    #[test]
    fn rebuild_is_idempotent() {
        let a = build_population_table(&sample_total(), &sample_sex_split()).unwrap();
        let b = build_population_table(&sample_total(), &sample_sex_split()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn metadata_columns_are_ignored() {
        let total = RawTable::from_strings(
            "total",
            &["행정구역", "총인구수", "0세", "5세"],
            &[&["경기도", "3,000", "1,000", "2,000"]],
        );
        let sex = RawTable::from_strings(
            "sex",
            &["행정구역", "남_0세", "남_5세", "여_0세", "여_5세"],
            &[&["경기도", "600", "1,200", "400", "800"]],
        );
        let table = build_population_table(&total, &sex).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1], row("5", 5, 2000, 1200, 800));
    }

    #[test]
    fn bucket_count_mismatch_is_alignment_error() {
        let total = RawTable::from_strings("total", &["0세", "5세"], &[&["1", "2"]]);
        let err = build_population_table(&total, &sample_sex_split()).unwrap_err();
        assert!(matches!(
            err,
            PopulationError::Alignment {
                left: Sequence::Total,
                right: Sequence::Male,
                ..
            }
        ));
    }

    #[test]
    fn bucket_label_mismatch_is_alignment_error() {
        let total = RawTable::from_strings("total", &["0세", "10세", "100세이상"], &[&["1", "2", "3"]]);
        let err = build_population_table(&total, &sample_sex_split()).unwrap_err();
        match err {
            PopulationError::Alignment { detail, .. } => {
                assert!(detail.contains("'10'"), "{detail}");
                assert!(detail.contains("'5'"), "{detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unequal_sex_groups_fail_before_counts_are_read() {
        let sex = RawTable::from_strings(
            "sex",
            &["남_0세", "남_5세", "여_0세"],
            &[&["abc", "abc", "abc"]],
        );
        let err = build_population_table(&sample_total(), &sex).unwrap_err();
        assert!(matches!(err, PopulationError::Alignment { .. }));
    }

    #[test]
    fn bad_cell_is_reported() {
        let total = RawTable::from_strings("total", &["0세", "5세", "100세이상"], &[&["1", "abc", "3"]]);
        let err = build_population_table(&total, &sample_sex_split()).unwrap_err();
        assert!(matches!(
            err,
            PopulationError::CellNormalization { ref column, .. } if column == "5세"
        ));
    }

    #[test]
    fn bad_label_is_reported() {
        let total = RawTable::from_strings("total", &["0세", "5세", "X세"], &[&["1", "2", "3"]]);
        let err = build_population_table(&total, &sample_sex_split()).unwrap_err();
        assert!(matches!(err, PopulationError::InvalidAgeLabel(ref h) if h == "X세"));
    }

    #[test]
    fn source_order_is_kept() {
        let total = RawTable::from_strings("total", &["5세", "0세"], &[&["2", "1"]]);
        let sex = RawTable::from_strings(
            "sex",
            &["남_5세", "남_0세", "여_5세", "여_0세"],
            &[&["1", "1", "1", "0"]],
        );
        let table = build_population_table(&total, &sex).unwrap();
        let numerics: Vec<u32> = table.rows().iter().map(|r| r.age_numeric).collect();
        assert_eq!(numerics, vec![5, 0]);
    }

    #[test]
    fn zero_padded_label_does_not_match_plain_label() {
        let total = RawTable::from_strings("total", &["05세"], &[&["1"]]);
        let sex = RawTable::from_strings("sex", &["남_5세", "여_5세"], &[&["1", "0"]]);
        let err = build_population_table(&total, &sex).unwrap_err();
        match err {
            PopulationError::Alignment { detail, .. } => {
                assert!(detail.contains("'05'"), "{detail}");
                assert!(detail.contains("'5'"), "{detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn total_only_table() {
        let table = build_total_table(&sample_total()).unwrap();
        assert!(!table.has_sex_split());
        assert_eq!(
            table.rows(),
            &[
                row("0", 0, 1000, 0, 0),
                row("5", 5, 2000, 0, 0),
                row("100+", 100, 50, 0, 0),
            ]
        );
    }

    #[test]
    fn total_only_ignores_metadata_columns() {
        let total = RawTable::from_strings(
            "total",
            &["행정구역", "2025년04월_계_총인구수", "2025년04월_계_0세", "2025년04월_계_100세 이상"],
            &[&["경기도", "3,000", "2,950", "50"]],
        );
        let table = build_total_table(&total).unwrap();
        let labels: Vec<&str> = table.rows().iter().map(|r| r.age_label.as_str()).collect();
        assert_eq!(labels, vec!["0", "100+"]);
    }

    #[test]
    fn total_only_without_age_columns_is_empty() {
        let total = RawTable::from_strings("total", &["행정구역"], &[&["경기도"]]);
        let table = build_total_table(&total).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn total_only_reports_bad_cells() {
        let total = RawTable::from_strings("total", &["0세", "5세"], &[&["1", "-4"]]);
        assert!(matches!(
            build_total_table(&total),
            Err(PopulationError::CellNormalization { ref column, .. }) if column == "5세"
        ));
    }

    #[test]
    fn split_table_reports_sex_split() {
        let table = build_population_table(&sample_total(), &sample_sex_split()).unwrap();
        assert!(table.has_sex_split());
        assert!(!table.is_empty());
    }

    #[test]
    fn assemble_refuses_to_truncate() {
        let buckets = vec![
            AgeBucket { label: "0".into(), numeric: 0 },
            AgeBucket { label: "5".into(), numeric: 5 },
        ];
        let err = assemble(buckets, vec![1, 2], vec![1], vec![1, 2]).unwrap_err();
        assert!(matches!(
            err,
            PopulationError::Alignment {
                right: Sequence::Male,
                ..
            }
        ));
    }
}
