use super::error::{PopulationError, Result, Sequence};

/// Marks a column as an age bucket (`세`, "years old").
pub const BUCKET_MARKER: &str = "세";
pub const MALE_MARKER: &str = "남_";
pub const FEMALE_MARKER: &str = "여_";

// ---------------------------------------------------------------------------
// Column classification
// ---------------------------------------------------------------------------

/// Age columns of the sex-split table, as indices into its header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SexColumns {
    pub male: Vec<usize>,
    pub female: Vec<usize>,
}

/// Indices of the age-bucket columns of the total table, in source order.
/// Metadata columns (region name, grand totals, ...) are skipped.
pub fn total_age_columns(headers: &[String]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.contains(BUCKET_MARKER))
        .map(|(i, _)| i)
        .collect()
}

/// Split the age-bucket columns of the sex-split table into male and female
/// groups.
///
/// Fails when a header carries both sex markers, or when the two groups end
/// up with different lengths.
pub fn sex_age_columns(headers: &[String]) -> Result<SexColumns> {
    let mut male = Vec::new();
    let mut female = Vec::new();

    for (i, h) in headers.iter().enumerate() {
        if !h.contains(BUCKET_MARKER) {
            continue;
        }
        match (h.contains(MALE_MARKER), h.contains(FEMALE_MARKER)) {
            (true, true) => {
                return Err(PopulationError::Alignment {
                    left: Sequence::Male,
                    right: Sequence::Female,
                    detail: format!("column '{h}' carries both sex markers"),
                });
            }
            (true, false) => male.push(i),
            (false, true) => female.push(i),
            (false, false) => {}
        }
    }

    if male.len() != female.len() {
        return Err(PopulationError::Alignment {
            left: Sequence::Male,
            right: Sequence::Female,
            detail: format!(
                "{} male age columns but {} female age columns",
                male.len(),
                female.len()
            ),
        });
    }

    log::debug!(
        "classified {} male and {} female age columns",
        male.len(),
        female.len()
    );
    Ok(SexColumns { male, female })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(hs: &[&str]) -> Vec<String> {
        hs.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn total_columns_skip_metadata() {
        let hs = headers(&["행정구역", "2025년04월_계_총인구수", "2025년04월_계_0세", "2025년04월_계_100세 이상"]);
        assert_eq!(total_age_columns(&hs), vec![2, 3]);
    }

    #[test]
    fn sex_columns_keep_source_order() {
        let hs = headers(&["행정구역", "남_0세", "남_5세", "여_0세", "여_5세"]);
        let cols = sex_age_columns(&hs).unwrap();
        assert_eq!(cols.male, vec![1, 2]);
        assert_eq!(cols.female, vec![3, 4]);
    }

    #[test]
    fn interleaved_sex_columns_are_grouped() {
        let hs = headers(&["남_0세", "여_0세", "남_5세", "여_5세"]);
        let cols = sex_age_columns(&hs).unwrap();
        assert_eq!(cols.male, vec![0, 2]);
        assert_eq!(cols.female, vec![1, 3]);
    }

    #[test]
    fn unequal_sex_groups_fail() {
        let hs = headers(&["남_0세", "남_5세", "여_0세"]);
        let err = sex_age_columns(&hs).unwrap_err();
        assert!(matches!(
            err,
            PopulationError::Alignment {
                left: Sequence::Male,
                right: Sequence::Female,
                ..
            }
        ));
    }

    #[test]
    fn column_with_both_markers_fails() {
        let hs = headers(&["남_여_0세"]);
        assert!(matches!(
            sex_age_columns(&hs),
            Err(PopulationError::Alignment { .. })
        ));
    }
}
