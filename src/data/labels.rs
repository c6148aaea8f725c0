use super::columns::BUCKET_MARKER;
use super::error::{PopulationError, Result};
use super::model::AgeBucket;

/// "and above", marks the open-ended top bucket.
const OPEN_ENDED_MARKER: &str = "이상";
const OPEN_ENDED_LABEL: &str = "100+";
const OPEN_ENDED_NUMERIC: u32 = 100;

/// Parse an age column header (`2025년04월_남_35세`, `여_100세이상`, `0세`)
/// into its canonical bucket.
///
/// Only the segment after the last `_` is looked at. A residual that is not
/// a non-negative integer means the column naming changed upstream and is
/// reported, never skipped.
pub fn parse_age_label(header: &str) -> Result<AgeBucket> {
    let segment = header.rsplit('_').next().unwrap_or(header);

    if segment.contains(OPEN_ENDED_MARKER) {
        return Ok(AgeBucket {
            label: OPEN_ENDED_LABEL.to_string(),
            numeric: OPEN_ENDED_NUMERIC,
        });
    }

    let residual = segment.replace(BUCKET_MARKER, "");
    let residual = residual.trim();
    let numeric = residual
        .parse::<u32>()
        .map_err(|_| PopulationError::InvalidAgeLabel(header.to_string()))?;

    Ok(AgeBucket {
        label: residual.to_string(),
        numeric,
    })
}

/// Parse the headers at `columns`, in order.
pub fn parse_age_labels(headers: &[String], columns: &[usize]) -> Result<Vec<AgeBucket>> {
    columns
        .iter()
        .map(|&i| parse_age_label(&headers[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_bucket() {
        let b = parse_age_label("남_35세").unwrap();
        assert_eq!(b.label, "35");
        assert_eq!(b.numeric, 35);
    }

    #[test]
    fn open_ended_bucket() {
        let b = parse_age_label("여_100세이상").unwrap();
        assert_eq!(b.label, "100+");
        assert_eq!(b.numeric, 100);
    }

    #[test]
    fn open_ended_with_space_and_prefix() {
        let b = parse_age_label("2025년04월_계_100세 이상").unwrap();
        assert_eq!(b.label, "100+");
    }

    #[test]
    fn unprefixed_bucket() {
        let b = parse_age_label("0세").unwrap();
        assert_eq!(b, AgeBucket { label: "0".into(), numeric: 0 });
    }

    #[test]
    fn only_last_segment_counts() {
        let b = parse_age_label("2025년04월_남_5세").unwrap();
        assert_eq!(b.label, "5");
    }

    #[test]
    fn non_numeric_residual_is_an_error() {
        assert!(matches!(
            parse_age_label("남_미상세"),
            Err(PopulationError::InvalidAgeLabel(h)) if h == "남_미상세"
        ));
        assert!(parse_age_label("남_-5세").is_err());
    }

    #[test]
    fn male_and_female_headers_agree_with_total() {
        let total: Vec<String> = ["0세", "5세", "100세이상"].iter().map(|s| s.to_string()).collect();
        let male: Vec<String> = ["남_0세", "남_5세", "남_100세이상"].iter().map(|s| s.to_string()).collect();
        let a = parse_age_labels(&total, &[0, 1, 2]).unwrap();
        let b = parse_age_labels(&male, &[0, 1, 2]).unwrap();
        assert_eq!(a, b);
    }
}
