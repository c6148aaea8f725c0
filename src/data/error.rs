use std::fmt;

// ---------------------------------------------------------------------------
// Error taxonomy for one rebuild of the population table
// ---------------------------------------------------------------------------

/// Which of the three age-bucket sequences an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    Total,
    Male,
    Female,
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sequence::Total => write!(f, "total"),
            Sequence::Male => write!(f, "male"),
            Sequence::Female => write!(f, "female"),
        }
    }
}

/// Every error is terminal for the current rebuild: the UI shows the message
/// and draws no chart until the next successful rebuild.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// A required raw file is absent (or was never chosen).
    #[error("source file not found: {0}")]
    MissingSource(String),

    /// The CSV could not be read or decoded under the configured encoding.
    #[error("failed to parse {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    /// Bucket counts or labels disagree between two sequences.
    #[error("age buckets of the {left} and {right} sequences disagree: {detail}")]
    Alignment {
        left: Sequence,
        right: Sequence,
        detail: String,
    },

    /// A count cell is neither absent nor a non-negative integer.
    #[error("column '{column}': cannot read '{value}' as a population count")]
    CellNormalization { column: String, value: String },

    /// An age column header does not follow the `<N>세` / `<N>세이상` grammar.
    #[error("column '{0}' is not a recognised age bucket")]
    InvalidAgeLabel(String),

    #[error("invalid age range {min}..={max} (expected 0 <= min <= max <= 100)")]
    InvalidRange { min: u32, max: u32 },
}

impl PopulationError {
    pub(crate) fn parse(source_name: &str, reason: impl fmt::Display) -> Self {
        PopulationError::Parse {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PopulationError>;
