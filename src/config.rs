use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use serde::Deserialize;

use crate::chart::ChartType;
use crate::data::filter::AgeRange;
use crate::data::loader::resolve_encoding;

/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "popviz.json";

// ---------------------------------------------------------------------------
// Source – where a raw table comes from
// ---------------------------------------------------------------------------

/// A raw table source: a file on disk, or a buffer the user uploaded.
///
/// ```json
/// { "path": "data/population_total.csv" }
/// ```
#[derive(Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Path(PathBuf),
    /// Runtime only; never read from a config file.
    #[serde(skip)]
    Stream { name: String, bytes: Arc<[u8]> },
}

impl Source {
    /// Short name for status lines and error messages.
    pub fn display_name(&self) -> String {
        match self {
            Source::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Source::Stream { name, .. } => name.clone(),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Source::Stream { name, bytes } => f
                .debug_struct("Stream")
                .field("name", name)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RangeConfig {
    pub min: u32,
    pub max: u32,
}

/// Startup configuration. Every field is optional in the JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Total population by age.
    pub total: Option<Source>,
    /// Population by age and sex.
    pub sex_split: Option<Source>,
    /// Encoding label, e.g. `euc-kr`, `cp949`, `utf-8`.
    pub encoding: String,
    pub delimiter: char,
    pub age_range: RangeConfig,
    pub chart_type: ChartType,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            total: None,
            sex_split: None,
            encoding: "euc-kr".to_string(),
            delimiter: ',',
            age_range: RangeConfig { min: 0, max: 100 },
            chart_type: ChartType::default(),
        }
    }
}

impl DashboardConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Use `explicit` if given, otherwise [`DEFAULT_CONFIG_FILE`] if it
    /// exists, otherwise defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            return Self::load(fallback);
        }
        log::warn!("no {DEFAULT_CONFIG_FILE} found, starting without data sources");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        self.encoding()?;
        self.delimiter_byte()?;
        self.initial_range()?;
        Ok(())
    }

    pub fn encoding(&self) -> Result<&'static Encoding> {
        resolve_encoding(&self.encoding)
            .with_context(|| format!("unknown encoding '{}'", self.encoding))
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character, got '{}'", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }

    pub fn initial_range(&self) -> Result<AgeRange> {
        AgeRange::new(self.age_range.min, self.age_range.max).context("invalid age_range")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{EUC_KR, UTF_8};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_when_fields_omitted() {
        let config: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert!(config.total.is_none());
        assert_eq!(config.encoding().unwrap(), EUC_KR);
        assert_eq!(config.delimiter_byte().unwrap(), b',');
        assert_eq!(config.initial_range().unwrap(), AgeRange::default());
        assert_eq!(config.chart_type, ChartType::Bar);
    }

    #[test]
    fn full_config_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "total": {{ "path": "data/total.csv" }},
                "sex_split": {{ "path": "data/by_sex.csv" }},
                "encoding": "cp949",
                "delimiter": ";",
                "age_range": {{ "min": 20, "max": 40 }},
                "chart_type": "pyramid"
            }}"#
        )
        .unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.total.as_ref().unwrap().display_name(), "total.csv");
        assert!(matches!(config.sex_split, Some(Source::Path(ref p)) if p.ends_with("by_sex.csv")));
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.initial_range().unwrap(), AgeRange::new(20, 40).unwrap());
        assert_eq!(config.chart_type, ChartType::Pyramid);
    }

    #[test]
    fn stream_sources_cannot_come_from_json() {
        let parsed: std::result::Result<DashboardConfig, _> =
            serde_json::from_str(r#"{ "total": { "stream": { "name": "x", "bytes": [] } } }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let config = DashboardConfig {
            encoding: "klingon".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = DashboardConfig {
            encoding: "utf-8".into(),
            ..Default::default()
        };
        assert_eq!(config.encoding().unwrap(), UTF_8);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = DashboardConfig {
            age_range: RangeConfig { min: 60, max: 10 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
