//! Configuration file support
//!
//! Settings are read from TOML. Lookup order:
//!
//! 1. `--config <path>`
//! 2. `./bookmend.toml`
//! 3. `<config_dir>/bookmend/config.toml`
//! 4. built-in defaults
//!
//! Command-line flags are merged on top through [`CliOverrides`].

use crate::align::{AlignOptions, DedupStrategy, MatchStrategy};
use crate::extract::{DiscoveryMode, ExtractOptions};
use crate::repair::{CorrectionRule, TitleRules};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "bookmend.toml";

/// Directory and file name under the user config directory
pub const USER_CONFIG_DIR: &str = "bookmend";
pub const USER_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings for every pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractOptions,
    pub align: AlignOptions,
    /// Output part titles by TOC part key; wins over `align.part_titles`
    pub part_titles: BTreeMap<String, String>,
    pub titles: TitleRules,
    pub corrections: Vec<CorrectionRule>,
}

impl Config {
    /// Candidate config paths in lookup order, without the explicit one
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE));
        }
        paths
    }

    /// Load the first config found on the search path, or defaults
    pub fn load() -> Result<Self> {
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load from `explicit` or the search path, falling back to defaults
    pub fn resolve(explicit: Option<&Path>) -> Self {
        let loaded = match explicit {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        };
        loaded.unwrap_or_else(|e| {
            warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Check values that would make extraction or matching degenerate
    ///
    /// Run after CLI overrides are merged, since either source can be wrong.
    pub fn validate(&self) -> Result<()> {
        let at_least_one = [
            ("extract.max_chapter_title_chars", self.extract.max_chapter_title_chars),
            ("extract.max_part_title_chars", self.extract.max_part_title_chars),
            ("align.preview_chars", self.align.preview_chars),
            ("align.hash_paragraphs", self.align.hash_paragraphs),
            ("align.hash_chars", self.align.hash_chars),
            ("align.keyword_words", self.align.keyword_words),
            ("align.title_prefix_chars", self.align.title_prefix_chars),
        ];
        if let Some(&(field, _)) = at_least_one.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid {
                field,
                reason: "must be at least 1".to_string(),
            });
        }

        let threshold = self.align.fuzzy_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "align.fuzzy_threshold",
                reason: format!("{threshold} is outside (0, 1]"),
            });
        }
        Ok(())
    }

    /// Alignment options with the top-level part titles folded in
    pub fn align_options(&self) -> AlignOptions {
        let mut options = self.align.clone();
        for (key, title) in &self.part_titles {
            options.part_titles.insert(key.clone(), title.clone());
        }
        options
    }

    /// Apply command-line values on top of the file values
    pub fn merge_with_cli(mut self, overrides: &CliOverrides) -> Self {
        if let Some(mode) = overrides.discovery {
            self.extract.discovery = mode;
        }
        if let Some(chars) = overrides.min_item_chars {
            self.extract.min_item_chars = chars;
        }
        if let Some(strategy) = overrides.dedup {
            self.align.dedup = strategy;
        }
        if let Some(strategy) = overrides.matching {
            self.align.matching = strategy;
        }
        if let Some(threshold) = overrides.fuzzy_threshold {
            self.align.fuzzy_threshold = threshold;
        }
        if let Some(enabled) = overrides.clean_repeated_titles {
            self.align.clean_repeated_titles = enabled;
        }
        self
    }
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub discovery: Option<DiscoveryMode>,
    pub min_item_chars: Option<usize>,
    pub dedup: Option<DedupStrategy>,
    pub matching: Option<MatchStrategy>,
    pub fuzzy_threshold: Option<f64>,
    pub clean_repeated_titles: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[extract]
discovery = "name-heuristic"
min_item_chars = 5

[align]
dedup = "chapter-number"
match = "by-number"
skip_titles = ["Content", "Contents"]

[[align.sections]]
title = "PREFACE"
begin = "PREFACE"

[part_titles]
I = "PART I"
"FRONT" = "FRONT MATTER"

[titles]
always_capitalized = ["God"]

[[corrections]]
from = "Devotlon"
to = "Devotion"
"#;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extract, ExtractOptions::default());
        assert_eq!(config.align, AlignOptions::default());
        assert!(config.corrections.is_empty());
        assert_eq!(Config::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_parse_sample() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.extract.discovery, DiscoveryMode::NameHeuristic);
        assert_eq!(config.extract.min_item_chars, 5);
        assert_eq!(config.extract.max_chapter_title_chars, 100);
        assert_eq!(config.align.dedup, DedupStrategy::ChapterNumber);
        assert_eq!(config.align.matching, MatchStrategy::ByNumber);
        assert_eq!(config.align.sections.len(), 1);
        assert_eq!(config.align.sections[0].begin.as_deref(), Some("PREFACE"));
        assert_eq!(config.titles.always_capitalized, vec!["God"]);
        assert_eq!(config.titles.ordinals.len(), 5);
        assert_eq!(config.corrections, vec![CorrectionRule::new("Devotlon", "Devotion")]);

        let align = config.align_options();
        assert_eq!(align.part_title("I"), "PART I");
        assert_eq!(align.part_title("FRONT"), "FRONT MATTER");
    }

    #[test]
    fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.align.skip_titles.len(), 2);
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load_from_path(Path::new("/nonexistent/bookmend.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[align]\nmatch = 42\n").unwrap();
        assert!(matches!(
            Config::load_from_path(file.path()),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(Config::resolve(Some(file.path())), Config::default());
    }

    #[test]
    fn test_merge_with_cli() {
        let overrides = CliOverrides {
            matching: Some(MatchStrategy::Positional),
            fuzzy_threshold: Some(0.9),
            clean_repeated_titles: Some(false),
            ..CliOverrides::new()
        };
        let merged = Config::from_toml_str(SAMPLE).unwrap().merge_with_cli(&overrides);
        assert_eq!(merged.align.matching, MatchStrategy::Positional);
        assert_eq!(merged.align.dedup, DedupStrategy::ChapterNumber);
        assert_eq!(merged.align.fuzzy_threshold, 0.9);
        assert!(!merged.align.clean_repeated_titles);
        assert_eq!(merged.extract.min_item_chars, 5);
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn test_validate_file_values() {
        assert!(Config::default().validate().is_ok());

        let config = Config::from_toml_str("[align]\ntitle_prefix_chars = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "align.title_prefix_chars", .. })
        ));

        let config = Config::from_toml_str("[align]\npreview_chars = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_cli_threshold() {
        for bad in [0.0, -0.5, 1.5, f64::NAN] {
            let overrides = CliOverrides {
                fuzzy_threshold: Some(bad),
                ..CliOverrides::new()
            };
            let merged = Config::default().merge_with_cli(&overrides);
            assert!(matches!(
                merged.validate(),
                Err(ConfigError::Invalid { field: "align.fuzzy_threshold", .. })
            ));
        }
    }
}
