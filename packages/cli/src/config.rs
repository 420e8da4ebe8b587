//! Portal configuration.
//!
//! Read from a TOML file (`--config`, else `accountability.toml` in the
//! working directory if present, else built-in defaults), then overridden by
//! environment variables:
//!
//! * `ACCOUNTABILITY_DATA_DIR`: read a local JSON snapshot directory
//! * `ACCOUNTABILITY_REST_URL`: read the hosted REST API instead
//! * `ACCOUNTABILITY_API_KEY`: API key sent with REST requests

use std::path::{Path, PathBuf};

use accountability_ranking::RankingError;
use accountability_ranking_models::RankingOptions;
use accountability_store::{RecordStore, RestStore, SnapshotStore};
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "accountability.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`PortalConfig`].
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Ranking settings are out of range.
    #[error(transparent)]
    Ranking(#[from] RankingError),
}

/// Where records are read from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A directory of per-table JSON files.
    Snapshot {
        /// Snapshot directory.
        dir: PathBuf,
    },
    /// The hosted database REST API.
    Rest {
        /// Project base URL.
        base_url: String,
        /// Anonymous API key.
        #[serde(default)]
        api_key: Option<String>,
        /// Rows per page.
        #[serde(default)]
        page_size: Option<u64>,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Snapshot {
            dir: PathBuf::from("data"),
        }
    }
}

impl SourceConfig {
    /// Builds the configured store.
    #[must_use]
    pub fn open(&self) -> Box<dyn RecordStore> {
        match self {
            Self::Snapshot { dir } => Box::new(SnapshotStore::open(dir.clone())),
            Self::Rest {
                base_url,
                api_key,
                page_size,
            } => {
                let store = RestStore::new(base_url.clone(), api_key.clone());
                Box::new(match page_size {
                    Some(size) => store.with_page_size(*size),
                    None => store,
                })
            }
        }
    }
}

/// Histogram settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Width of each score bucket.
    pub bucket_width: f64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self { bucket_width: 10.0 }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Record source.
    pub source: SourceConfig,
    /// Composite weights and tie handling.
    pub ranking: RankingOptions,
    /// Score histogram.
    pub histogram: HistogramConfig,
    /// Year service time is measured to. Defaults to the current year.
    pub as_of_year: Option<i32>,
}

impl PortalConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document does not parse.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Loads, applies environment overrides, and validates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if
    /// the ranking settings are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        let path = path.or_else(|| default_path.exists().then_some(default_path));

        let mut config = match path {
            Some(path) => {
                log::debug!("Reading config from {}", path.display());
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// A REST URL wins over a data directory when both are set.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("ACCOUNTABILITY_DATA_DIR") {
            self.source = SourceConfig::Snapshot { dir: dir.into() };
        }

        if let Some(url) = lookup("ACCOUNTABILITY_REST_URL") {
            let page_size = match &self.source {
                SourceConfig::Rest { page_size, .. } => *page_size,
                SourceConfig::Snapshot { .. } => None,
            };
            self.source = SourceConfig::Rest {
                base_url: url,
                api_key: None,
                page_size,
            };
        }

        if let Some(key) = lookup("ACCOUNTABILITY_API_KEY")
            && let SourceConfig::Rest { api_key, .. } = &mut self.source
        {
            *api_key = Some(key);
        }
    }

    /// Checks ranking weights and histogram width.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Ranking`] for out-of-range settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        accountability_ranking::validate_options(&self.ranking)?;

        accountability_ranking::validate_bucket_width(self.histogram.bucket_width)?;

        Ok(())
    }
}
