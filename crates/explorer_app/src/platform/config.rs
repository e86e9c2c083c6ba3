//! Explorer configuration: an optional RON file, then command-line overrides.
//!
//! Every field has a default; a file only names the fields it changes.

use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use explorer_core::TruncatePolicy;
use explorer_engine::{Catalog, FetchSettings};
use explorer_logging::explorer_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cli::Args;

pub const DEFAULT_CONFIG_FILENAME: &str = "explorer.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum CatalogChoice {
    #[default]
    Countries,
    Pokemon,
    Jokes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum TruncateChoice {
    #[default]
    FixedLimit,
    RecordedCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub catalog: CatalogChoice,
    pub pokemon_details: bool,
    pub base_url: Option<String>,
    pub page_size: usize,
    pub truncate: TruncateChoice,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
    pub log_file: PathBuf,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            catalog: CatalogChoice::default(),
            pokemon_details: false,
            base_url: None,
            page_size: 10,
            truncate: TruncateChoice::default(),
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            max_bytes: fetch.max_bytes,
            log_file: PathBuf::from("./explorer.log"),
        }
    }
}

impl ExplorerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit `--config`, else `./explorer.ron` if it exists, else defaults;
    /// then command-line overrides.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if fallback.is_file() {
                    Self::load(&fallback)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(catalog) = args.catalog {
            self.catalog = catalog;
        }
        if args.details {
            self.pokemon_details = true;
        }
        if let Some(page_size) = args.page_size {
            self.page_size = page_size;
        }
        if let Some(base_url) = &args.base_url {
            self.base_url = Some(base_url.clone());
        }
        if let Some(truncate) = args.truncate {
            self.truncate = truncate;
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = log_file.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.page_size()?;
        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid("max_bytes must be positive".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn page_size(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.page_size)
            .ok_or_else(|| ConfigError::Invalid("page_size must be at least 1".into()))
    }

    pub fn catalog(&self) -> Catalog {
        match self.catalog {
            CatalogChoice::Countries => Catalog::Countries,
            CatalogChoice::Pokemon => Catalog::Pokemon {
                details: self.pokemon_details,
            },
            CatalogChoice::Jokes => Catalog::Jokes,
        }
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.catalog().default_base_url().to_string())
    }

    pub fn truncate_policy(&self) -> TruncatePolicy {
        match self.truncate {
            TruncateChoice::FixedLimit => TruncatePolicy::FixedLimit,
            TruncateChoice::RecordedCount => TruncatePolicy::RecordedCount,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn log_summary(&self) {
        explorer_info!(
            "Config: catalog={:?} base_url={} page_size={} truncate={:?}",
            self.catalog(),
            self.base_url(),
            self.page_size,
            self.truncate
        );
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn unspecified_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "(page_size: 10)");

        let config = ExplorerConfig::load(&path).unwrap();

        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.catalog(), Catalog::Countries);
        assert_eq!(config.base_url(), "https://restcountries.com");
    }

    #[test]
    fn file_values_are_read() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"(
                catalog: Pokemon,
                pokemon_details: true,
                page_size: 20,
                truncate: RecordedCount,
                request_timeout_ms: 5000,
            )"#,
        );

        let config = ExplorerConfig::load(&path).unwrap();

        assert_eq!(config.catalog(), Catalog::Pokemon { details: true });
        assert_eq!(config.page_size().unwrap().get(), 20);
        assert_eq!(config.truncate_policy(), TruncatePolicy::RecordedCount);
        assert_eq!(config.fetch_settings().request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn args_override_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "(catalog: Pokemon, page_size: 20)");
        let args = Args {
            config: Some(path),
            catalog: Some(CatalogChoice::Jokes),
            page_size: Some(5),
            base_url: Some("http://127.0.0.1:8080".to_string()),
            ..Args::default()
        };

        let config = ExplorerConfig::resolve(&args).unwrap();

        assert_eq!(config.catalog(), Catalog::Jokes);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn missing_explicit_config_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let args = Args {
            config: Some(dir.path().join("missing.ron")),
            ..Args::default()
        };
        assert!(matches!(
            ExplorerConfig::resolve(&args),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = ExplorerConfig::default();
        config.apply_args(&Args {
            page_size: Some(0),
            ..Args::default()
        });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "(catalog: Weather)");

        assert!(matches!(
            ExplorerConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
