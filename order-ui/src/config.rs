//! `order-form.toml` loading.
//!
//! Every section and key is optional; a missing file means all defaults.
//!
//! ```toml
//! [sink]
//! url = "https://orders.example/hook"
//! verify_status = false
//! timeout_secs = 30
//!
//! [store]
//! backend = "sqlite"
//! connection_string = "order-form.db"
//! key = "solarOrderFormData"
//!
//! [catalog]
//! path = "kits.csv"
//!
//! [currency]
//! symbol = "₹"
//! grouping = "indian"
//!
//! [form]
//! reset_delay_ms = 3000
//!
//! [logging]
//! level = "info"
//! stderr = true
//! file = "order-form.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use order_core::calculations::{CurrencyFormat, DigitGrouping};
use order_core::db::{DEFAULT_SNAPSHOT_KEY, StoreConfig};
use order_core::form::SUCCESS_RESET_DELAY;
use order_sink_http::{DEFAULT_TIMEOUT, HttpSinkConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub sink: SinkSection,
    pub store: StoreSection,
    pub catalog: CatalogSection,
    pub currency: CurrencySection,
    pub form: FormSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkSection {
    pub url: Option<String>,
    pub verify_status: bool,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub backend: String,
    pub connection_string: String,
    pub key: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        let store = StoreConfig::default();
        Self {
            backend: store.backend,
            connection_string: store.connection_string,
            key: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurrencySection {
    pub symbol: String,
    pub grouping: DigitGrouping,
}

impl Default for CurrencySection {
    fn default() -> Self {
        let currency = CurrencyFormat::default();
        Self {
            symbol: currency.symbol,
            grouping: currency.grouping,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormSection {
    pub reset_delay_ms: u64,
}

impl Default for FormSection {
    fn default() -> Self {
        Self {
            reset_delay_ms: SUCCESS_RESET_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub stderr: bool,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: None,
            stderr: true,
            file: None,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub sink_url: Option<String>,
    pub backend: Option<String>,
    pub db: Option<String>,
    pub catalog: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl AppConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Reads `path`, or returns defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn apply(
        &mut self,
        overrides: Overrides,
    ) {
        if let Some(url) = overrides.sink_url {
            self.sink.url = Some(url);
        }
        if let Some(backend) = overrides.backend {
            self.store.backend = backend;
        }
        if let Some(db) = overrides.db {
            self.store.connection_string = db;
        }
        if let Some(path) = overrides.catalog {
            self.catalog.path = Some(path);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = Some(level);
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.store.backend.clone(),
            connection_string: self.store.connection_string.clone(),
        }
    }

    /// `None` when no sink URL is configured.
    pub fn sink_config(&self) -> Option<HttpSinkConfig> {
        let url = self.sink.url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        Some(HttpSinkConfig {
            url: url.to_string(),
            verify_status: self.sink.verify_status,
            timeout: self
                .sink
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        })
    }

    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat {
            symbol: self.currency.symbol.clone(),
            grouping: self.currency.grouping,
        }
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.form.reset_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store.backend, "sqlite");
        assert_eq!(config.store.key, "solarOrderFormData");
        assert_eq!(config.reset_delay(), Duration::from_secs(3));
        assert_eq!(config.currency_format(), CurrencyFormat::default());
        assert!(config.sink_config().is_none());
    }

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn unreadable_path_is_a_read_error() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn full_file_parses() {
        let config = AppConfig::from_toml(
            r#"
            [sink]
            url = "https://orders.example/hook"
            verify_status = true
            timeout_secs = 5

            [store]
            backend = "memory"

            [currency]
            symbol = "Rs "
            grouping = "thousands"

            [form]
            reset_delay_ms = 500

            [logging]
            level = "debug"
            stderr = false
            "#,
        )
        .unwrap();

        let sink = config.sink_config().unwrap();
        assert_eq!(sink.url, "https://orders.example/hook");
        assert!(sink.verify_status);
        assert_eq!(sink.timeout, Duration::from_secs(5));
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.connection_string, "order-form.db");
        assert_eq!(config.currency.grouping, DigitGrouping::Thousands);
        assert_eq!(config.reset_delay(), Duration::from_millis(500));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert!(!config.logging.stderr);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = AppConfig::from_toml("[sink]\nendpoint = \"x\"\n");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn blank_sink_url_counts_as_unset() {
        let config = AppConfig::from_toml("[sink]\nurl = \"  \"\n").unwrap();

        assert!(config.sink_config().is_none());
    }

    #[test]
    fn overrides_win_over_file() {
        let mut config = AppConfig::from_toml("[store]\nbackend = \"sqlite\"\n").unwrap();

        config.apply(Overrides {
            sink_url: Some("http://localhost:9000".to_string()),
            backend: Some("memory".to_string()),
            db: Some(":memory:".to_string()),
            catalog: Some(PathBuf::from("kits.csv")),
            log_level: None,
        });

        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.connection_string, ":memory:");
        assert_eq!(config.catalog.path, Some(PathBuf::from("kits.csv")));
        assert_eq!(
            config.sink_config().map(|s| s.url),
            Some("http://localhost:9000".to_string())
        );
        assert_eq!(config.logging.level, None);
    }
}
