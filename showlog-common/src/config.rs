//! Configuration loading
//!
//! Priority order, highest first:
//! 1. Command-line argument (the server's clap layer also folds in `SHOWLOG_*` env vars)
//! 2. TOML config file
//! 3. Compiled default

use crate::stats::{MonthLocale, DEFAULT_TOP_N};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SHOWLOG_CONFIG";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub upload_dir: Option<PathBuf>,
    pub max_upload_bytes: Option<usize>,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[stats]` section
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub month_locale: MonthLocale,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            month_locale: MonthLocale::default(),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line (or through their env fallbacks)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub upload_dir: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
    pub stats: StatsConfig,
    pub logging: LoggingConfig,
}

impl ServerConfig {
    /// Merge command-line overrides over the TOML file over compiled defaults
    pub fn resolve(overrides: ConfigOverrides, file: TomlConfig) -> Self {
        let data_dir = default_data_dir();

        Self {
            bind_address: overrides
                .bind_address
                .or(file.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            database_path: overrides
                .database_path
                .or(file.database_path)
                .unwrap_or_else(|| data_dir.join("showlog.db")),
            upload_dir: overrides
                .upload_dir
                .or(file.upload_dir)
                .unwrap_or_else(|| data_dir.join("uploads")),
            max_upload_bytes: file.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            cors_origins: file.cors_origins,
            stats: file.stats,
            logging: file.logging,
        }
    }
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load the config file, returning it with the path it came from.
    ///
    /// An explicit path (argument or `SHOWLOG_CONFIG`) must exist. The
    /// platform default location is optional: when it is missing the
    /// compiled defaults are used and the returned path is `None`.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        if let Some(path) = explicit {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
            })?;
            return Ok((Self::parse(&content)?, Some(path)));
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)?;
                Ok((Self::parse(&content)?, Some(path)))
            }
            _ => Ok((Self::default(), None)),
        }
    }
}

/// Platform config file location (`~/.config/showlog/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("showlog").join("config.toml"))
}

/// Platform data directory holding the database and uploads
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("showlog"))
        .unwrap_or_else(|| PathBuf::from("./showlog_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::parse(
            r#"
            port = 8080
            database_path = "/srv/showlog/shows.db"
            upload_dir = "/srv/showlog/uploads"
            max_upload_bytes = 1024
            cors_origins = ["http://localhost:3002"]

            [stats]
            top_n = 5
            month_locale = "en"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, Some(8080));
        assert_eq!(config.max_upload_bytes, Some(1024));
        assert_eq!(config.cors_origins, vec!["http://localhost:3002"]);
        assert_eq!(config.stats.top_n, 5);
        assert_eq!(config.stats.month_locale, MonthLocale::En);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::parse("").unwrap();
        assert!(config.port.is_none());
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.stats.top_n, DEFAULT_TOP_N);
        assert_eq!(config.stats.month_locale, MonthLocale::Zh);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = TomlConfig::parse("prot = 1").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = TomlConfig {
            port: Some(4000),
            database_path: Some(PathBuf::from("/from/file.db")),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            port: Some(5000),
            ..Default::default()
        };

        let config = ServerConfig::resolve(overrides, file);
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_path, PathBuf::from("/from/file.db"));
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.upload_dir.ends_with("uploads"));
    }
}
