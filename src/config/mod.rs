// Required external crates for configuration management and serialization
use std::error::Error;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::report::Verbosity;

/// Configuration for status and error reporting
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReportConfig {
    /// Reporting verbosity (quiet, summary, full); each tool keeps its
    /// own built-in default when unset
    #[serde(default)]
    pub verbosity: Option<String>,
    /// Whether a caught conversion failure exits non-zero
    #[serde(default)]
    pub strict_exit: bool,
}

/// Configuration for application logging
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional directory for rolling log files; console-only when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

/// Main settings struct that contains all configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    /// Reporting-related settings
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging-related settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Loads settings from multiple sources in order of precedence
    /// (highest to lowest):
    /// 1. Environment variables prefixed with MCONV_, nested keys
    ///    joined with a double underscore (MCONV_REPORT__STRICT_EXIT)
    /// 2. Local config file (config/local.toml) if present
    /// 3. Default config file (config/default.toml) if present
    ///
    /// Unlike a long-running service these tools must work from a bare
    /// checkout, so every file is optional and every field defaulted.
    /// Input and output paths are compile-time constants in each binary
    /// and are deliberately not configurable here.
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::current_dir()
            .map_err(|e| ConfigError::Message(format!("Failed to get current directory: {}", e)))?
            .join("config");

        let settings = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // A single-underscore separator would split strict_exit into
            // strict.exit, so nesting uses a double underscore.
            .add_source(
                Environment::with_prefix("MCONV")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        // Validate settings after loading
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(verbosity) = self.report.verbosity.as_deref() {
            if Verbosity::parse(verbosity).is_none() {
                return Err(ConfigError::Message(format!(
                    "Invalid verbosity: {}. Must be one of: quiet, summary, full",
                    verbosity
                )));
            }
        }

        match self.logging.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            _ => Err(ConfigError::Message(format!(
                "Invalid logging level: {}. Must be one of: error, warn, info, debug, trace",
                self.logging.level
            ))),
        }
    }
}

/// Initialize the tracing subscriber: console on stderr, plus a daily
/// rolling file appender when a log directory is configured.
///
/// The returned guard must be held for the lifetime of the process so
/// buffered log lines are flushed on exit.
pub fn init_tracing(settings: &Settings) -> Result<Option<WorkerGuard>, Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));

    if let Some(directory) = &settings.logging.directory {
        std::fs::create_dir_all(directory)?;
        let appender = tracing_appender::rolling::daily(directory, "mconv");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(non_blocking)
            // Disable ANSI colors for cleaner log files
            .with_ansi(false)
            .with_target(false)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let settings = Settings::default();
        assert!(settings.report.verbosity.is_none());
        assert!(!settings.report.strict_exit);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_verbosity() {
        let settings = Settings {
            report: ReportConfig {
                verbosity: Some("loud".to_string()),
                strict_exit: false,
            },
            logging: LoggingConfig::default(),
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_env_overrides_reach_nested_keys() {
        let vars: std::collections::HashMap<String, String> = [
            ("MCONV_REPORT__STRICT_EXIT".to_string(), "true".to_string()),
            ("MCONV_REPORT__VERBOSITY".to_string(), "quiet".to_string()),
            ("MCONV_LOGGING__LEVEL".to_string(), "debug".to_string()),
        ]
        .into_iter()
        .collect();

        let settings: Settings = Config::builder()
            .add_source(
                Environment::with_prefix("MCONV")
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(vars)),
            )
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(settings.report.strict_exit);
        assert_eq!(settings.report.verbosity.as_deref(), Some("quiet"));
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let settings = Settings {
            report: ReportConfig::default(),
            logging: LoggingConfig {
                level: "verbose".to_string(),
                directory: None,
            },
        };
        assert!(settings.validate().is_err());
    }
}
