use std::fmt::{self, Display};
use std::str::FromStr;

use pact_config::{Config, ConfigError};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("unknown log format \"{0}\", expected full, compact or pretty")]
    UnknownFormat(String),

    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInitialized(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(LoggingError::UnknownFormat(s.to_owned())),
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// An `EnvFilter` directive such as `info` or `pact_router=debug,info`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.into(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingOptions {
    /// Reads `LOG_LEVEL` and `LOG_FORMAT`, keeping defaults for unset variables.
    pub fn from_env() -> Result<Self, LoggingError> {
        let level: String = Config::from_env_or("LOG_LEVEL", DEFAULT_LEVEL.to_owned())?;
        let format: String = Config::from_env_or("LOG_FORMAT", LogFormat::default().to_string())?;

        Ok(Self {
            level,
            format: format.parse()?,
        })
    }

    fn filter(&self) -> Result<EnvFilter, LoggingError> {
        Ok(EnvFilter::try_new(&self.level)?)
    }
}

pub fn init_logger(options: &LoggingOptions) -> Result<(), LoggingError> {
    let filter: EnvFilter = options.filter()?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match options.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
    .map_err(|e: Box<dyn std::error::Error + Send + Sync>| LoggingError::AlreadyInitialized(e.to_string()))?;

    debug!(level = %options.level, format = %options.format, "logger initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parses_case_insensitively() {
        assert_eq!("Compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("PRETTY".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!(matches!("json".parse::<LogFormat>(), Err(LoggingError::UnknownFormat(f)) if f == "json"));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: LoggingOptions = Config::from_toml_str("format = \"compact\"").unwrap();

        assert_eq!(options.level, "info");
        assert_eq!(options.format, LogFormat::Compact);
    }

    #[test]
    fn test_invalid_filter_is_rejected_before_install() {
        let options: LoggingOptions = LoggingOptions {
            level: "pact_router=loud".into(),
            format: LogFormat::Full,
        };

        assert!(matches!(init_logger(&options), Err(LoggingError::Filter(_))));
    }

    #[test]
    fn test_second_install_reports_existing_subscriber() {
        let options: LoggingOptions = LoggingOptions::default();
        let _ = init_logger(&options);

        assert!(matches!(init_logger(&options), Err(LoggingError::AlreadyInitialized(_))));
    }
}
