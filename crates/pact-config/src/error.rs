use std::{error::Error as StdError, io};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable \"{0}\" is missing or not valid unicode")]
    MissingOrInvalid(String),

    #[error("environment variable \"{key}\" could not be parsed: {source}")]
    StringParse {
        key: String,
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("malformed config file: {0}")]
    Toml(#[from] toml::de::Error),
}
