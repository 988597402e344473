use std::env::{self, VarError};
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::ConfigError;
use serde::de::DeserializeOwned;

pub struct Config;

impl Config {
    pub fn from_env<T>(key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: StdError + Send + Sync + 'static,
    {
        let value_str: String = env::var(key).map_err(|_| ConfigError::MissingOrInvalid(key.into()))?;
        Self::parse(key, &value_str)
    }

    /// Like [`Config::from_env`], but an unset variable yields `default`.
    /// A set variable that fails to parse is still an error.
    pub fn from_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: StdError + Send + Sync + 'static,
    {
        match env::var(key) {
            Ok(value_str) => Self::parse(key, &value_str),
            Err(VarError::NotPresent) => Ok(default),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::MissingOrInvalid(key.into())),
        }
    }

    pub fn from_file<T, P>(path: P) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let content: String = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str<T>(content: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        let config: T = toml::from_str(content)?;
        Ok(config)
    }

    fn parse<T>(key: &str, value_str: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: StdError + Send + Sync + 'static,
    {
        value_str.trim().parse::<T>().map_err(|e: <T as FromStr>::Err| ConfigError::StringParse {
            key: key.into(),
            source: Box::new(e),
        })
    }
}
