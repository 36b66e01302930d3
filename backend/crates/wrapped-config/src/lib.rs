//! Environment configuration for the wrapped token tooling
//! Values come from the process environment, after loading `.env` if present

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TOKEN_NAME_KEY: &str = "WRAPPED_TOKEN_NAME";
pub const TOKEN_SYMBOL_KEY: &str = "WRAPPED_TOKEN_SYMBOL";
pub const MAX_CALL_DEPTH_KEY: &str = "WRAPPED_MAX_CALL_DEPTH";
pub const HOLDER_LAMPORTS_KEY: &str = "WRAPPED_HOLDER_LAMPORTS";
pub const LOG_KEY: &str = "WRAPPED_LOG";

pub const DEFAULT_HOLDER_LAMPORTS: u64 = 10_000_000_000; // 10 SOL
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must not be empty")]
    Empty { key: &'static str },

    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Token name override. The ledger default applies when unset
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    /// Nested frame limit for the in-process runtime
    pub max_call_depth: Option<usize>,
    /// Lamports given to every generated holder account
    pub holder_lamports: u64,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_name: None,
            token_symbol: None,
            max_call_depth: None,
            holder_lamports: DEFAULT_HOLDER_LAMPORTS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_call_depth = match lookup(MAX_CALL_DEPTH_KEY) {
            Some(value) => Some(parse_positive(MAX_CALL_DEPTH_KEY, &value)? as usize),
            None => None,
        };
        let holder_lamports = match lookup(HOLDER_LAMPORTS_KEY) {
            Some(value) => parse_positive(HOLDER_LAMPORTS_KEY, &value)?,
            None => defaults.holder_lamports,
        };

        Ok(Self {
            token_name: non_empty(TOKEN_NAME_KEY, lookup(TOKEN_NAME_KEY))?,
            token_symbol: non_empty(TOKEN_SYMBOL_KEY, lookup(TOKEN_SYMBOL_KEY))?,
            max_call_depth,
            holder_lamports,
            log_filter: lookup(LOG_KEY).unwrap_or(defaults.log_filter),
        })
    }
}

fn non_empty(key: &'static str, value: Option<String>) -> Result<Option<String>, ConfigError> {
    match value {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { key }),
        other => Ok(other),
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            expected: "a positive integer",
        }),
    }
}
