//! Configuration loading for the recommender tools
//!
//! Values are read from environment variables with the `RECSYS_` prefix,
//! optionally seeded from a `.env` file. Command-line flags take precedence
//! over anything loaded here.
//!
//! # Example
//!
//! ```no_run
//! use recsys_core::config::{load_dotenv, ConfigLoader, EngineConfig};
//!
//! # fn example() -> Result<(), recsys_core::RecsysError> {
//! load_dotenv();
//!
//! let config = EngineConfig::from_env()?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::RecsysError;
use crate::observability::{LogConfig, LogFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const ENV_DATASET: &str = "RECSYS_DATASET";
pub const ENV_TOP_K: &str = "RECSYS_TOP_K";
pub const ENV_DUPLICATE_THRESHOLD: &str = "RECSYS_DUPLICATE_THRESHOLD";
pub const ENV_LOG_LEVEL: &str = "RECSYS_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "RECSYS_LOG_FORMAT";

/// Configuration loader trait
///
/// Provides standardized methods for loading and validating configuration
/// from environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a variable is set but cannot be parsed.
    fn from_env() -> Result<Self, RecsysError>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any validation check fails.
    fn validate(&self) -> Result<(), RecsysError>;
}

/// Recommendation engine settings
///
/// # Environment Variables
///
/// - `RECSYS_DATASET` (optional): path to a JSON rating dataset
/// - `RECSYS_TOP_K` (optional): number of recommendations per user (default: 2)
/// - `RECSYS_DUPLICATE_THRESHOLD` (optional): similarity at or above which two
///   items count as duplicates (default: 0.999)
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub dataset: Option<PathBuf>,
    pub top_k: usize,
    pub duplicate_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            top_k: 2,
            duplicate_threshold: 0.999,
        }
    }
}

impl ConfigLoader for EngineConfig {
    fn from_env() -> Result<Self, RecsysError> {
        let defaults = EngineConfig::default();

        let dataset = std::env::var(ENV_DATASET)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            dataset,
            top_k: parse_env_var(ENV_TOP_K, defaults.top_k)?,
            duplicate_threshold: parse_env_var(
                ENV_DUPLICATE_THRESHOLD,
                defaults.duplicate_threshold,
            )?,
        })
    }

    fn validate(&self) -> Result<(), RecsysError> {
        if self.top_k == 0 {
            return Err(RecsysError::configuration(
                "top_k must be greater than 0",
                ENV_TOP_K,
            ));
        }

        if !(self.duplicate_threshold > 0.0 && self.duplicate_threshold <= 1.0) {
            return Err(RecsysError::configuration(
                format!(
                    "duplicate_threshold must be in (0, 1], got {}",
                    self.duplicate_threshold
                ),
                ENV_DUPLICATE_THRESHOLD,
            ));
        }

        if let Some(path) = &self.dataset {
            if !path.exists() {
                return Err(RecsysError::configuration(
                    format!("dataset {} does not exist", path.display()),
                    ENV_DATASET,
                ));
            }
        }

        Ok(())
    }
}

/// # Environment Variables
///
/// - `RECSYS_LOG_LEVEL` (optional): default filter directive (default: info)
/// - `RECSYS_LOG_FORMAT` (optional): `pretty` or `json` (default: pretty)
impl ConfigLoader for LogConfig {
    fn from_env() -> Result<Self, RecsysError> {
        let defaults = LogConfig::default();

        let level = std::env::var(ENV_LOG_LEVEL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.level);

        let format = parse_env_var::<LogFormat>(ENV_LOG_FORMAT, defaults.format)?;

        Ok(Self { level, format })
    }

    /// Rejects a level that is not a valid filter directive
    fn validate(&self) -> Result<(), RecsysError> {
        EnvFilter::try_new(&self.level).map_err(|e| {
            RecsysError::configuration(
                format!("Invalid log level '{}': {}", self.level, e),
                ENV_LOG_LEVEL,
            )
        })?;
        Ok(())
    }
}

/// Parse environment variable with type conversion and default value
fn parse_env_var<T>(key: &str, default: T) -> Result<T, RecsysError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| RecsysError::configuration(format!("Failed to parse {}: {}", key, e), key))
        })
        .unwrap_or(Ok(default))
}

/// Load .env file if present
///
/// A missing file is not an error.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}
