//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `VIDORE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;

use crate::bm25::Bm25Config;
use crate::constants::{DEFAULT_BATCH_DOC, DEFAULT_BATCH_QUERY, DEFAULT_SCORE_BATCH_SIZE};
use crate::embedding::BgeM3Config;

/// Retriever and evaluation settings.
///
/// Use [`Config::from_env`] to read `VIDORE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// BGE-M3 encoder settings (`VIDORE_BGE_M3_PATH`, `VIDORE_MAX_SEQ_LEN`).
    pub bge_m3: BgeM3Config,

    /// BM25 parameters (`VIDORE_BM25_*`).
    pub bm25: Bm25Config,

    /// Queries scored per MaxSim chunk. Default: `128`.
    pub score_batch_size: usize,

    /// Queries encoded per forward pass during evaluation. Default: `4`.
    pub batch_query: usize,

    /// Documents encoded per forward pass during evaluation. Default: `4`.
    pub batch_doc: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bge_m3: BgeM3Config::default(),
            bm25: Bm25Config::default(),
            score_batch_size: DEFAULT_SCORE_BATCH_SIZE,
            batch_query: DEFAULT_BATCH_QUERY,
            batch_doc: DEFAULT_BATCH_DOC,
        }
    }
}

impl Config {
    const ENV_SCORE_BATCH_SIZE: &'static str = "VIDORE_SCORE_BATCH_SIZE";
    const ENV_BATCH_QUERY: &'static str = "VIDORE_BATCH_QUERY";
    const ENV_BATCH_DOC: &'static str = "VIDORE_BATCH_DOC";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            bge_m3: BgeM3Config::from_env()?,
            bm25: Bm25Config::from_env()?,
            score_batch_size: Self::parse_batch_from_env(
                Self::ENV_SCORE_BATCH_SIZE,
                defaults.score_batch_size,
            )?,
            batch_query: Self::parse_batch_from_env(Self::ENV_BATCH_QUERY, defaults.batch_query)?,
            batch_doc: Self::parse_batch_from_env(Self::ENV_BATCH_DOC, defaults.batch_doc)?,
        })
    }

    /// Validates batch sizes, BM25 parameters and the model directory (if any).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            (Self::ENV_SCORE_BATCH_SIZE, self.score_batch_size),
            (Self::ENV_BATCH_QUERY, self.batch_query),
            (Self::ENV_BATCH_DOC, self.batch_doc),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroBatchSize { name });
            }
        }

        self.bm25.validate()?;

        if let Some(ref path) = self.bge_m3.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    fn parse_batch_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env_usize(name)? {
            Some(0) => Err(ConfigError::ZeroBatchSize { name }),
            Some(parsed) => Ok(parsed),
            None => Ok(default),
        }
    }
}

/// Reads an integer variable. `Ok(None)` when unset.
pub(crate) fn env_usize(name: &'static str) -> Result<Option<usize>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::IntParseError {
                name,
                value: value.clone(),
                source: e,
            }),
        Err(_) => Ok(None),
    }
}

/// Reads a float variable. `Ok(None)` when unset.
pub(crate) fn env_f32(name: &'static str) -> Result<Option<f32>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::FloatParseError {
                name,
                value: value.clone(),
                source: e,
            }),
        Err(_) => Ok(None),
    }
}
