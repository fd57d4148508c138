use crate::config::{ConfigError, env_f32};
use crate::constants::{DEFAULT_BM25_B, DEFAULT_BM25_EPSILON, DEFAULT_BM25_K1};

/// Okapi BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Config {
    /// Term-frequency saturation.
    pub k1: f32,
    /// Length normalization strength, in `[0, 1]`.
    pub b: f32,
    /// Floor for negative idf values, as a fraction of the mean idf.
    pub epsilon: f32,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self {
            k1: DEFAULT_BM25_K1,
            b: DEFAULT_BM25_B,
            epsilon: DEFAULT_BM25_EPSILON,
        }
    }
}

impl Bm25Config {
    pub const ENV_K1: &'static str = "VIDORE_BM25_K1";
    pub const ENV_B: &'static str = "VIDORE_BM25_B";
    pub const ENV_EPSILON: &'static str = "VIDORE_BM25_EPSILON";

    pub fn new(k1: f32, b: f32) -> Self {
        Self {
            k1,
            b,
            ..Default::default()
        }
    }

    /// Reads `VIDORE_BM25_*` overrides on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            k1: env_f32(Self::ENV_K1)?.unwrap_or(defaults.k1),
            b: env_f32(Self::ENV_B)?.unwrap_or(defaults.b),
            epsilon: env_f32(Self::ENV_EPSILON)?.unwrap_or(defaults.epsilon),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(ConfigError::InvalidBm25Param {
                name: "k1",
                value: self.k1,
                reason: "must be a non-negative number",
            });
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(ConfigError::InvalidBm25Param {
                name: "b",
                value: self.b,
                reason: "must be between 0.0 and 1.0",
            });
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::InvalidBm25Param {
                name: "epsilon",
                value: self.epsilon,
                reason: "must be a non-negative number",
            });
        }
        Ok(())
    }
}
