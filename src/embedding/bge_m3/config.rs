use std::path::PathBuf;

use crate::config::{ConfigError, env_usize};
use crate::embedding::device::DevicePreference;
use crate::embedding::error::EmbeddingError;

/// Default max sequence length for BGE-M3.
pub const BGE_M3_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

/// Files that must be present in a BGE-M3 model directory.
pub const REQUIRED_MODEL_FILES: [&str; 3] = ["config.json", "model.safetensors", "tokenizer.json"];

#[derive(Debug, Clone)]
/// Configuration for [`BgeM3Encoder`](super::BgeM3Encoder).
pub struct BgeM3Config {
    /// Model directory. `None` selects the deterministic stub backend.
    pub model_dir: Option<PathBuf>,
    /// Tokens kept per text (longer inputs are truncated).
    pub max_seq_len: usize,
    /// Vector size produced by the stub backend.
    pub stub_dim: usize,
    /// Compute backend for the model.
    pub device: DevicePreference,
}

impl Default for BgeM3Config {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_seq_len: BGE_M3_MAX_SEQ_LEN,
            stub_dim: crate::constants::STUB_EMBEDDING_DIM,
            device: DevicePreference::default(),
        }
    }
}

impl BgeM3Config {
    /// Env var pointing at the model directory.
    pub const ENV_MODEL_PATH: &'static str = "VIDORE_BGE_M3_PATH";
    /// Env var overriding the truncation length.
    pub const ENV_MAX_SEQ_LEN: &'static str = "VIDORE_MAX_SEQ_LEN";

    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn with_device(mut self, device: DevicePreference) -> Self {
        self.device = device;
        self
    }

    /// Reads `VIDORE_*` overrides. Unset or blank model path means stub mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let model_dir = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let max_seq_len = env_usize(Self::ENV_MAX_SEQ_LEN)?.unwrap_or(BGE_M3_MAX_SEQ_LEN);

        let device = match std::env::var(DevicePreference::ENV_VAR) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: DevicePreference::ENV_VAR,
                value,
                expected: "auto, cpu, cuda or metal",
            })?,
            Err(_) => DevicePreference::default(),
        };

        Ok(Self {
            model_dir,
            max_seq_len,
            device,
            ..Default::default()
        })
    }

    pub fn is_stub(&self) -> bool {
        self.model_dir.is_none()
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len < 2 {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!("max_seq_len must be at least 2, got {}", self.max_seq_len),
            });
        }

        let Some(dir) = &self.model_dir else {
            if self.stub_dim == 0 {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "stub_dim must be non-zero".to_string(),
                });
            }
            return Ok(());
        };

        if dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir cannot be empty when provided".to_string(),
            });
        }

        if !dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound { path: dir.clone() });
        }

        for file in REQUIRED_MODEL_FILES {
            if !dir.join(file).exists() {
                return Err(EmbeddingError::MissingModelFile {
                    dir: dir.clone(),
                    file,
                });
            }
        }

        if self.colbert_head_path().is_none() {
            return Err(EmbeddingError::MissingModelFile {
                dir: dir.clone(),
                file: "colbert_linear.safetensors",
            });
        }

        Ok(())
    }

    /// Locates the ColBERT projection weights (safetensors preferred over the torch pickle).
    pub fn colbert_head_path(&self) -> Option<PathBuf> {
        let dir = self.model_dir.as_ref()?;
        ["colbert_linear.safetensors", "colbert_linear.pt"]
            .into_iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
    }
}
