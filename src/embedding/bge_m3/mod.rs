//! BGE-M3 encoder (XLM-RoBERTa + ColBERT head).
//!
//! One forward pass yields both outputs used by the retrievers:
//! the normalized CLS vector (dense retrieval) and the normalized
//! per-token ColBERT vectors (late interaction).
//!
//! Use [`BgeM3Config::stub`] for tests without model files. The stub hashes
//! each lowercase word into a fixed unit vector, so identical words always
//! match and MaxSim scores remain meaningful.

/// Encoder configuration.
pub mod config;
pub(crate) mod model;

#[cfg(test)]
mod tests;

pub use config::{BGE_M3_MAX_SEQ_LEN, BgeM3Config, REQUIRED_MODEL_FILES};

use std::sync::Arc;

use candle_core::{DType, Device, Tensor};
use half::f16;
use parking_lot::Mutex;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::types::{MultiVectorEmbedding, normalize_to_f16};
use crate::embedding::utils::load_batch_tokenizer;

use model::BgeM3Model;

/// Both representations of one encoded text.
#[derive(Debug, Clone)]
pub struct EncodedText {
    pub dense: Vec<f16>,
    pub colbert: MultiVectorEmbedding,
}

enum EncoderBackend {
    Model {
        model: Arc<Mutex<BgeM3Model>>,
        tokenizer: Arc<Tokenizer>,
        device: Device,
    },
    Stub,
    Released,
}

pub struct BgeM3Encoder {
    backend: EncoderBackend,
    config: BgeM3Config,
}

impl std::fmt::Debug for BgeM3Encoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BgeM3Encoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EncoderBackend::Stub => "Stub".to_string(),
                    EncoderBackend::Released => "Released".to_string(),
                },
            )
            .field("config", &self.config)
            .finish()
    }
}

impl BgeM3Encoder {
    pub fn load(config: BgeM3Config) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_dir) = config.model_dir.clone() else {
            warn!("BGE-M3 running in STUB mode (no model directory configured)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        };

        let device = select_device(config.device)?;
        debug!(?device, "Selected compute device for BGE-M3");

        let colbert_head =
            config
                .colbert_head_path()
                .ok_or_else(|| EmbeddingError::MissingModelFile {
                    dir: model_dir.clone(),
                    file: "colbert_linear.safetensors",
                })?;

        let model = BgeM3Model::load(&model_dir, &colbert_head, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BGE-M3 weights: {}", e),
            }
        })?;

        let tokenizer = load_batch_tokenizer(&model_dir, config.max_seq_len).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!(
            model_dir = %model_dir.display(),
            hidden_size = model.hidden_size(),
            num_layers = model.num_layers(),
            max_seq_len = config.max_seq_len,
            "BGE-M3 encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model: Arc::new(Mutex::new(model)),
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(BgeM3Config::stub())
    }

    /// Encodes `texts` in chunks of `batch_size`, preserving input order.
    pub fn encode(
        &self,
        texts: &[&str],
        batch_size: usize,
    ) -> Result<Vec<EncodedText>, EmbeddingError> {
        if batch_size == 0 {
            return Err(EmbeddingError::InvalidBatchSize);
        }
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(
            num_texts = texts.len(),
            batch_size = batch_size,
            "Encoding texts with BGE-M3"
        );

        let mut encoded = Vec::with_capacity(texts.len());
        for batch in texts.chunks(batch_size) {
            let out = match &self.backend {
                EncoderBackend::Model {
                    model,
                    tokenizer,
                    device,
                } => self.encode_batch_with_model(batch, model, tokenizer, device)?,
                EncoderBackend::Stub => batch.iter().map(|t| self.encode_stub(t)).collect(),
                EncoderBackend::Released => return Err(EmbeddingError::Released),
            };
            encoded.extend(out);
        }

        Ok(encoded)
    }

    fn encode_batch_with_model(
        &self,
        batch: &[&str],
        model: &Arc<Mutex<BgeM3Model>>,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<EncodedText>, EmbeddingError> {
        let encodings = tokenizer.encode_batch(batch.to_vec(), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let batch_len = encodings.len();
        let seq_len = encodings.iter().map(|e| e.len()).max().unwrap_or(0);
        if seq_len < 2 {
            return Err(EmbeddingError::TokenizationFailed {
                reason: format!("expected at least 2 tokens per text, got {seq_len}"),
            });
        }

        let mut ids = Vec::with_capacity(batch_len * seq_len);
        let mut mask = Vec::with_capacity(batch_len * seq_len);
        let mut token_counts = Vec::with_capacity(batch_len);
        for encoding in &encodings {
            ids.extend_from_slice(encoding.get_ids());
            mask.extend_from_slice(encoding.get_attention_mask());
            token_counts.push(encoding.get_attention_mask().iter().sum::<u32>() as usize);
        }

        let input_ids = Tensor::from_vec(ids, (batch_len, seq_len), device)?;
        let attention_mask = Tensor::from_vec(mask, (batch_len, seq_len), device)?;

        let output = model.lock().forward(&input_ids, &attention_mask).map_err(|e| {
            EmbeddingError::InferenceFailed {
                reason: format!("BGE-M3 forward pass failed: {}", e),
            }
        })?;

        let dense = output.dense.to_dtype(DType::F32)?.to_vec2::<f32>()?;
        let colbert = output.colbert.to_dtype(DType::F32)?.to_vec3::<f32>()?;

        let colbert_dim = output.colbert.dim(2)?;
        let encoded = dense
            .into_iter()
            .zip(colbert)
            .zip(token_counts)
            .map(|((dense, token_rows), tokens)| {
                // Rows after CLS that belong to real tokens.
                let keep = tokens.saturating_sub(1).max(1);
                EncodedText {
                    dense: normalize_to_f16(dense),
                    colbert: MultiVectorEmbedding::from_rows_normalized(
                        colbert_dim,
                        token_rows.into_iter().take(keep),
                    ),
                }
            })
            .collect();

        Ok(encoded)
    }

    fn encode_stub(&self, text: &str) -> EncodedText {
        let dim = self.config.stub_dim;
        let rows: Vec<Vec<f32>> = stub_words(text)
            .map(|word| stub_word_vector(&word, dim))
            .collect();

        let mut pooled = vec![0.0f32; dim];
        for row in &rows {
            for (acc, v) in pooled.iter_mut().zip(row) {
                *acc += v;
            }
        }

        let colbert = if rows.is_empty() {
            MultiVectorEmbedding::from_rows_normalized(dim, [vec![0.0; dim]])
        } else {
            MultiVectorEmbedding::from_rows_normalized(dim, rows)
        };

        EncodedText {
            dense: normalize_to_f16(pooled),
            colbert,
        }
    }

    /// Drops model weights. Subsequent `encode` calls fail with [`EmbeddingError::Released`].
    pub fn release(&mut self) {
        if !matches!(self.backend, EncoderBackend::Released) {
            info!("Releasing BGE-M3 encoder");
            self.backend = EncoderBackend::Released;
        }
    }

    /// Output vector size.
    pub fn dim(&self) -> usize {
        match &self.backend {
            EncoderBackend::Model { model, .. } => model.lock().hidden_size(),
            EncoderBackend::Stub | EncoderBackend::Released => self.config.stub_dim,
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    pub fn has_model(&self) -> bool {
        matches!(self.backend, EncoderBackend::Model { .. })
    }

    pub fn is_released(&self) -> bool {
        matches!(self.backend, EncoderBackend::Released)
    }

    pub fn config(&self) -> &BgeM3Config {
        &self.config
    }
}

fn stub_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn stub_word_vector(word: &str, dim: usize) -> Vec<f32> {
    let hash = blake3::hash(word.as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&hash.as_bytes()[..8]);
    let mut state = u64::from_le_bytes(seed);

    (0..dim)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}
