//! Encoder + model utilities.
//!
//! - [`bge_m3`] produces dense and ColBERT embeddings.
//! - [`types`] holds the embedding representations consumed by [`crate::scoring`].

/// BGE-M3 encoder.
pub mod bge_m3;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Embedding representations.
pub mod types;
/// Tokenizer loading helpers.
pub mod utils;

pub use device::DevicePreference;
pub use error::EmbeddingError;

pub use bge_m3::{BGE_M3_MAX_SEQ_LEN, BgeM3Config, BgeM3Encoder, EncodedText};
pub use types::{Embedding, MultiVectorEmbedding, normalize_to_f16};
