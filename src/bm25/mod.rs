//! Lexical scoring (Okapi BM25).

pub mod config;
pub mod index;
pub mod tokenizer;


pub use config::Bm25Config;
pub use index::Bm25Index;
pub use tokenizer::{is_stop_word, tokenize, tokenize_all};
