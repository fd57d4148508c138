use tracing::info;

use crate::config::Config;

use super::error::{RetrieverError, RetrieverResult};
use super::{BgeM3ColbertRetriever, BgeM3Retriever, Bm25Retriever, Retriever};

/// Canonical retriever names accepted by [`load_retriever`].
pub const RETRIEVER_NAMES: [&str; 3] = [
    BgeM3ColbertRetriever::NAME,
    BgeM3Retriever::NAME,
    Bm25Retriever::NAME,
];

/// Builds a retriever by name. Hub-style aliases (`BAAI/bge-m3`) are accepted
/// and matching is case-insensitive.
pub fn load_retriever(name: &str, config: &Config) -> RetrieverResult<Box<dyn Retriever>> {
    let normalized = name.trim().to_lowercase();
    let canonical = normalized.strip_prefix("baai/").unwrap_or(&normalized);

    let retriever: Box<dyn Retriever> = match canonical {
        BgeM3ColbertRetriever::NAME => Box::new(BgeM3ColbertRetriever::from_config(config)?),
        BgeM3Retriever::NAME => Box::new(BgeM3Retriever::from_config(config)?),
        Bm25Retriever::NAME => Box::new(Bm25Retriever::from_config(config)?),
        _ => {
            return Err(RetrieverError::UnknownRetriever {
                name: name.to_string(),
                known: RETRIEVER_NAMES.join(", "),
            });
        }
    };

    info!(name = retriever.name(), "Loaded retriever");
    Ok(retriever)
}
