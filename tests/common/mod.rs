#![allow(dead_code)]

use std::path::PathBuf;

use vidore::BgeM3Config;

/// Model directory for tests that need real BGE-M3 weights.
pub fn bge_m3_model_dir() -> Option<PathBuf> {
    std::env::var(BgeM3Config::ENV_MODEL_PATH)
        .ok()
        .map(PathBuf::from)
        .filter(|p| p.is_dir())
}

pub fn example_queries() -> Vec<&'static str> {
    vec!["what is X?"]
}

pub fn example_documents() -> Vec<&'static str> {
    vec!["X is a thing.", "Y is unrelated."]
}
