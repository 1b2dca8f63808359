use crate::config::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Description of a trained artifact, written next to `tokenizer.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub cfg_hash: String,
    pub created_at: String,
    pub algorithm: Algorithm,
    /// Configured vocabulary limit.
    pub vocab_size: usize,
    /// Actual vocabulary entries, special tokens included.
    pub token_count: usize,
}

/// Absolute locations of a trained artifact's files.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub tokenizer_json: PathBuf,
    pub manifest: PathBuf,
}
