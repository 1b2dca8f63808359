//! Subword tokenizer training over the `tokenizers` crate.
//!
//! This crate exposes a stable, minimal surface for training and loading
//! the tokenizers compared in the study. A [`Config`] names the algorithm
//! (BPE, WordPiece or Unigram), the vocabulary size, the training inputs
//! and the artifact locations; [`train`] streams the corpus through the
//! corresponding library trainer, saves a bundled `tokenizer.json` plus a
//! manifest describing the run, and validates the result before returning.
//! [`load`] rebuilds a tokenizer from its saved artifacts.
//!
//! Each algorithm carries its canonical pre-tokenizer: byte-level for BPE,
//! whitespace for WordPiece, metaspace for Unigram. All three normalize
//! input to NFC so trained models agree with the sampled corpora.
//!
//! # Determinism
//!
//! Given identical inputs and configuration the trained artifact is
//! reproducible: corpus lines are fed in file order (the optional
//! memory-bounded shuffle is seeded), and the trainers themselves are
//! deterministic for a fixed input order.

pub mod config;
pub mod errors;

mod artifacts;
mod pretokenizer;
mod trainer;
mod types;
mod validate;

pub use artifacts::{load_tokenizer_from_json, read_manifest, resolve_paths};
pub use config::{Algorithm, ArtifactsCfg, Config, ModelCfg, TrainingCfg};
pub use errors::{Error, Result};
pub use types::{ArtifactManifest, ArtifactPaths};

pub fn train(cfg: &Config) -> Result<tokenizers::Tokenizer> {
    validate::validate_config(cfg)?;
    let tokenizer = trainer::train_from_corpus(cfg)?;
    validate::validate_tokenizer(&tokenizer, cfg)?;
    Ok(tokenizer)
}

pub fn load(cfg: &Config) -> Result<tokenizers::Tokenizer> {
    validate::validate_config(cfg)?;
    let paths = artifacts::resolve_paths(&cfg.artifacts);
    let tokenizer = artifacts::load_tokenizer_from_json(&paths.tokenizer_json)?;
    validate::validate_tokenizer(&tokenizer, cfg)?;
    Ok(tokenizer)
}
