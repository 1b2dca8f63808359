use crate::config::{Algorithm, Config};
use crate::errors::{Error, Result};
use std::collections::HashSet;
use std::path::Path;
use tokenizers::Tokenizer;

pub fn validate_config(cfg: &Config) -> Result<()> {
    if cfg.model.vocab_size == 0 {
        return Err(Error::Validation(
            "model.vocab_size must be greater than zero".into(),
        ));
    }

    if cfg.model.min_frequency < 1 {
        return Err(Error::Validation(
            "model.min_frequency must be at least 1".into(),
        ));
    }

    if cfg.model.algorithm == Algorithm::Bpe && cfg.model.vocab_size < 256 {
        return Err(Error::Validation(format!(
            "byte-level BPE needs room for the byte alphabet; vocab_size {} is below 256",
            cfg.model.vocab_size
        )));
    }

    let mut seen = HashSet::new();
    for token in &cfg.model.special_tokens {
        if !seen.insert(token) {
            return Err(Error::Validation(format!(
                "special token '{token}' appears multiple times"
            )));
        }
    }

    match cfg.model.algorithm {
        Algorithm::Wordpiece | Algorithm::Unigram => {
            let unk = cfg.model.unk_token.as_deref().ok_or_else(|| {
                Error::Validation(format!(
                    "{} requires model.unk_token",
                    cfg.model.algorithm
                ))
            })?;
            if !cfg.model.special_tokens.iter().any(|t| t == unk) {
                return Err(Error::Validation(format!(
                    "unk token '{unk}' must be listed in model.special_tokens"
                )));
            }
        }
        Algorithm::Bpe => {}
    }

    ensure_directory_creatable(cfg.artifacts.dir.as_path())
}

pub fn validate_tokenizer(tok: &Tokenizer, cfg: &Config) -> Result<()> {
    for token in &cfg.model.special_tokens {
        if tok.token_to_id(token).is_none() {
            return Err(Error::Validation(format!(
                "expected special token '{token}' to be present in tokenizer vocab"
            )));
        }
    }

    let actual_size = tok.get_vocab_size(true);
    if actual_size > cfg.model.vocab_size {
        return Err(Error::Validation(format!(
            "tokenizer vocab size {actual_size} exceeds configured limit {}",
            cfg.model.vocab_size
        )));
    }

    Ok(())
}

fn ensure_directory_creatable(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    if dir.exists() {
        return Err(Error::Validation(format!(
            "artifact directory path '{}' exists but is not a directory",
            dir.display()
        )));
    }

    if let Some(parent) = dir.parent() {
        if parent.as_os_str().is_empty() || parent.is_dir() {
            return Ok(());
        }
        if parent.exists() {
            return Err(Error::Validation(format!(
                "artifact directory parent '{}' is not a directory",
                parent.display()
            )));
        }
        return Err(Error::Validation(format!(
            "artifact directory parent '{}' does not exist",
            parent.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArtifactsCfg, ModelCfg, TrainingCfg};
    use std::path::PathBuf;

    fn config(algorithm: Algorithm) -> Config {
        Config {
            model: ModelCfg {
                algorithm,
                vocab_size: 500,
                min_frequency: 2,
                special_tokens: vec!["<unk>".to_string(), "<pad>".to_string()],
                unk_token: Some("<unk>".to_string()),
            },
            training: TrainingCfg {
                inputs: vec![PathBuf::from("corpus.txt")],
                seed: 42,
                shuffle: false,
                max_lines: None,
                num_threads: None,
            },
            artifacts: ArtifactsCfg {
                dir: PathBuf::from("."),
                tokenizer_json: PathBuf::from("tokenizer.json"),
                manifest: PathBuf::from("manifest.json"),
            },
        }
    }

    #[test]
    fn accepts_well_formed_config() {
        assert!(validate_config(&config(Algorithm::Wordpiece)).is_ok());
    }

    #[test]
    fn rejects_zero_vocab() {
        let mut cfg = config(Algorithm::Wordpiece);
        cfg.model.vocab_size = 0;
        assert!(matches!(
            validate_config(&cfg),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn rejects_bpe_vocab_below_byte_alphabet() {
        let mut cfg = config(Algorithm::Bpe);
        cfg.model.vocab_size = 100;
        assert!(matches!(
            validate_config(&cfg),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn wordpiece_and_unigram_require_unk() {
        for algorithm in [Algorithm::Wordpiece, Algorithm::Unigram] {
            let mut cfg = config(algorithm);
            cfg.model.unk_token = None;
            assert!(matches!(
                validate_config(&cfg),
                Err(Error::Validation(_))
            ));
        }
    }

    #[test]
    fn unk_must_be_a_special_token() {
        let mut cfg = config(Algorithm::Unigram);
        cfg.model.unk_token = Some("<oov>".to_string());
        assert!(matches!(
            validate_config(&cfg),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn rejects_duplicate_special_tokens() {
        let mut cfg = config(Algorithm::Bpe);
        cfg.model.special_tokens.push("<pad>".to_string());
        assert!(matches!(
            validate_config(&cfg),
            Err(Error::Validation(_))
        ));
    }
}
