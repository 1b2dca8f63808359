use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use tokenizer::errors::Result;
use tokenizer::{
    load, read_manifest, resolve_paths, train, Algorithm, ArtifactsCfg, Config, Error,
    ModelCfg, TrainingCfg,
};
use tokenizers::Tokenizer;

const CORPUS_LINES: [&str; 16] = [
    "the quick brown fox jumps over the lazy dog",
    "subword units share structure across languages",
    "habari ya dunia hii ni sentensi fupi",
    "merhaba dünya bu kısa bir cümle",
    "наши модели учатся на сбалансированных данных",
    "यह एक छोटा वाक्य है",
    "これは短い文です",
    "balanced corpora keep every language in proportion",
    "tokenization quality differs across scripts",
    "frequency counts drive merge decisions",
    "likelihood guides wordpiece merges instead",
    "unigram pruning keeps probable segments",
    "evaluation texts are held out from training",
    "vocabulary budgets bind before convergence here",
    "short sentences still cover the alphabet",
    "the lazy dog naps while the fox runs again",
];

const SAMPLE_INPUTS: [&str; 4] = [
    "the quick brown fox",
    "balanced corpora keep proportion",
    "merhaba dünya",
    "unigram pruning keeps probable segments",
];

#[test]
fn bpe_roundtrips_and_respects_vocab_limit() -> Result<()> {
    let tmp = tmp_dir("bpe")?;
    let cfg = config(&tmp, Algorithm::Bpe, 400)?;
    let tok = train(&cfg)?;

    assert!(tok.get_vocab_size(true) <= 400);
    for token in &cfg.model.special_tokens {
        assert!(tok.token_to_id(token).is_some(), "missing special {token}");
    }

    let text = "the quick brown fox";
    let encoding = tok.encode(text, false)?;
    assert!(!encoding.get_ids().is_empty());
    let decoded = tok.decode(encoding.get_ids(), true)?;
    assert_eq!(decoded, text);

    Ok(())
}

#[test]
fn wordpiece_trains_within_vocab_limit() -> Result<()> {
    let tmp = tmp_dir("wordpiece")?;
    let cfg = config(&tmp, Algorithm::Wordpiece, 300)?;
    let tok = train(&cfg)?;

    assert!(tok.get_vocab_size(true) <= 300);
    assert!(tok.token_to_id("<unk>").is_some());

    let encoding = tok.encode("frequency counts drive merge decisions", false)?;
    assert!(!encoding.get_ids().is_empty());
    let unk_id = tok.token_to_id("<unk>").expect("<unk> id exists");
    assert!(
        encoding.get_ids().iter().all(|&id| id != unk_id),
        "words seen in training should not map to <unk>"
    );

    Ok(())
}

#[test]
fn unigram_trains_within_vocab_limit() -> Result<()> {
    let tmp = tmp_dir("unigram")?;
    let cfg = config(&tmp, Algorithm::Unigram, 300)?;
    let tok = train(&cfg)?;

    assert!(tok.get_vocab_size(true) <= 300);
    let encoding = tok.encode("evaluation texts are held out", false)?;
    assert!(!encoding.get_ids().is_empty());

    Ok(())
}

#[test]
fn training_is_reproducible() -> Result<()> {
    for algorithm in Algorithm::all() {
        let first = train(&config(&tmp_dir("repro-a")?, algorithm, 320)?)?;
        let second = train(&config(&tmp_dir("repro-b")?, algorithm, 320)?)?;
        assert_tokenizers_equivalent(&first, &second, &SAMPLE_INPUTS)?;
    }
    Ok(())
}

#[test]
fn reloaded_artifact_is_equivalent() -> Result<()> {
    let tmp = tmp_dir("reload")?;
    let cfg = config(&tmp, Algorithm::Bpe, 400)?;
    let trained = train(&cfg)?;
    let reloaded = load(&cfg)?;
    assert_tokenizers_equivalent(&trained, &reloaded, &SAMPLE_INPUTS)?;
    Ok(())
}

#[test]
fn manifest_describes_the_run() -> Result<()> {
    let tmp = tmp_dir("manifest")?;
    let cfg = config(&tmp, Algorithm::Unigram, 300)?;
    let tok = train(&cfg)?;

    let paths = resolve_paths(&cfg.artifacts);
    assert!(paths.tokenizer_json.is_file());

    let manifest = read_manifest(&paths.manifest)?;
    assert!(!manifest.cfg_hash.trim().is_empty());
    assert!(manifest.created_at.starts_with("unix:"));
    assert_eq!(manifest.algorithm, Algorithm::Unigram);
    assert_eq!(manifest.vocab_size, 300);
    assert_eq!(manifest.token_count, tok.get_vocab_size(true));

    Ok(())
}

#[test]
fn missing_training_input_is_reported() -> Result<()> {
    let tmp = tmp_dir("missing-input")?;
    let mut cfg = config(&tmp, Algorithm::Bpe, 400)?;
    cfg.training.inputs = vec![tmp.join("does-not-exist.txt")];

    match train(&cfg) {
        Err(Error::Artifact(message)) => {
            assert!(message.contains("does-not-exist.txt"));
        }
        Err(other) => panic!("expected artifact error, got {other}"),
        Ok(_) => panic!("expected artifact error, got a tokenizer"),
    }
    Ok(())
}

#[test]
fn wordpiece_without_unk_is_rejected() -> Result<()> {
    let tmp = tmp_dir("no-unk")?;
    let mut cfg = config(&tmp, Algorithm::Wordpiece, 300)?;
    cfg.model.unk_token = None;

    assert!(matches!(train(&cfg), Err(Error::Validation(_))));
    Ok(())
}

fn assert_tokenizers_equivalent(
    tok1: &Tokenizer,
    tok2: &Tokenizer,
    samples: &[&str],
) -> Result<()> {
    for &sample in samples {
        let enc1 = tok1.encode(sample, false)?;
        let enc2 = tok2.encode(sample, false)?;
        assert_eq!(enc1.get_ids(), enc2.get_ids(), "mismatch on '{sample}'");
    }
    Ok(())
}

fn tmp_dir(label: &str) -> Result<PathBuf> {
    let pid = process::id();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Validation(format!("time went backwards: {e}")))?
        .as_nanos();
    let path = PathBuf::from("target")
        .join("tokenizer_tests")
        .join(format!("{label}_{pid}_{timestamp}"));
    fs::create_dir_all(&path)?;
    Ok(path)
}

fn config(tmp: &Path, algorithm: Algorithm, vocab_size: usize) -> Result<Config> {
    let corpus_path = tmp.join("corpus.txt");
    fs::write(&corpus_path, CORPUS_LINES.join("\n") + "\n")?;

    Ok(Config {
        model: ModelCfg {
            algorithm,
            vocab_size,
            min_frequency: 1,
            special_tokens: vec!["<pad>".to_string(), "<unk>".to_string()],
            unk_token: Some("<unk>".to_string()),
        },
        training: TrainingCfg {
            inputs: vec![corpus_path],
            seed: 42,
            shuffle: false,
            max_lines: None,
            num_threads: Some(1),
        },
        artifacts: ArtifactsCfg {
            dir: tmp.to_path_buf(),
            tokenizer_json: tmp.join("tokenizer.json"),
            manifest: tmp.join("manifest.json"),
        },
    })
}
