use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use evaluation::{evaluate, evaluate_file, Reference};
use tokenizer::{train, Algorithm, ArtifactsCfg, Config, ModelCfg, TrainingCfg};

const TRAIN_LINES: [&str; 8] = [
    "the quick brown fox jumps over the lazy dog",
    "balanced corpora keep every language in proportion",
    "tokenization quality differs across scripts",
    "frequency counts drive merge decisions",
    "evaluation texts are held out from training",
    "short sentences still cover the alphabet",
    "subword units share structure across languages",
    "the lazy dog naps while the fox runs again",
];

const EVAL_LINES: [&str; 3] = [
    "the quick brown fox naps",
    "balanced corpora keep proportion",
    "held out evaluation sentences",
];

#[test]
fn fertility_is_at_least_one_and_nsl_positive() {
    let tmp = tmp_dir("bounds");
    let tokenizer = train_small(&tmp, Algorithm::Bpe, 400);
    let eval_path = write_eval(&tmp);

    let metrics = evaluate_file(&tokenizer, &eval_path, Reference::Chars).unwrap();
    assert!(metrics.fertility >= 1.0, "fertility {}", metrics.fertility);
    assert!(metrics.nsl > 0.0);
    assert!(metrics.word_count >= 1);
}

#[test]
fn evaluating_twice_is_identical() {
    let tmp = tmp_dir("repeat");
    let tokenizer = train_small(&tmp, Algorithm::Unigram, 300);
    let eval_path = write_eval(&tmp);

    let first = evaluate_file(&tokenizer, &eval_path, Reference::Chars).unwrap();
    let second = evaluate_file(&tokenizer, &eval_path, Reference::Chars).unwrap();
    assert_eq!(first, second);
}

#[test]
fn single_text_matches_single_line_file() {
    let tmp = tmp_dir("single");
    let tokenizer = train_small(&tmp, Algorithm::Wordpiece, 300);

    let text = "the quick brown fox naps";
    let path = tmp.join("one-line.txt");
    fs::write(&path, format!("{text}\n")).unwrap();

    let from_text = evaluate(&tokenizer, text, Reference::Words).unwrap();
    let from_file = evaluate_file(&tokenizer, &path, Reference::Words).unwrap();
    assert_eq!(from_text, from_file);
    // With a word reference, NSL and fertility coincide.
    assert!((from_text.nsl - from_text.fertility).abs() < 1e-12);
}

fn train_small(tmp: &Path, algorithm: Algorithm, vocab_size: usize) -> tokenizers::Tokenizer {
    let corpus_path = tmp.join("train.txt");
    fs::write(&corpus_path, TRAIN_LINES.join("\n") + "\n").unwrap();

    let cfg = Config {
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
    };
    train(&cfg).unwrap()
}

fn write_eval(tmp: &Path) -> PathBuf {
    let path = tmp.join("eval.txt");
    fs::write(&path, EVAL_LINES.join("\n") + "\n").unwrap();
    path
}

fn tmp_dir(label: &str) -> PathBuf {
    let pid = process::id();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went forwards")
        .as_nanos();
    let path = PathBuf::from("target")
        .join("evaluation_tests")
        .join(format!("{label}_{pid}_{timestamp}"));
    fs::create_dir_all(&path).unwrap();
    path
}
