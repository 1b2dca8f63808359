use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use pipeline::{
    run, ArtifactRegistry, CorpusSection, EvaluationSettings, ExperimentConfig,
    LanguageSpec, OutputConfig, RuntimeSettings, Stage, TrainingMatrix,
};
use tokenizer::Algorithm;

const FIRST_WORDS: [&str; 6] = ["upepo", "maji", "nyota", "safari", "rafiki", "habari"];
const SECOND_WORDS: [&str; 6] = ["deniz", "kitap", "sabah", "yildiz", "kapi", "sokak"];

#[test]
fn full_run_produces_artifacts_report_and_registry() {
    let tmp = tmp_dir("full");
    let cfg = experiment(&tmp, vec![1200], vec![Algorithm::Bpe, Algorithm::Unigram], 300);

    let summary = run(&cfg).unwrap();

    assert_eq!(summary.scales.len(), 1);
    let scale = &summary.scales[0];
    assert!(scale.failure.is_none(), "scale failed: {:?}", scale.failure);
    assert!(scale.combo_failures.is_empty());
    assert_eq!(scale.artifacts.len(), 2);

    let dataset = scale.dataset.as_ref().expect("dataset assembled");
    assert_eq!(dataset.total_chars, 1200);
    assert_eq!(
        dataset.allocations.iter().map(|a| a.chars).sum::<u64>(),
        1200
    );
    assert!(dataset.path.is_file());

    // 2 algorithms x 2 languages.
    assert_eq!(summary.records.len(), 4);
    for record in &summary.records {
        assert!(record.fertility >= 1.0);
        assert!(record.nsl > 0.0);
    }

    let report = fs::read_to_string(&summary.report_path).unwrap();
    assert_eq!(report.lines().count(), 5, "header plus four rows");

    let registry = ArtifactRegistry::load(&summary.run_manifest_path).unwrap();
    let entry = registry.lookup(Algorithm::Bpe, 300, 1200).expect("bpe artifact");
    assert!(entry.tokenizer_json.is_file());
    assert!(registry.lookup(Algorithm::Wordpiece, 300, 1200).is_none());
    assert!(registry.lookup(Algorithm::Bpe, 300, 999).is_none());
}

#[test]
fn training_failure_aborts_only_its_combination() {
    let tmp = tmp_dir("combo-failure");
    // vocab 100 is below the byte alphabet: BPE is rejected, Unigram trains.
    let cfg = experiment(&tmp, vec![1200], vec![Algorithm::Bpe, Algorithm::Unigram], 100);

    let summary = run(&cfg).unwrap();
    let scale = &summary.scales[0];

    assert!(scale.failure.is_none());
    assert_eq!(scale.artifacts.len(), 1);
    assert_eq!(scale.artifacts[0].algorithm, Algorithm::Unigram);

    assert_eq!(scale.combo_failures.len(), 1);
    let failure = &scale.combo_failures[0];
    assert_eq!(failure.algorithm, Algorithm::Bpe);
    assert_eq!(failure.stage, Stage::Train);
    assert!(!failure.error.is_empty());

    assert!(summary
        .records
        .iter()
        .all(|record| record.algorithm == "unigram"));
}

#[test]
fn undersized_scale_aborts_without_touching_other_scales() {
    let tmp = tmp_dir("scale-abort");
    // The sources hold a few thousand characters; the second scale cannot
    // be satisfied and must abort before anything is assembled.
    let cfg = experiment(&tmp, vec![800, 1_000_000], vec![Algorithm::Unigram], 200);

    let summary = run(&cfg).unwrap();
    assert_eq!(summary.scales.len(), 2);

    let ok = &summary.scales[0];
    assert!(ok.failure.is_none());
    assert_eq!(ok.artifacts.len(), 1);

    let failed = &summary.scales[1];
    let message = failed.failure.as_ref().expect("scale should fail");
    assert!(message.contains("sampling failed"), "got: {message}");
    assert!(message.contains("insufficient data"), "got: {message}");
    assert!(failed.dataset.is_none());
    assert!(
        !tmp.join("out/balanced-1000000/balanced.txt").exists(),
        "no partial dataset may be written"
    );

    // The failed scale contributes no rows.
    assert!(summary.records.iter().all(|r| r.scale == 800));
}

fn experiment(
    tmp: &Path,
    scales: Vec<u64>,
    algorithms: Vec<Algorithm>,
    vocab_size: usize,
) -> ExperimentConfig {
    let first = language(tmp, "sw", &FIRST_WORDS);
    let second = language(tmp, "tr", &SECOND_WORDS);

    ExperimentConfig {
        corpus: CorpusSection {
            languages: vec![first, second],
            scales,
        },
        training: TrainingMatrix {
            algorithms,
            vocab_sizes: vec![vocab_size],
            min_frequency: 1,
            special_tokens: vec!["<pad>".to_string(), "<unk>".to_string()],
            unk_token: "<unk>".to_string(),
            shuffle: false,
            max_lines: None,
            num_threads: Some(1),
        },
        evaluation: EvaluationSettings::default(),
        output: OutputConfig {
            dir: tmp.join("out"),
        },
        runtime: RuntimeSettings::default(),
    }
}

/// Write a source extract (~3000 chars) and a held-out eval text.
fn language(tmp: &Path, code: &str, words: &[&str]) -> LanguageSpec {
    let source = tmp.join(format!("{code}-source.txt"));
    let mut docs = Vec::new();
    for i in 0..100 {
        let a = words[i % words.len()];
        let b = words[(i + 1) % words.len()];
        let c = words[(i + 2) % words.len()];
        docs.push(format!("{a} {b} {c} {a}"));
    }
    fs::write(&source, docs.join("\n") + "\n").unwrap();

    let eval = tmp.join(format!("{code}-eval.txt"));
    let held_out = [
        format!("{} {} {}", words[0], words[2], words[4]),
        format!("{} {} {}", words[1], words[3], words[5]),
    ];
    fs::write(&eval, held_out.join("\n") + "\n").unwrap();

    LanguageSpec {
        code: code.to_string(),
        sources: vec![source],
        eval,
    }
}

fn tmp_dir(label: &str) -> PathBuf {
    let pid = process::id();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went forwards")
        .as_nanos();
    let path = PathBuf::from("target")
        .join("pipeline_tests")
        .join(format!("{label}_{pid}_{timestamp}"));
    fs::create_dir_all(&path).unwrap();
    path
}
