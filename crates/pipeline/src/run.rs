use crate::config::{ExperimentConfig, LanguageSpec};
use crate::errors::{Error, Result, Stage};
use corpus::{
    assemble, equal_allocations, sample_language, Allocation, AssembleOptions,
    BalancedDataset, LanguageCorpus, SampleSpec,
};
use evaluation::{evaluate_file, write_report_csv, MetricRecord, Reference, ReportTable};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokenizer::{Algorithm, ArtifactsCfg, Config, ModelCfg, TrainingCfg};

/// A trained (algorithm, vocab size, scale) combination and where its
/// files live. Recorded in the run manifest for downstream lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub algorithm: Algorithm,
    pub vocab_size: usize,
    pub scale: u64,
    pub tokenizer_json: PathBuf,
    pub manifest: PathBuf,
}

/// A combination whose training or evaluation failed. Other combinations
/// proceed independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboFailure {
    pub algorithm: Algorithm,
    pub vocab_size: usize,
    pub scale: u64,
    pub stage: Stage,
    pub error: String,
}

/// Outcome of one dataset scale.
#[derive(Debug, Clone)]
pub struct ScaleReport {
    pub scale: u64,
    pub dataset: Option<BalancedDataset>,
    /// Sampling or assembly failure that aborted the whole scale.
    pub failure: Option<String>,
    pub artifacts: Vec<ArtifactEntry>,
    pub combo_failures: Vec<ComboFailure>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub scales: Vec<ScaleReport>,
    pub records: Vec<MetricRecord>,
    pub report_path: PathBuf,
    pub run_manifest_path: PathBuf,
}

/// Index of a finished run, written as `run-manifest.json` in the output
/// directory and consumed by the artifact registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub artifacts: Vec<ArtifactEntry>,
    pub failures: Vec<ComboFailure>,
    pub report: PathBuf,
}

/// Execute the full experiment: for every configured scale, run
/// Sample → Assemble → Train → Evaluate in order. A sampling or assembly
/// error aborts that scale; a training or evaluation error aborts only its
/// own combination. All outcomes are recorded, nothing is swallowed.
pub fn run(cfg: &ExperimentConfig) -> Result<RunSummary> {
    std::fs::create_dir_all(&cfg.output.dir)?;

    let table = ReportTable::new();
    let mut scales = Vec::with_capacity(cfg.corpus.scales.len());

    for &scale in &cfg.corpus.scales {
        scales.push(run_scale(cfg, scale, &table));
    }

    let records = table.into_sorted();
    let report_path = cfg.output.dir.join("report.csv");
    write_report_csv(&records, &report_path)
        .map_err(|err| Error::stage(Stage::Evaluate, "report emission", err))?;

    let run_manifest_path = cfg.output.dir.join("run-manifest.json");
    let manifest = RunManifest {
        artifacts: scales.iter().flat_map(|s| s.artifacts.clone()).collect(),
        failures: scales
            .iter()
            .flat_map(|s| s.combo_failures.clone())
            .collect(),
        report: report_path.clone(),
    };
    write_run_manifest(&manifest, &run_manifest_path)?;

    Ok(RunSummary {
        scales,
        records,
        report_path,
        run_manifest_path,
    })
}

fn run_scale(cfg: &ExperimentConfig, scale: u64, table: &ReportTable) -> ScaleReport {
    let mut report = ScaleReport {
        scale,
        dataset: None,
        failure: None,
        artifacts: Vec::new(),
        combo_failures: Vec::new(),
    };

    let scale_dir = cfg.output.dir.join(format!("balanced-{scale}"));

    println!(
        "stage=sample scale={scale} languages={}",
        cfg.corpus.languages.len()
    );
    let allocations = equal_allocations(&cfg.language_codes(), scale);
    let samples = match sample_scale(cfg, &allocations, &scale_dir) {
        Ok(samples) => samples,
        Err(err) => {
            println!("stage=sample scale={scale} status=failed error={err}");
            report.failure = Some(err.to_string());
            return report;
        }
    };

    println!("stage=assemble scale={scale}");
    let dataset = match assemble_scale(cfg, &samples, &allocations, scale, &scale_dir) {
        Ok(dataset) => dataset,
        Err(err) => {
            println!("stage=assemble scale={scale} status=failed error={err}");
            report.failure = Some(err.to_string());
            return report;
        }
    };
    report.dataset = Some(dataset.clone());

    for &algorithm in &cfg.training.algorithms {
        for &vocab_size in &cfg.training.vocab_sizes {
            println!(
                "stage=train scale={scale} algorithm={algorithm} vocab_size={vocab_size}"
            );
            match train_combo(cfg, &dataset, algorithm, vocab_size, &scale_dir) {
                Ok(entry) => report.artifacts.push(entry),
                Err(err) => {
                    println!(
                        "stage=train scale={scale} algorithm={algorithm} \
                         vocab_size={vocab_size} status=failed error={err}"
                    );
                    report.combo_failures.push(ComboFailure {
                        algorithm,
                        vocab_size,
                        scale,
                        stage: Stage::Train,
                        error: err.to_string(),
                    });
                }
            }
        }
    }

    let mut evaluated = Vec::new();
    for entry in report.artifacts.drain(..) {
        println!(
            "stage=evaluate scale={scale} algorithm={} vocab_size={}",
            entry.algorithm, entry.vocab_size
        );
        match evaluate_entry(
            &entry,
            &cfg.corpus.languages,
            cfg.evaluation.reference,
            table,
        ) {
            Ok(()) => evaluated.push(entry),
            Err(err) => {
                println!(
                    "stage=evaluate scale={scale} algorithm={} vocab_size={} \
                     status=failed error={err}",
                    entry.algorithm, entry.vocab_size
                );
                report.combo_failures.push(ComboFailure {
                    algorithm: entry.algorithm,
                    vocab_size: entry.vocab_size,
                    scale,
                    stage: Stage::Evaluate,
                    error: err.to_string(),
                });
            }
        }
    }
    report.artifacts = evaluated;

    report
}

/// Sample every configured language in parallel. The units of work are
/// independent: each owns its sources and its output file exclusively.
pub fn sample_scale(
    cfg: &ExperimentConfig,
    allocations: &[Allocation],
    scale_dir: &Path,
) -> Result<Vec<LanguageCorpus>> {
    let samples_dir = scale_dir.join("samples");
    std::fs::create_dir_all(&samples_dir)?;

    cfg.corpus
        .languages
        .par_iter()
        .zip(allocations.par_iter())
        .map(|(language, allocation)| {
            let spec = SampleSpec {
                language: language.code.clone(),
                sources: language.sources.clone(),
                target_chars: allocation.chars,
            };
            let out = samples_dir.join(format!("{}.txt", language.code));
            sample_language(&spec, &out).map_err(|err| {
                Error::stage(
                    Stage::Sample,
                    format!("language '{}'", language.code),
                    err,
                )
            })
        })
        .collect()
}

/// Merge samples into the balanced corpus and write its manifest and
/// per-language statistics next to it.
pub fn assemble_scale(
    cfg: &ExperimentConfig,
    samples: &[LanguageCorpus],
    allocations: &[Allocation],
    scale: u64,
    scale_dir: &Path,
) -> Result<BalancedDataset> {
    let context = format!("scale {scale}");
    let corpus_path = scale_dir.join("balanced.txt");
    let opts = AssembleOptions {
        seed: cfg.runtime.seed,
    };

    let dataset = assemble(samples, allocations, &corpus_path, &opts)
        .map_err(|err| Error::stage(Stage::Assemble, &context, err))?;

    corpus::write_manifest(&dataset, &scale_dir.join("balanced.json"))
        .map_err(|err| Error::stage(Stage::Assemble, &context, err))?;
    corpus::write_stats_csv(&dataset, samples, &scale_dir.join("balanced.csv"))
        .map_err(|err| Error::stage(Stage::Assemble, &context, err))?;

    Ok(dataset)
}

/// Train one (algorithm, vocab size) combination on a balanced dataset.
pub fn train_combo(
    cfg: &ExperimentConfig,
    dataset: &BalancedDataset,
    algorithm: Algorithm,
    vocab_size: usize,
    scale_dir: &Path,
) -> Result<ArtifactEntry> {
    let combo_dir = scale_dir.join(format!("{algorithm}-{vocab_size}"));
    let tok_cfg = Config {
        model: ModelCfg {
            algorithm,
            vocab_size,
            min_frequency: cfg.training.min_frequency,
            special_tokens: cfg.training.special_tokens.clone(),
            unk_token: Some(cfg.training.unk_token.clone()),
        },
        training: TrainingCfg {
            inputs: vec![dataset.path.clone()],
            seed: cfg.runtime.seed,
            shuffle: cfg.training.shuffle,
            max_lines: cfg.training.max_lines,
            num_threads: cfg.training.num_threads,
        },
        artifacts: ArtifactsCfg {
            dir: combo_dir,
            tokenizer_json: PathBuf::from("tokenizer.json"),
            manifest: PathBuf::from("manifest.json"),
        },
    };

    let context = format!("{algorithm} at vocab {vocab_size}");
    tokenizer::train(&tok_cfg).map_err(|err| Error::stage(Stage::Train, &context, err))?;

    let paths = tokenizer::resolve_paths(&tok_cfg.artifacts);
    Ok(ArtifactEntry {
        algorithm,
        vocab_size,
        scale: dataset.total_chars,
        tokenizer_json: paths.tokenizer_json,
        manifest: paths.manifest,
    })
}

/// Evaluate one trained artifact against every language's held-out text,
/// appending one record per language to the shared table.
pub fn evaluate_entry(
    entry: &ArtifactEntry,
    languages: &[LanguageSpec],
    reference: Reference,
    table: &ReportTable,
) -> Result<()> {
    let context = format!("{} at vocab {}", entry.algorithm, entry.vocab_size);
    let tok = tokenizer::load_tokenizer_from_json(&entry.tokenizer_json)
        .map_err(|err| Error::stage(Stage::Evaluate, &context, err))?;

    // Buffer locally so a failure on one language leaves no partial rows.
    let mut records = Vec::with_capacity(languages.len());
    for language in languages {
        let metrics = evaluate_file(&tok, &language.eval, reference).map_err(|err| {
            Error::stage(
                Stage::Evaluate,
                format!("{context}, language '{}'", language.code),
                err,
            )
        })?;
        records.push(MetricRecord {
            language: language.code.clone(),
            algorithm: entry.algorithm.to_string(),
            vocab_size: entry.vocab_size,
            scale: entry.scale,
            nsl: metrics.nsl,
            fertility: metrics.fertility,
        });
    }

    for record in records {
        table.append(record);
    }

    Ok(())
}

fn write_run_manifest(manifest: &RunManifest, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manifest)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
