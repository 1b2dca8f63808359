use clap::Args;
use evaluation::{write_report_csv, ReportTable};
use pipeline::{evaluate_entry, ArtifactRegistry, ExperimentConfig};
use std::path::PathBuf;

#[derive(Args)]
pub struct EvaluateCommand {
    /// Experiment configuration (TOML or JSON)
    #[arg(long)]
    pub config: PathBuf,

    /// Run manifest; defaults to <output.dir>/run-manifest.json
    #[arg(long)]
    pub run_manifest: Option<PathBuf>,

    /// Report destination; defaults to <output.dir>/report.csv
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(cmd: EvaluateCommand) -> anyhow::Result<()> {
    let cfg = ExperimentConfig::from_path(&cmd.config)?;
    let manifest_path = cmd
        .run_manifest
        .unwrap_or_else(|| cfg.output.dir.join("run-manifest.json"));
    let registry = ArtifactRegistry::load(&manifest_path)?;

    if registry.entries().is_empty() {
        anyhow::bail!("run manifest {} lists no artifacts", manifest_path.display());
    }

    let table = ReportTable::new();
    for entry in registry.entries() {
        println!(
            "stage=evaluate algorithm={} vocab_size={} scale={}",
            entry.algorithm, entry.vocab_size, entry.scale
        );
        evaluate_entry(
            entry,
            &cfg.corpus.languages,
            cfg.evaluation.reference,
            &table,
        )?;
    }

    let records = table.into_sorted();
    let report_path = cmd
        .report
        .unwrap_or_else(|| cfg.output.dir.join("report.csv"));
    write_report_csv(&records, &report_path)?;
    println!(
        "report written to {} ({} rows)",
        report_path.display(),
        records.len()
    );

    Ok(())
}
