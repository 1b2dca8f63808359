use anyhow::Context;
use clap::Args;
use corpus::BalancedDataset;
use pipeline::{train_combo, ExperimentConfig};
use std::fs;
use std::path::PathBuf;
use tokenizer::Algorithm;

#[derive(Args)]
pub struct TrainCommand {
    /// Experiment configuration (TOML or JSON)
    #[arg(long)]
    pub config: PathBuf,

    /// Dataset scale in characters; must be listed in the config
    #[arg(long)]
    pub scale: u64,

    /// Algorithm: bpe, wordpiece or unigram
    #[arg(long)]
    pub algorithm: Algorithm,

    /// Vocabulary size limit
    #[arg(long)]
    pub vocab_size: usize,
}

pub fn run(cmd: TrainCommand) -> anyhow::Result<()> {
    let cfg = ExperimentConfig::from_path(&cmd.config)?;
    super::ensure_scale(&cfg, cmd.scale)?;

    let scale_dir = cfg.output.dir.join(format!("balanced-{}", cmd.scale));
    let manifest_path = scale_dir.join("balanced.json");
    let contents = fs::read_to_string(&manifest_path).with_context(|| {
        format!(
            "reading dataset manifest {} (run `polytok assemble` first)",
            manifest_path.display()
        )
    })?;
    let dataset: BalancedDataset = serde_json::from_str(&contents)?;

    let entry = train_combo(&cfg, &dataset, cmd.algorithm, cmd.vocab_size, &scale_dir)?;
    let manifest = tokenizer::read_manifest(&entry.manifest)?;

    println!(
        "algorithm={} vocab_size={} scale={} token_count={} artifact={}",
        entry.algorithm,
        entry.vocab_size,
        entry.scale,
        manifest.token_count,
        entry.tokenizer_json.display()
    );

    Ok(())
}
