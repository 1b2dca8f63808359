use clap::Args;
use pipeline::{ArtifactRegistry, ExperimentConfig};
use std::path::PathBuf;
use tokenizer::Algorithm;

#[derive(Args)]
pub struct LookupCommand {
    /// Experiment configuration (TOML or JSON)
    #[arg(long, conflicts_with = "run_manifest")]
    pub config: Option<PathBuf>,

    /// Run manifest path, as an alternative to --config
    #[arg(long)]
    pub run_manifest: Option<PathBuf>,

    /// Algorithm: bpe, wordpiece or unigram
    #[arg(long)]
    pub algorithm: Algorithm,

    /// Vocabulary size limit the artifact was trained with
    #[arg(long)]
    pub vocab_size: usize,

    /// Dataset scale in characters the artifact was trained on
    #[arg(long)]
    pub scale: u64,
}

pub fn run(cmd: LookupCommand) -> anyhow::Result<()> {
    let manifest_path = match (&cmd.config, &cmd.run_manifest) {
        (_, Some(path)) => path.clone(),
        (Some(config), None) => {
            let cfg = ExperimentConfig::from_path(config)?;
            cfg.output.dir.join("run-manifest.json")
        }
        (None, None) => anyhow::bail!("pass either --config or --run-manifest"),
    };

    let registry = ArtifactRegistry::load(&manifest_path)?;
    match registry.lookup(cmd.algorithm, cmd.vocab_size, cmd.scale) {
        Some(entry) => {
            println!("{}", entry.tokenizer_json.display());
            Ok(())
        }
        None => anyhow::bail!(
            "no artifact for algorithm={} vocab_size={} scale={}",
            cmd.algorithm,
            cmd.vocab_size,
            cmd.scale
        ),
    }
}
