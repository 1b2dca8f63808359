use anyhow::Context;
use clap::Args;
use corpus::{equal_allocations, LanguageCorpus};
use pipeline::{assemble_scale, ExperimentConfig};
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct AssembleCommand {
    /// Experiment configuration (TOML or JSON)
    #[arg(long)]
    pub config: PathBuf,

    /// Dataset scale in characters; must be listed in the config
    #[arg(long)]
    pub scale: u64,

    /// Directory holding samples.json from `polytok sample`;
    /// defaults to <output.dir>/balanced-<scale>/samples
    #[arg(long)]
    pub samples: Option<PathBuf>,
}

pub fn run(cmd: AssembleCommand) -> anyhow::Result<()> {
    let cfg = ExperimentConfig::from_path(&cmd.config)?;
    super::ensure_scale(&cfg, cmd.scale)?;

    let scale_dir = cfg.output.dir.join(format!("balanced-{}", cmd.scale));
    let samples_dir = cmd.samples.unwrap_or_else(|| scale_dir.join("samples"));
    let manifest_path = samples_dir.join("samples.json");
    let contents = fs::read_to_string(&manifest_path).with_context(|| {
        format!(
            "reading samples manifest {} (run `polytok sample` first)",
            manifest_path.display()
        )
    })?;
    let samples: Vec<LanguageCorpus> = serde_json::from_str(&contents)?;

    let allocations = equal_allocations(&cfg.language_codes(), cmd.scale);
    let dataset = assemble_scale(&cfg, &samples, &allocations, cmd.scale, &scale_dir)?;

    println!(
        "dataset={} total_chars={} languages={}",
        dataset.path.display(),
        dataset.total_chars,
        dataset.allocations.len()
    );

    Ok(())
}
