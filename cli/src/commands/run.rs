use clap::Args;
use pipeline::ExperimentConfig;
use std::path::PathBuf;

#[derive(Args)]
pub struct RunCommand {
    /// Experiment configuration (TOML or JSON)
    #[arg(long)]
    pub config: PathBuf,
}

pub fn run(cmd: RunCommand) -> anyhow::Result<()> {
    let cfg = ExperimentConfig::from_path(&cmd.config)?;
    let summary = pipeline::run(&cfg)?;

    println!();
    for scale in &summary.scales {
        match &scale.failure {
            Some(failure) => {
                println!("scale={} status=aborted error={failure}", scale.scale);
            }
            None => {
                println!(
                    "scale={} status=ok artifacts={} failures={}",
                    scale.scale,
                    scale.artifacts.len(),
                    scale.combo_failures.len()
                );
            }
        }
        for failure in &scale.combo_failures {
            println!(
                "  failed combination: algorithm={} vocab_size={} stage={}: {}",
                failure.algorithm, failure.vocab_size, failure.stage, failure.error
            );
        }
    }
    println!("report written to {}", summary.report_path.display());
    println!("run manifest at {}", summary.run_manifest_path.display());

    if summary.scales.iter().all(|s| s.failure.is_some()) {
        anyhow::bail!("every dataset scale aborted; see errors above");
    }

    Ok(())
}
