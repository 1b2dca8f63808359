pub mod assemble;
pub mod evaluate;
pub mod lookup;
pub mod run;
pub mod sample;
pub mod train;

pub use assemble::AssembleCommand;
pub use evaluate::EvaluateCommand;
pub use lookup::LookupCommand;
pub use run::RunCommand;
pub use sample::SampleCommand;
pub use train::TrainCommand;

use pipeline::ExperimentConfig;

/// Stage commands only accept scales the experiment actually declares.
fn ensure_scale(cfg: &ExperimentConfig, scale: u64) -> anyhow::Result<()> {
    if cfg.corpus.scales.contains(&scale) {
        Ok(())
    } else {
        anyhow::bail!(
            "scale {scale} is not listed in the configuration (configured: {:?})",
            cfg.corpus.scales
        )
    }
}
