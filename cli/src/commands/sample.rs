use anyhow::Context;
use clap::Args;
use corpus::{equal_allocations, sample_language, SampleSpec};
use indicatif::{ProgressBar, ProgressStyle};
use pipeline::ExperimentConfig;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args)]
pub struct SampleCommand {
    /// Experiment configuration (TOML or JSON)
    #[arg(long)]
    pub config: PathBuf,

    /// Dataset scale in characters; must be listed in the config
    #[arg(long)]
    pub scale: u64,

    /// Output directory; defaults to <output.dir>/balanced-<scale>/samples
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(cmd: SampleCommand) -> anyhow::Result<()> {
    let cfg = ExperimentConfig::from_path(&cmd.config)?;
    super::ensure_scale(&cfg, cmd.scale)?;

    let out_dir = cmd.out.unwrap_or_else(|| {
        cfg.output
            .dir
            .join(format!("balanced-{}", cmd.scale))
            .join("samples")
    });
    fs::create_dir_all(&out_dir)?;

    let allocations = equal_allocations(&cfg.language_codes(), cmd.scale);
    let bar = ProgressBar::new(cfg.corpus.languages.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
        )?
        .progress_chars("=>-"),
    );

    let mut samples = Vec::with_capacity(cfg.corpus.languages.len());
    for (language, allocation) in cfg.corpus.languages.iter().zip(&allocations) {
        bar.set_message(language.code.clone());
        let spec = SampleSpec {
            language: language.code.clone(),
            sources: language.sources.clone(),
            target_chars: allocation.chars,
        };
        let out = out_dir.join(format!("{}.txt", language.code));
        let sample = sample_language(&spec, &out)
            .with_context(|| format!("sampling language '{}'", language.code))?;
        println!(
            "language={} target={} sampled={}",
            sample.language, allocation.chars, sample.char_count
        );
        samples.push(sample);
        bar.inc(1);
    }
    bar.finish_with_message("samples ready");

    let manifest_path = out_dir.join("samples.json");
    let file = fs::File::create(&manifest_path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &samples)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    println!("samples manifest written to {}", manifest_path.display());

    Ok(())
}
