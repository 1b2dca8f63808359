//! Polytok CLI - balanced multilingual tokenizer experiments.
//!
//! This is the main entry point for the `polytok` command-line tool.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    AssembleCommand, EvaluateCommand, LookupCommand, RunCommand, SampleCommand,
    TrainCommand,
};

#[derive(Parser)]
#[command(name = "polytok")]
#[command(about = "Balanced multilingual subword tokenization experiments", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample per-language text up to the balanced character budget
    Sample(SampleCommand),
    /// Merge per-language samples into a balanced dataset
    Assemble(AssembleCommand),
    /// Train one tokenizer combination on an assembled dataset
    Train(TrainCommand),
    /// Compute intrinsic metrics for the artifacts of a finished run
    Evaluate(EvaluateCommand),
    /// Execute the full pipeline for every configured scale
    Run(RunCommand),
    /// Resolve a trained artifact by algorithm, vocab size and scale
    Lookup(LookupCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sample(cmd) => commands::sample::run(cmd)?,
        Commands::Assemble(cmd) => commands::assemble::run(cmd)?,
        Commands::Train(cmd) => commands::train::run(cmd)?,
        Commands::Evaluate(cmd) => commands::evaluate::run(cmd)?,
        Commands::Run(cmd) => commands::run::run(cmd)?,
        Commands::Lookup(cmd) => commands::lookup::run(cmd)?,
    }

    Ok(())
}
