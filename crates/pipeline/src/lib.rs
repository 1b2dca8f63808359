//! Staged experiment runner.
//!
//! A run is a strictly ordered sequence per dataset scale:
//! Sample → Assemble → Train → Evaluate. There are no retries across
//! stages and no partial-result propagation: a sampling or assembly
//! failure aborts the whole scale, while a training failure aborts only
//! its own (algorithm, vocab size) combination. Everything that happened
//! is recorded in the [`run::RunSummary`] and the run manifest, which the
//! [`registry::ArtifactRegistry`] serves to downstream consumers.

pub mod config;
pub mod errors;
pub mod registry;
pub mod run;

pub use config::{
    CorpusSection, EvaluationSettings, ExperimentConfig, LanguageSpec, OutputConfig,
    RuntimeSettings, TrainingMatrix,
};
pub use errors::{Error, Result, Stage};
pub use registry::ArtifactRegistry;
pub use run::{
    assemble_scale, evaluate_entry, run, sample_scale, train_combo, ArtifactEntry,
    ComboFailure, RunManifest, RunSummary, ScaleReport,
};
