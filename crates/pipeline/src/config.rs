use crate::errors::{Error, Result};
use evaluation::Reference;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tokenizer::Algorithm;

/// Full description of an experiment: which languages and sources feed the
/// balanced datasets, which (algorithm, vocab size) combinations to train
/// at each scale, and where results go. Loaded from TOML or JSON; relative
/// paths are resolved against the config file's directory.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentConfig {
    pub corpus: CorpusSection,
    pub training: TrainingMatrix,
    #[serde(default)]
    pub evaluation: EvaluationSettings,
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusSection {
    pub languages: Vec<LanguageSpec>,
    /// Total characters per balanced dataset, e.g. 100M/200M/400M.
    pub scales: Vec<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageSpec {
    pub code: String,
    /// Extract files, one document per line (Wikipedia, OSCAR, ...).
    pub sources: Vec<PathBuf>,
    /// Held-out evaluation text, never sampled into training data.
    pub eval: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainingMatrix {
    pub algorithms: Vec<Algorithm>,
    pub vocab_sizes: Vec<usize>,
    #[serde(default = "default_min_frequency")]
    pub min_frequency: u32,
    #[serde(default = "default_special_tokens")]
    pub special_tokens: Vec<String>,
    #[serde(default = "default_unk_token")]
    pub unk_token: String,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub max_lines: Option<usize>,
    #[serde(default)]
    pub num_threads: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationSettings {
    #[serde(default)]
    pub reference: Reference,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeSettings {
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

impl ExperimentConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut config: ExperimentConfig =
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => serde_json::from_str(&contents)?,
                Some("toml") | Some("tml") | None => toml::from_str(&contents)?,
                Some(other) => {
                    return Err(Error::ConfigFormat(format!(
                        "unsupported configuration extension '{}'",
                        other
                    )));
                }
            };

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.apply_base_path(base_dir);
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.corpus.languages.is_empty() {
            errors.push("corpus.languages must not be empty".to_string());
        }

        let mut codes = HashSet::new();
        for language in &self.corpus.languages {
            if language.code.trim().is_empty() {
                errors.push("language code must not be empty".to_string());
            }
            if !codes.insert(language.code.as_str()) {
                errors.push(format!(
                    "language '{}' appears multiple times",
                    language.code
                ));
            }
            if language.sources.is_empty() {
                errors.push(format!(
                    "language '{}' must list at least one source",
                    language.code
                ));
            }
        }

        if self.corpus.scales.is_empty() {
            errors.push("corpus.scales must not be empty".to_string());
        }
        for &scale in &self.corpus.scales {
            if scale < self.corpus.languages.len() as u64 {
                errors.push(format!(
                    "scale {} is below one character per language",
                    scale
                ));
            }
        }

        if self.training.algorithms.is_empty() {
            errors.push("training.algorithms must not be empty".to_string());
        }
        if self.training.vocab_sizes.is_empty() {
            errors.push("training.vocab_sizes must not be empty".to_string());
        }
        for &vocab_size in &self.training.vocab_sizes {
            if vocab_size == 0 {
                errors.push("training.vocab_sizes entries must be greater than 0".to_string());
            }
        }
        if self.training.min_frequency < 1 {
            errors.push("training.min_frequency must be at least 1".to_string());
        }
        if self.training.unk_token.trim().is_empty() {
            errors.push("training.unk_token must not be empty".to_string());
        } else if !self
            .training
            .special_tokens
            .iter()
            .any(|t| t == &self.training.unk_token)
        {
            errors.push(format!(
                "training.unk_token '{}' must be listed in training.special_tokens",
                self.training.unk_token
            ));
        }

        if self.output.dir.as_os_str().is_empty() {
            errors.push("output.dir must not be empty".to_string());
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(())
    }

    fn apply_base_path(&mut self, base: &Path) {
        for language in &mut self.corpus.languages {
            for source in &mut language.sources {
                absolutize_in_place(source, base);
            }
            absolutize_in_place(&mut language.eval, base);
        }
        absolutize_in_place(&mut self.output.dir, base);
    }

    pub fn language_codes(&self) -> Vec<String> {
        self.corpus
            .languages
            .iter()
            .map(|l| l.code.clone())
            .collect()
    }
}

fn absolutize_in_place(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

fn default_min_frequency() -> u32 {
    2
}

fn default_special_tokens() -> Vec<String> {
    ["<pad>", "<unk>", "<bos>", "<eos>"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_unk_token() -> String {
    "<unk>".to_string()
}

fn default_seed() -> u64 {
    42
}
