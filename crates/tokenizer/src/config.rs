use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Subword training algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bpe,
    Wordpiece,
    Unigram,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Bpe => "bpe",
            Algorithm::Wordpiece => "wordpiece",
            Algorithm::Unigram => "unigram",
        }
    }

    pub fn all() -> [Algorithm; 3] {
        [Algorithm::Bpe, Algorithm::Wordpiece, Algorithm::Unigram]
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bpe" => Ok(Algorithm::Bpe),
            "wordpiece" => Ok(Algorithm::Wordpiece),
            "unigram" => Ok(Algorithm::Unigram),
            other => Err(format!("unknown algorithm '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelCfg,
    pub training: TrainingCfg,
    pub artifacts: ArtifactsCfg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCfg {
    pub algorithm: Algorithm,
    pub vocab_size: usize,
    #[serde(default = "default_min_frequency")]
    pub min_frequency: u32,
    #[serde(default)]
    pub special_tokens: Vec<String>,
    /// Required for WordPiece and Unigram; must also be a special token.
    #[serde(default)]
    pub unk_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingCfg {
    pub inputs: Vec<PathBuf>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub max_lines: Option<usize>,
    #[serde(default)]
    pub num_threads: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsCfg {
    pub dir: PathBuf,
    #[serde(default = "default_tokenizer_json")]
    pub tokenizer_json: PathBuf,
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

fn default_min_frequency() -> u32 {
    2
}

fn default_seed() -> u64 {
    42
}

fn default_tokenizer_json() -> PathBuf {
    PathBuf::from("tokenizer.json")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("manifest.json")
}
