use serde::{Deserialize, Serialize};

/// One row of the intrinsic-metrics report. Append-only: records are
/// created by the evaluator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub language: String,
    pub algorithm: String,
    pub vocab_size: usize,
    /// Total characters of the balanced dataset the tokenizer was trained on.
    pub scale: u64,
    pub nsl: f64,
    pub fertility: f64,
}

impl MetricRecord {
    /// Sort key: language × algorithm × vocab size × scale.
    pub fn sort_key(&self) -> (String, String, usize, u64) {
        (
            self.language.clone(),
            self.algorithm.clone(),
            self.vocab_size,
            self.scale,
        )
    }
}
