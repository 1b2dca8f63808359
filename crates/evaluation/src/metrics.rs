use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tokenizers::Tokenizer;
use unicode_segmentation::UnicodeSegmentation;

/// Reference segmentation for the NSL denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reference {
    /// Character count. Meaningful for every script.
    Chars,
    /// Unicode word count. Close to whitespace tokens for spaced scripts.
    Words,
}

impl Default for Reference {
    fn default() -> Self {
        Reference::Chars
    }
}

/// Metrics for one evaluation text against one tokenizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub nsl: f64,
    pub fertility: f64,
    pub token_count: u64,
    pub word_count: u64,
    pub char_count: u64,
}

/// Running totals over the lines of an evaluation text.
#[derive(Debug, Default)]
pub struct MetricsAccumulator {
    tokens: u64,
    words: u64,
    chars: u64,
}

impl MetricsAccumulator {
    pub fn update(&mut self, tokens: u64, words: u64, chars: u64) {
        self.tokens += tokens;
        self.words += words;
        self.chars += chars;
    }

    pub fn finalize(self, reference: Reference) -> Result<TextMetrics> {
        if self.chars == 0 {
            return Err(Error::EmptyEvalText("no characters".into()));
        }
        if self.words == 0 {
            return Err(Error::EmptyEvalText("no words".into()));
        }

        let reference_len = match reference {
            Reference::Chars => self.chars,
            Reference::Words => self.words,
        };

        Ok(TextMetrics {
            nsl: self.tokens as f64 / reference_len as f64,
            fertility: self.tokens as f64 / self.words as f64,
            token_count: self.tokens,
            word_count: self.words,
            char_count: self.chars,
        })
    }
}

/// Evaluate a single text. Tokens are counted without special tokens so the
/// metrics describe segmentation, not template overhead.
pub fn evaluate(tokenizer: &Tokenizer, text: &str, reference: Reference) -> Result<TextMetrics> {
    let mut acc = MetricsAccumulator::default();
    accumulate_line(tokenizer, text, &mut acc)?;
    acc.finalize(reference)
}

/// Evaluate a held-out file, one document per line.
pub fn evaluate_file(
    tokenizer: &Tokenizer,
    path: &Path,
    reference: Reference,
) -> Result<TextMetrics> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut acc = MetricsAccumulator::default();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        accumulate_line(tokenizer, line.as_str(), &mut acc)?;
    }

    acc.finalize(reference)
}

fn accumulate_line(
    tokenizer: &Tokenizer,
    line: &str,
    acc: &mut MetricsAccumulator,
) -> Result<()> {
    let encoding = tokenizer.encode(line, false)?;
    acc.update(
        encoding.get_ids().len() as u64,
        line.unicode_words().count() as u64,
        line.chars().count() as u64,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_averages_over_all_lines() {
        let mut acc = MetricsAccumulator::default();
        acc.update(10, 4, 20);
        acc.update(6, 2, 12);

        let metrics = acc.finalize(Reference::Chars).unwrap();
        assert_eq!(metrics.token_count, 16);
        assert_eq!(metrics.word_count, 6);
        assert_eq!(metrics.char_count, 32);
        assert!((metrics.nsl - 0.5).abs() < 1e-9);
        assert!((metrics.fertility - 16.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn word_reference_divides_by_words() {
        let mut acc = MetricsAccumulator::default();
        acc.update(9, 3, 18);
        let metrics = acc.finalize(Reference::Words).unwrap();
        assert!((metrics.nsl - 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_text_is_an_error() {
        let acc = MetricsAccumulator::default();
        assert!(matches!(
            acc.finalize(Reference::Chars),
            Err(Error::EmptyEvalText(_))
        ));

        let mut punct_only = MetricsAccumulator::default();
        punct_only.update(3, 0, 5);
        assert!(matches!(
            punct_only.finalize(Reference::Chars),
            Err(Error::EmptyEvalText(_))
        ));
    }
}
