use crate::corpora::{DocumentCorpus, DocumentStream, TextCorpus};
use crate::errors::{Error, Result};
use crate::normalize::{char_count, normalize_document};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where a language's text comes from and how much of it to take.
#[derive(Clone, Debug)]
pub struct SampleSpec {
    pub language: String,
    /// Extract files, one document per line. Typically a Wikipedia extract
    /// and an OSCAR extract; the budget is split evenly across them.
    pub sources: Vec<PathBuf>,
    pub target_chars: u64,
}

/// A per-language sample written to disk. Immutable once sampled.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LanguageCorpus {
    pub language: String,
    pub path: PathBuf,
    pub char_count: u64,
}

/// Draw at least `target_chars` normalized characters for one language and
/// write the sample to `out_path`, one document per line.
///
/// The budget is split evenly across the sources; a source that runs dry
/// leaves its shortfall to the remaining sources, in order. Documents from
/// different sources are interleaved round-robin in the output so neither
/// source dominates any region of the sample. Sampling stops at the first
/// document boundary at or after the target, so the sample may exceed the
/// target by up to one document.
pub fn sample_language(spec: &SampleSpec, out_path: &Path) -> Result<LanguageCorpus> {
    if spec.sources.is_empty() {
        return Err(Error::Config(format!(
            "no sources configured for '{}'",
            spec.language
        )));
    }
    if spec.target_chars == 0 {
        return Err(Error::Config(format!(
            "sample target for '{}' must be greater than zero",
            spec.language
        )));
    }

    let shares = split_budget(spec.target_chars, spec.sources.len() as u64);
    let mut states = Vec::with_capacity(spec.sources.len());
    for source in &spec.sources {
        states.push(SourceState::open(source)?);
    }

    let mut collected = 0u64;
    for (state, share) in states.iter_mut().zip(shares) {
        collected += state.draw(share)?;
    }

    // Short sources leave a shortfall; the others fill it in order.
    for state in states.iter_mut() {
        if collected >= spec.target_chars {
            break;
        }
        collected += state.draw(spec.target_chars - collected)?;
    }

    if collected < spec.target_chars {
        return Err(Error::InsufficientData {
            language: spec.language.clone(),
            requested: spec.target_chars,
            available: collected,
        });
    }

    write_interleaved(&mut states, out_path)?;

    Ok(LanguageCorpus {
        language: spec.language.clone(),
        path: out_path.to_path_buf(),
        char_count: collected,
    })
}

/// Equal shares of `total` across `parts`; the first `total % parts` shares
/// absorb the remainder.
fn split_budget(total: u64, parts: u64) -> Vec<u64> {
    let base = total / parts;
    let remainder = total % parts;
    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

struct SourceState {
    stream: DocumentStream,
    docs: VecDeque<String>,
    exhausted: bool,
}

impl SourceState {
    fn open(path: &Path) -> Result<Self> {
        let corpus = DocumentCorpus::new(vec![path.to_path_buf()])?;
        Ok(Self {
            stream: corpus.stream()?,
            docs: VecDeque::new(),
            exhausted: false,
        })
    }

    /// Accumulate whole documents until at least `budget` more characters
    /// have been drawn or the source runs out. Returns the characters drawn
    /// by this call.
    fn draw(&mut self, budget: u64) -> Result<u64> {
        let mut drawn = 0u64;
        while drawn < budget && !self.exhausted {
            match self.stream.next() {
                Some(line) => {
                    if let Some(doc) = normalize_document(&line?) {
                        drawn += char_count(&doc);
                        self.docs.push_back(doc);
                    }
                }
                None => self.exhausted = true,
            }
        }
        Ok(drawn)
    }
}

fn write_interleaved(states: &mut [SourceState], out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(out_path)?;
    let mut writer = BufWriter::new(file);

    let mut remaining = states.len();
    while remaining > 0 {
        remaining = 0;
        for state in states.iter_mut() {
            if let Some(doc) = state.docs.pop_front() {
                writeln!(writer, "{doc}")?;
            }
            if !state.docs.is_empty() {
                remaining += 1;
            }
        }
    }

    writer.flush()?;
    Ok(())
}
