use crate::corpora::{DocumentCorpus, TextCorpus};
use crate::errors::{Error, Result};
use crate::normalize::char_count;
use crate::sampler::LanguageCorpus;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Character budget assigned to one language within a balanced dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub language: String,
    pub chars: u64,
}

/// Equal split of `total` across `languages`. The first `total % n`
/// languages absorb the remainder so the allocations sum exactly to the
/// declared total.
pub fn equal_allocations(languages: &[String], total: u64) -> Vec<Allocation> {
    let n = languages.len() as u64;
    if n == 0 {
        return Vec::new();
    }
    let base = total / n;
    let remainder = total % n;
    languages
        .iter()
        .enumerate()
        .map(|(i, language)| Allocation {
            language: language.clone(),
            chars: if (i as u64) < remainder { base + 1 } else { base },
        })
        .collect()
}

/// A merged multilingual corpus with exact per-language allocations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BalancedDataset {
    pub total_chars: u64,
    pub path: PathBuf,
    pub allocations: Vec<Allocation>,
}

#[derive(Clone, Debug)]
pub struct AssembleOptions {
    /// Seed for the shuffle of language sections in the merged output.
    pub seed: u64,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// Merge per-language samples into a balanced corpus at `out_path`.
///
/// Every language section is cut to exactly its allocation (the final
/// document is truncated on a char boundary if needed), then the section
/// order is shuffled with the seeded RNG before writing. The first
/// allocation that its sample cannot cover aborts the whole assembly; no
/// partially balanced corpus is ever written.
pub fn assemble(
    samples: &[LanguageCorpus],
    allocations: &[Allocation],
    out_path: &Path,
    opts: &AssembleOptions,
) -> Result<BalancedDataset> {
    if allocations.is_empty() {
        return Err(Error::Config("no allocations to assemble".into()));
    }

    let mut sections = Vec::with_capacity(allocations.len());
    for allocation in allocations {
        if allocation.chars == 0 {
            return Err(Error::Config(format!(
                "allocation for '{}' must be greater than zero",
                allocation.language
            )));
        }

        let sample = samples
            .iter()
            .find(|s| s.language == allocation.language)
            .ok_or_else(|| {
                Error::Config(format!(
                    "no sample provided for allocated language '{}'",
                    allocation.language
                ))
            })?;

        if sample.char_count < allocation.chars {
            return Err(Error::InsufficientData {
                language: allocation.language.clone(),
                requested: allocation.chars,
                available: sample.char_count,
            });
        }

        sections.push(read_section(sample, allocation.chars)?);
    }

    let mut rng = StdRng::seed_from_u64(opts.seed);
    sections.shuffle(&mut rng);

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(out_path)?;
    let mut writer = BufWriter::new(file);
    for section in &sections {
        for doc in &section.documents {
            writeln!(writer, "{doc}")?;
        }
    }
    writer.flush()?;

    Ok(BalancedDataset {
        total_chars: allocations.iter().map(|a| a.chars).sum(),
        path: out_path.to_path_buf(),
        allocations: allocations.to_vec(),
    })
}

/// Write the dataset description next to the corpus file.
pub fn write_manifest(dataset: &BalancedDataset, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, dataset)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Per-language statistics in CSV form, one row per allocation.
pub fn write_stats_csv(
    dataset: &BalancedDataset,
    samples: &[LanguageCorpus],
    path: &Path,
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "language,allocated_chars,sampled_chars")?;
    for allocation in &dataset.allocations {
        let sampled = samples
            .iter()
            .find(|s| s.language == allocation.language)
            .map(|s| s.char_count)
            .unwrap_or(0);
        writeln!(
            writer,
            "{},{},{}",
            allocation.language, allocation.chars, sampled
        )?;
    }
    writer.flush()?;
    Ok(())
}

struct Section {
    documents: Vec<String>,
}

/// Read documents from a sample until exactly `budget` characters are
/// accumulated, truncating the final document on a char boundary.
fn read_section(sample: &LanguageCorpus, budget: u64) -> Result<Section> {
    let corpus = DocumentCorpus::new(vec![sample.path.clone()])?;
    let mut documents = Vec::new();
    let mut taken = 0u64;

    for doc in corpus.stream()? {
        if taken >= budget {
            break;
        }
        let doc = doc?;
        let len = char_count(&doc);
        let remaining = budget - taken;
        if len <= remaining {
            taken += len;
            documents.push(doc);
        } else {
            let cut: String = doc.chars().take(remaining as usize).collect();
            taken += remaining;
            documents.push(cut);
        }
    }

    if taken < budget {
        // The sample file no longer covers its recorded char count.
        return Err(Error::InsufficientData {
            language: sample.language.clone(),
            requested: budget,
            available: taken,
        });
    }

    Ok(Section { documents })
}
