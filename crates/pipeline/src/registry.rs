use crate::errors::{Error, Result};
use crate::run::{ArtifactEntry, RunManifest};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tokenizer::Algorithm;

/// Read-only index over a finished run's trained tokenizers, keyed by
/// (algorithm, vocab size, scale). This is the surface downstream
/// fine-tuning harnesses consume.
#[derive(Debug, Clone)]
pub struct ArtifactRegistry {
    entries: Vec<ArtifactEntry>,
}

impl ArtifactRegistry {
    /// Load from a `run-manifest.json`, cross-checking each entry against
    /// its own artifact manifest on disk.
    pub fn load(run_manifest: &Path) -> Result<Self> {
        let file = File::open(run_manifest).map_err(|err| {
            Error::Registry(format!(
                "cannot open run manifest {}: {err}",
                run_manifest.display()
            ))
        })?;
        let manifest: RunManifest = serde_json::from_reader(BufReader::new(file))?;
        Self::from_entries(manifest.artifacts)
    }

    pub fn from_entries(entries: Vec<ArtifactEntry>) -> Result<Self> {
        for entry in &entries {
            if !entry.tokenizer_json.is_file() {
                return Err(Error::Registry(format!(
                    "tokenizer json missing for {} at vocab {}: {}",
                    entry.algorithm,
                    entry.vocab_size,
                    entry.tokenizer_json.display()
                )));
            }

            let manifest = tokenizer::read_manifest(&entry.manifest)
                .map_err(|err| Error::Registry(err.to_string()))?;
            if manifest.algorithm != entry.algorithm
                || manifest.vocab_size != entry.vocab_size
            {
                return Err(Error::Registry(format!(
                    "artifact manifest at {} disagrees with the run manifest \
                     ({} vocab {} vs {} vocab {})",
                    entry.manifest.display(),
                    manifest.algorithm,
                    manifest.vocab_size,
                    entry.algorithm,
                    entry.vocab_size
                )));
            }
        }

        Ok(Self { entries })
    }

    pub fn lookup(
        &self,
        algorithm: Algorithm,
        vocab_size: usize,
        scale: u64,
    ) -> Option<&ArtifactEntry> {
        self.entries.iter().find(|entry| {
            entry.algorithm == algorithm
                && entry.vocab_size == vocab_size
                && entry.scale == scale
        })
    }

    pub fn entries(&self) -> &[ArtifactEntry] {
        &self.entries
    }
}
