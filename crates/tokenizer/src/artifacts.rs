use crate::config::{ArtifactsCfg, Config};
use crate::errors::{Error, Result};
use crate::types::{ArtifactManifest, ArtifactPaths};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

const TOKENIZER_JSON_ERR: &str = "tokenizer json not found at";
const MANIFEST_ERR: &str = "manifest not found at";

/// Resolve artifact file names against the artifact directory.
pub fn resolve_paths(cfg: &ArtifactsCfg) -> ArtifactPaths {
    ArtifactPaths {
        tokenizer_json: absolute_in_dir(&cfg.dir, &cfg.tokenizer_json),
        manifest: absolute_in_dir(&cfg.dir, &cfg.manifest),
    }
}

pub fn load_tokenizer_from_json(path: &Path) -> Result<Tokenizer> {
    ensure_file(path, TOKENIZER_JSON_ERR)?;
    Tokenizer::from_file(path).map_err(Error::from)
}

pub fn save_tokenizer_json(tok: &Tokenizer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    tok.save(path, true).map_err(Error::from)
}

pub fn write_manifest(manifest_path: &Path, manifest: &ArtifactManifest) -> Result<()> {
    if let Some(parent) = manifest_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(manifest_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manifest)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_manifest(manifest_path: &Path) -> Result<ArtifactManifest> {
    ensure_file(manifest_path, MANIFEST_ERR)?;
    let file = File::open(manifest_path)?;
    let reader = BufReader::new(file);
    let manifest = serde_json::from_reader(reader)?;
    Ok(manifest)
}

/// Hash of the configuration plus the saved artifact files, recorded in the
/// manifest so a reloaded artifact can be traced back to its run.
pub fn compute_config_hash(cfg: &Config, extra_paths: &[&Path]) -> Result<String> {
    let mut hasher = Sha256::new();
    let cfg_bytes = serde_json::to_vec(cfg)?;
    hasher.update(&cfg_bytes);

    let mut sorted = extra_paths.to_vec();
    sorted.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    let mut buffer = [0u8; 8 * 1024];
    for path in sorted {
        ensure_file(path, "cannot hash missing file at")?;
        hasher.update(path.to_string_lossy().as_bytes());

        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn absolute_in_dir(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || path.starts_with(dir) {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

fn ensure_file(path: &Path, context: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::Artifact(format!("{context} {}", path.display())))
    }
}
