use crate::artifacts::{
    compute_config_hash, resolve_paths, save_tokenizer_json, write_manifest,
};
use crate::config::{Algorithm, Config, ModelCfg};
use crate::errors::{Error, Result};
use crate::pretokenizer::{build_decoder, build_pre_tokenizer};
use crate::types::ArtifactManifest;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokenizers::models::bpe::{BpeTrainer, BPE};
use tokenizers::models::unigram::{Unigram, UnigramTrainer};
use tokenizers::models::wordpiece::{WordPiece, WordPieceTrainer};
use tokenizers::models::{ModelWrapper, TrainerWrapper};
use tokenizers::normalizers::unicode::NFC;
use tokenizers::normalizers::NormalizerWrapper;
use tokenizers::tokenizer::AddedToken;
use tokenizers::Tokenizer;

const SHUFFLE_CHUNK_SIZE: usize = 2048;

pub fn train_from_corpus(cfg: &Config) -> Result<Tokenizer> {
    if cfg.training.inputs.is_empty() {
        return Err(Error::InvalidConfig(
            "training inputs must contain at least one path".into(),
        ));
    }

    for path in &cfg.training.inputs {
        if !path.is_file() {
            return Err(Error::Artifact(format!(
                "training input not found at {}",
                path.display()
            )));
        }
    }

    if let Some(num_threads) = cfg.training.num_threads {
        std::env::set_var("RAYON_NUM_THREADS", num_threads.to_string());
        tokenizers::utils::parallelism::set_parallelism(num_threads > 1);
    }

    let mut tokenizer = Tokenizer::new(build_model(&cfg.model)?);
    tokenizer.with_normalizer(NormalizerWrapper::from(NFC));
    tokenizer.with_pre_tokenizer(build_pre_tokenizer(cfg.model.algorithm));
    tokenizer.with_decoder(build_decoder(cfg.model.algorithm));

    let mut trainer = build_trainer(&cfg.model)?;
    let mut corpus = CorpusIterator::new(
        cfg.training.inputs.clone(),
        cfg.training.shuffle,
        cfg.training.seed,
        cfg.training.max_lines,
    );

    tokenizer
        .train(&mut trainer, corpus.by_ref())
        .map_err(|err| Error::Training(err.to_string()))?;

    if let Some(err) = corpus.take_error() {
        return Err(err);
    }

    if cfg.model.algorithm == Algorithm::Wordpiece {
        // The trainer rebuilds the model; restore the configured unk token.
        if let (ModelWrapper::WordPiece(wordpiece), Some(unk)) =
            (tokenizer.get_model(), cfg.model.unk_token.as_ref())
        {
            let mut wordpiece = wordpiece.clone();
            wordpiece.unk_token = unk.clone();
            tokenizer.with_model(wordpiece);
        }
    }

    let paths = resolve_paths(&cfg.artifacts);
    save_tokenizer_json(&tokenizer, &paths.tokenizer_json)?;

    let cfg_hash = compute_config_hash(cfg, &[paths.tokenizer_json.as_path()])?;
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Artifact(format!("failed to compute timestamp: {e}")))?
        .as_secs();

    let manifest = ArtifactManifest {
        cfg_hash,
        created_at: format!("unix:{created_at}"),
        algorithm: cfg.model.algorithm,
        vocab_size: cfg.model.vocab_size,
        token_count: tokenizer.get_vocab_size(true),
    };
    write_manifest(&paths.manifest, &manifest)?;

    Ok(tokenizer)
}

fn build_model(model: &ModelCfg) -> Result<ModelWrapper> {
    match model.algorithm {
        Algorithm::Bpe => Ok(BPE::default().into()),
        Algorithm::Wordpiece => {
            let unk = required_unk(model)?;
            let wordpiece = WordPiece::builder()
                .unk_token(unk.to_string())
                .build()
                .map_err(Error::from)?;
            Ok(wordpiece.into())
        }
        Algorithm::Unigram => Ok(Unigram::default().into()),
    }
}

fn build_trainer(model: &ModelCfg) -> Result<TrainerWrapper> {
    let special_tokens: Vec<AddedToken> = model
        .special_tokens
        .iter()
        .cloned()
        .map(|token| AddedToken::from(token, true))
        .collect();

    let trainer = match model.algorithm {
        Algorithm::Bpe => BpeTrainer::builder()
            .vocab_size(model.vocab_size)
            .min_frequency(model.min_frequency.into())
            .show_progress(false)
            .special_tokens(special_tokens)
            .build()
            .into(),
        Algorithm::Wordpiece => WordPieceTrainer::builder()
            .vocab_size(model.vocab_size)
            .min_frequency(model.min_frequency.into())
            .show_progress(false)
            .special_tokens(special_tokens)
            .build()
            .into(),
        Algorithm::Unigram => {
            let unk = required_unk(model)?;
            UnigramTrainer::builder()
                .vocab_size(model.vocab_size as u32)
                .show_progress(false)
                .special_tokens(special_tokens)
                .unk_token(Some(unk.to_string()))
                .build()
                .map_err(|e| Error::InvalidConfig(format!("unigram trainer: {e}")))?
                .into()
        }
    };

    Ok(trainer)
}

fn required_unk(model: &ModelCfg) -> Result<&str> {
    model.unk_token.as_deref().ok_or_else(|| {
        Error::InvalidConfig(format!("{} requires model.unk_token", model.algorithm))
    })
}

/// Streams corpus lines into the library trainer with bounded memory. With
/// `shuffle` enabled the file order and each chunk of lines are shuffled
/// under the configured seed; otherwise lines arrive strictly in file
/// order. IO errors cannot surface through the `Iterator` contract, so
/// they are parked and must be collected with [`CorpusIterator::take_error`]
/// after training.
struct CorpusIterator {
    files: VecDeque<PathBuf>,
    reader: Option<BufReader<File>>,
    buffer: VecDeque<String>,
    rng: Option<StdRng>,
    max_lines: Option<usize>,
    produced: usize,
    error: Option<Error>,
}

impl CorpusIterator {
    fn new(mut inputs: Vec<PathBuf>, shuffle: bool, seed: u64, max_lines: Option<usize>) -> Self {
        let rng = if shuffle {
            let mut rng = StdRng::seed_from_u64(seed);
            inputs.shuffle(&mut rng);
            Some(rng)
        } else {
            None
        };

        Self {
            files: VecDeque::from(inputs),
            reader: None,
            buffer: VecDeque::new(),
            rng,
            max_lines,
            produced: 0,
            error: None,
        }
    }

    fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    fn limit_reached(&self) -> bool {
        self.max_lines
            .map_or(false, |limit| self.produced >= limit)
    }

    fn refill(&mut self) -> Result<bool> {
        while self.buffer.is_empty() {
            if self.limit_reached() {
                return Ok(false);
            }

            if self.reader.is_none() {
                let next = match self.files.pop_front() {
                    Some(path) => path,
                    None => return Ok(false),
                };
                self.reader = Some(BufReader::new(File::open(next)?));
            }

            let mut chunk = Vec::with_capacity(SHUFFLE_CHUNK_SIZE);
            while chunk.len() < SHUFFLE_CHUNK_SIZE {
                let mut line = String::new();
                let read = self
                    .reader
                    .as_mut()
                    .expect("reader is set while filling a chunk")
                    .read_line(&mut line)?;
                if read == 0 {
                    self.reader = None;
                    break;
                }
                while line.ends_with(['\r', '\n']) {
                    line.pop();
                }
                if !line.is_empty() {
                    chunk.push(line);
                }
            }

            if let Some(rng) = self.rng.as_mut() {
                chunk.shuffle(rng);
            }
            self.buffer.extend(chunk);
        }

        Ok(true)
    }
}

impl Iterator for CorpusIterator {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() || self.limit_reached() {
            return None;
        }

        match self.refill() {
            Ok(true) => {
                let line = self.buffer.pop_front()?;
                self.produced += 1;
                Some(line)
            }
            Ok(false) => None,
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .max_lines
            .map(|limit| limit.saturating_sub(self.produced));
        (0, remaining)
    }
}
