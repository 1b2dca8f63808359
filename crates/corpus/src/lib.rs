//! Corpus sampling and balanced multilingual dataset assembly.
//!
//! Source corpora are UTF-8 extract files holding one document per line
//! (the format produced by Wikipedia/OSCAR extraction). [`sample_language`]
//! draws a per-language sample up to a character budget, cleaning and
//! NFC-normalizing each document before its characters are counted, and
//! stopping at the first document boundary at or after the target.
//! [`assemble`] merges per-language samples into a single balanced corpus
//! in which every language contributes exactly its allocated character
//! count.
//!
//! Sampling is deterministic: documents are consumed in file order, so the
//! same sources and target always produce character-identical output. The
//! only randomness in the crate is the seeded shuffle of language sections
//! during assembly.

pub mod corpora;
pub mod dataset;
pub mod errors;
pub mod normalize;
pub mod sampler;

pub use corpora::{DocumentCorpus, DocumentStream, TextCorpus};
pub use dataset::{
    assemble, equal_allocations, write_manifest, write_stats_csv, Allocation,
    AssembleOptions, BalancedDataset,
};
pub use errors::{Error, Result};
pub use sampler::{sample_language, LanguageCorpus, SampleSpec};
