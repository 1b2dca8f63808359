//! Intrinsic tokenizer evaluation.
//!
//! Two metrics are computed per (language, tokenizer) pair:
//!
//! - **Normalized Sequence Length (NSL)**: tokenized length divided by a
//!   reference segmentation length. Lower means more compact output.
//! - **Subword Fertility**: subword tokens per word. Lower means less
//!   fragmentation; it is at least 1.0 whenever the text contains a word.
//!
//! The reference segmentation is configurable: character counts (the
//! default, meaningful for every script) or whitespace-delimited words.
//! Evaluation is read-only and deterministic; the only shared sink is the
//! [`ReportTable`], which serializes appends so evaluations may run
//! concurrently.

pub mod errors;
pub mod metrics;
pub mod record;
pub mod report;

pub use errors::{Error, Result};
pub use metrics::{evaluate, evaluate_file, MetricsAccumulator, Reference, TextMetrics};
pub use record::MetricRecord;
pub use report::{write_report_csv, ReportTable};
