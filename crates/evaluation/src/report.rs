use crate::errors::Result;
use crate::record::MetricRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Shared sink for metric records. Appends are serialized so evaluations
/// of different combinations may run concurrently.
#[derive(Debug, Default)]
pub struct ReportTable {
    records: Mutex<Vec<MetricRecord>>,
}

impl ReportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: MetricRecord) {
        self.records
            .lock()
            .expect("report table lock poisoned")
            .push(record);
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .expect("report table lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the table, returning records sorted by
    /// language × algorithm × vocab size × scale.
    pub fn into_sorted(self) -> Vec<MetricRecord> {
        let mut records = self
            .records
            .into_inner()
            .expect("report table lock poisoned");
        records.sort_by_key(|r| r.sort_key());
        records
    }
}

/// Write records as CSV, one row per (language, configuration) pair.
pub fn write_report_csv(records: &[MetricRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "language,algorithm,vocab_size,scale,nsl,fertility")?;
    for record in records {
        writeln!(
            writer,
            "{},{},{},{},{:.6},{:.6}",
            record.language,
            record.algorithm,
            record.vocab_size,
            record.scale,
            record.nsl,
            record.fertility
        )?;
    }
    writer.flush()?;
    Ok(())
}
