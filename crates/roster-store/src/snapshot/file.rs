//! Snapshot file: CSV encoding, atomic write, and read-back

use super::atomic::atomic_write;
use super::table::{Snapshot, SnapshotRow};
use crate::errors::{from_csv_read, from_csv_write, io_error, Result};
use roster_core::errors::{reason, RosterError, RosterErrorKind};
use roster_core::model::FetchResult;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of a successful snapshot write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub path: PathBuf,
    pub rows: usize,
    /// SHA-256 of the written bytes, lowercase hex
    pub digest: String,
}

/// A snapshot location on disk
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stage a fetched page, replacing any previous snapshot
    ///
    /// An empty page is rejected with reason `empty` and the existing file is
    /// left as it was.
    pub fn write(&self, fetched: &FetchResult) -> Result<SnapshotSummary> {
        let snapshot = Snapshot::from_records(&fetched.records).ok_or_else(|| {
            RosterError::new(RosterErrorKind::WriteFailure)
                .with_reason(reason::EMPTY)
                .with_op("snapshot_write")
                .with_message("refusing to replace snapshot with an empty page")
        })?;

        let bytes = encode(&snapshot)?;
        atomic_write(&self.path, &bytes)?;

        let digest = hex::encode(Sha256::digest(&bytes));
        tracing::debug!(
            path = %self.path.display(),
            rows = snapshot.len(),
            digest = %digest,
            "snapshot written"
        );

        Ok(SnapshotSummary {
            path: self.path.clone(),
            rows: snapshot.len(),
            digest,
        })
    }

    /// Read the whole snapshot into memory
    pub fn read(&self) -> Result<Snapshot> {
        let reader = self.open_reader()?;
        let fields = reader.fields.clone();
        let rows = reader.collect::<Result<Vec<_>>>()?;
        Ok(Snapshot::from_parts(fields, rows))
    }

    /// Open the snapshot for row-by-row reading
    ///
    /// Fails with `missing_header` when the file has no header line.
    pub fn open_reader(&self) -> Result<SnapshotReader> {
        let file = File::open(&self.path)
            .map_err(|e| io_error(RosterErrorKind::ReadFailure, "snapshot_open", e))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let header = reader
            .headers()
            .map_err(|e| from_csv_read("snapshot_header", e))?;
        if header.is_empty() || header.iter().all(str::is_empty) {
            return Err(RosterError::new(RosterErrorKind::ReadFailure)
                .with_reason(reason::MISSING_HEADER)
                .with_op("snapshot_header")
                .with_message(format!("no header line in {}", self.path.display())));
        }
        let fields: Arc<[String]> = header.iter().map(str::to_string).collect();

        Ok(SnapshotReader {
            fields,
            records: reader.into_records(),
        })
    }
}

/// Streaming reader over a snapshot file
pub struct SnapshotReader {
    fields: Arc<[String]>,
    records: csv::StringRecordsIntoIter<File>,
}

impl SnapshotReader {
    /// Header fields in column order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether the header carries a column
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

impl Iterator for SnapshotReader {
    type Item = Result<SnapshotRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map_err(|e| from_csv_read("snapshot_row", e))
                .map(|record| {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    let values = record.iter().map(str::to_string).collect();
                    SnapshotRow::new(line, self.fields.clone(), values)
                }),
        )
    }
}

fn encode(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(snapshot.fields())
        .map_err(|e| from_csv_write("snapshot_encode", e))?;
    for row in snapshot.rows() {
        writer
            .write_record(row.values())
            .map_err(|e| from_csv_write("snapshot_encode", e))?;
    }

    writer.into_inner().map_err(|e| {
        RosterError::new(RosterErrorKind::WriteFailure)
            .with_reason(reason::IO)
            .with_op("snapshot_encode")
            .with_message(e.to_string())
    })
}
