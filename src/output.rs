use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::app::{
    DownloadUrlEntry, HarvestResult, ProgressEvent, ProgressSink, ProgressSinkKind, SeriesListing,
};
use crate::catalog::DataTypeCatalog;
use crate::error::HarvestError;
use crate::metadata::MetadataRecord;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_harvest(result: &HarvestResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_series(result: &SeriesListing) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_data_types(catalog: &DataTypeCatalog) -> io::Result<()> {
        Self::print_json(&catalog.iter().collect::<Vec<_>>())
    }

    pub fn print_urls(entries: &[DownloadUrlEntry]) -> io::Result<()> {
        Self::print_json(&entries)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

pub struct LogProgress {
    kind: ProgressSinkKind,
}

impl LogProgress {
    pub fn new(kind: ProgressSinkKind) -> Self {
        Self { kind }
    }
}

impl ProgressSink for LogProgress {
    fn event(&self, event: ProgressEvent) {
        let kind = format!("{:?}", self.kind).to_lowercase();
        match event.elapsed {
            Some(elapsed) => tracing::info!(
                %kind,
                elapsed_ms = elapsed.as_millis() as u64,
                "{}",
                event.message
            ),
            None => tracing::info!(%kind, "{}", event.message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordWriter {
    root: Utf8PathBuf,
}

impl RecordWriter {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn record_path(&self, record: &MetadataRecord) -> Utf8PathBuf {
        self.root
            .join(format!("{}.json", sanitize_file_stem(&record.identifier)))
    }

    pub fn write_all(&self, records: &[MetadataRecord]) -> Result<Vec<Utf8PathBuf>, HarvestError> {
        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| HarvestError::Filesystem(err.to_string()))?;
        records.iter().map(|record| self.write(record)).collect()
    }

    pub fn write(&self, record: &MetadataRecord) -> Result<Utf8PathBuf, HarvestError> {
        let path = self.record_path(record);
        let json = serde_json::to_vec_pretty(record)
            .map_err(|err| HarvestError::Filesystem(err.to_string()))?;
        // Temp file in the target directory so the final rename stays atomic.
        let mut temp = NamedTempFile::new_in(self.root.as_std_path())
            .map_err(|err| HarvestError::Filesystem(err.to_string()))?;
        temp.write_all(&json)
            .map_err(|err| HarvestError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| HarvestError::Filesystem(format!("persist {path}: {}", err.error)))?;
        tracing::debug!(%path, "record written");
        Ok(path)
    }
}

fn sanitize_file_stem(identifier: &str) -> String {
    identifier
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}
