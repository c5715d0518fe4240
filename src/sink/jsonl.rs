//! Local JSONL sink.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{PostRow, PostSink, SinkError};

/// Appends one JSON object per line to a local file.
///
/// The default destination when no spreadsheet is configured; also handy for
/// keeping a local audit trail alongside the spreadsheet.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file rows are appended to.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn append_line(&self, row: &PostRow) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(row)?;
        writeln!(file, "{}", json)?;
        file.sync_all()?;

        Ok(())
    }
}

#[async_trait]
impl PostSink for JsonlSink {
    async fn append(&self, row: &PostRow) -> Result<(), SinkError> {
        self.append_line(row)
    }
}
