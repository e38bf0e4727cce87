use crate::analysis::TimeWindow;
use crate::model::Call;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Destination for exported documents
pub trait ExportSink {
    /// Deliver `contents` under `file_name`, returning where it ended up
    fn export(&mut self, file_name: &str, contents: &str) -> Result<String>;
}

/// Writes exports as files into a directory
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectorySink {
    fn export(&mut self, file_name: &str, contents: &str) -> Result<String> {
        if !self.dir.is_dir() {
            return Err(Error::Export(format!(
                "Not a directory: {}",
                self.dir.display()
            )));
        }

        let path = self.dir.join(file_name);
        tracing::debug!("Writing export to: {}", path.display());

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;

        tracing::info!("Exported {} bytes to {}", contents.len(), path.display());
        Ok(path.display().to_string())
    }
}

/// Keeps exports in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: Vec<(String, String)>,
}

impl ExportSink for MemorySink {
    fn export(&mut self, file_name: &str, contents: &str) -> Result<String> {
        self.files.push((file_name.to_string(), contents.to_string()));
        Ok(file_name.to_string())
    }
}

/// `api-calls-<window>-<YYYY-MM-DD>.json`
pub fn export_file_name(window: TimeWindow, now: DateTime<Utc>) -> String {
    format!("api-calls-{}-{}.json", window.label(), now.format("%Y-%m-%d"))
}

/// Serialize calls to the formatted export document
pub fn export_document(calls: &[&Call]) -> Result<String> {
    Ok(serde_json::to_string_pretty(calls)?)
}
