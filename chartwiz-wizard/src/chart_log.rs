//! Chart log: JSONL append-only record of generated payloads.
//!
//! One payload per line, so a torn final write only loses that line.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chartwiz_core::domain::ChartPayload;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ChartLog {
    path: PathBuf,
}

impl ChartLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, payload: &ChartPayload) -> io::Result<()> {
        let json = serde_json::to_string(payload)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(file, "{json}")?;
        file.flush()
    }

    /// Read every payload back. Malformed lines are logged and skipped.
    pub fn read_all(&self) -> io::Result<Vec<ChartPayload>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)?;
        let reader = io::BufReader::new(file);
        let mut payloads = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<ChartPayload>(line) {
                Ok(payload) => payloads.push(payload),
                Err(e) => {
                    warn!(line = line_num + 1, error = %e, "skipping malformed chart log line");
                }
            }
        }

        Ok(payloads)
    }
}
