use crate::errors::TrafficError;
use crate::models::RunStamp;
use crate::report::CSV_HEADER;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub const DEFAULT_REPORT_PATH: &str = "github_stats.txt";

pub fn csv_path(dir: &Path, stamp: &RunStamp) -> PathBuf {
    dir.join(format!("{}-traffic-stats.csv", stamp.label()))
}

/// Append-mode handle held for a whole run.
pub struct AppendSink {
    path: PathBuf,
    file: File,
    written: u64,
}

impl AppendSink {
    pub async fn open(path: &Path) -> Result<Self, TrafficError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path).await?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            written: 0,
        })
    }

    /// Opens a CSV log, writing the header when the file is empty.
    pub async fn open_csv(path: &Path) -> Result<Self, TrafficError> {
        let mut sink = Self::open(path).await?;
        if sink.file.metadata().await?.len() == 0 {
            sink.write(CSV_HEADER).await?;
        }
        Ok(sink)
    }

    /// Writes `text` with a single call so a block never lands half-written.
    pub async fn write(&mut self, text: &str) -> Result<(), TrafficError> {
        self.file.write_all(text.as_bytes()).await?;
        self.written += text.len() as u64;
        Ok(())
    }

    pub async fn finish(mut self) -> Result<(), TrafficError> {
        self.file.flush().await?;
        debug!("appended {} bytes to {}", self.written, self.path.display());
        Ok(())
    }
}
