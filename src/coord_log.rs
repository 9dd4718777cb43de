use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::error::TrackerError;
use crate::models::MappedPoint;

/// File name for run number `index`.
pub fn log_file_name(index: u32) -> String {
    format!("target_coordinates_{:03}.txt", index)
}

/// First `target_coordinates_NNN.txt` in `dir` that does not exist yet, counting from 001.
pub fn next_available_path(dir: &Path) -> PathBuf {
    let mut index = 1;
    loop {
        let path = dir.join(log_file_name(index));
        if !path.exists() {
            return path;
        }
        index += 1;
    }
}

/// `YYYY-MM-DD HH:MM:SS.ffffff`, independent of locale.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, TrackerError> {
    let format = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]"
    );
    Ok(at.format(&format)?)
}

/// One log line, newline included.
pub fn format_line(point: MappedPoint, at: OffsetDateTime) -> Result<String, TrackerError> {
    Ok(format!("{:.2},{:.2},{}\n", point.x, point.y, format_timestamp(at)?))
}

/// Local wall-clock time, falling back to UTC when the offset is unknown.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Append-only log of mapped target coordinates for a single run.
///
/// The file is created on the first [`CoordinateLog::append`], so a run that
/// never logs a point leaves nothing behind.
pub struct CoordinateLog {
    path: PathBuf,
    file: Option<File>,
}

impl CoordinateLog {
    /// Pick the next free file name in `dir`.
    pub fn create_in(dir: &Path) -> Result<Self, TrackerError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self::open(next_available_path(dir)))
    }

    pub fn open(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, point: MappedPoint, at: OffsetDateTime) -> Result<(), TrackerError> {
        let line = format_line(point, at)?;
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
                debug!("Created coordinate log {}", self.path.display());
                file
            }
        };
        self.file.insert(file).write_all(line.as_bytes())?;
        Ok(())
    }
}
