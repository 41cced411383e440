use super::ensure_parent_dir;
use crate::core::activity::ActivityLog;
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Appends timestamped lines to a text file.
///
/// Write failures are reported through `tracing` and otherwise ignored, the
/// activity log never interrupts the operation being logged.
pub struct FileActivityLog {
    path: PathBuf,
}

impl FileActivityLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        ensure_parent_dir(&self.path).map_err(std::io::Error::other)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl ActivityLog for FileActivityLog {
    fn log(&self, message: &str) {
        info!(target: "stockwatch::activity", "{}", message);
        let line = format!("{} - {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message);
        if let Err(e) = self.append(&line) {
            warn!("Failed to write activity log {}: {}", self.path.display(), e);
        }
    }

    fn last_lines(&self, count: usize) -> Vec<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => content
                .lines()
                .rev()
                .take(count)
                .map(str::to_string)
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_log_has_no_lines() {
        let dir = tempdir().unwrap();
        let log = FileActivityLog::new(dir.path().join("activity.log"));
        assert!(log.last_lines(20).is_empty());
    }

    #[test]
    fn test_lines_are_timestamped_and_newest_first() {
        let dir = tempdir().unwrap();
        let log = FileActivityLog::new(dir.path().join("logs").join("activity.log"));

        log.log("first");
        log.log("second");
        log.log("third");

        let lines = log.last_lines(2);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - third"));
        assert!(lines[1].ends_with(" - second"));
        // "YYYY-MM-DD HH:MM:SS - "
        assert_eq!(&lines[0][19..22], " - ");
    }
}
