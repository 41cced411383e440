use super::ensure_parent_dir;
use crate::core::rating::is_valid_rating;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The user's rating threshold, stored as a single number in a text file.
pub struct RatingThresholdStore {
    path: PathBuf,
    default: i32,
}

impl RatingThresholdStore {
    pub fn new<P: AsRef<Path>>(path: P, default: i32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            default,
        }
    }

    /// Stored threshold, or the default when nothing usable is stored.
    pub fn get(&self) -> i32 {
        let Ok(content) = fs::read_to_string(&self.path) else {
            debug!("No rating threshold stored, using {}", self.default);
            return self.default;
        };

        match content.trim().parse::<i32>() {
            Ok(value) if is_valid_rating(value) => value,
            _ => {
                warn!(
                    "Ignoring invalid rating threshold '{}' in {}",
                    content.trim(),
                    self.path.display()
                );
                self.default
            }
        }
    }

    pub fn set(&self, value: i32) -> Result<()> {
        if !is_valid_rating(value) {
            bail!("Rating threshold {value} is outside of [-10, 10]");
        }
        ensure_parent_dir(&self.path)?;
        fs::write(&self.path, value.to_string()).with_context(|| {
            format!("Failed to write rating threshold: {}", self.path.display())
        })
    }
}
