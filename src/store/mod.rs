//! File and in-memory implementations of the persistence traits

pub mod activity_log;
pub mod json_file;
pub mod memory;
pub mod threshold;

pub use activity_log::FileActivityLog;
pub use json_file::JsonFavoritesStore;
pub use memory::{MemoryActivityLog, MemoryFavoritesStore};
pub use threshold::RatingThresholdStore;

use anyhow::{Context, Result};
use std::path::Path;

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
