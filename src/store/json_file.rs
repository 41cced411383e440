use super::ensure_parent_dir;
use crate::core::favorites::FavoritesStore;
use crate::core::stock::Stock;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Favorites stored as a pretty-printed JSON array in a single file.
pub struct JsonFavoritesStore {
    path: PathBuf,
}

impl JsonFavoritesStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStore for JsonFavoritesStore {
    /// A missing file or a `null` document is an empty list.
    fn load(&self) -> Result<Vec<Stock>> {
        if !self.path.exists() {
            debug!("No favorites file at {}", self.path.display());
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read favorites: {}", self.path.display()))?;
        let stocks: Option<Vec<Stock>> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse favorites: {}", self.path.display()))?;
        Ok(stocks.unwrap_or_default())
    }

    fn save(&self, stocks: &[Stock]) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        let json = serde_json::to_string_pretty(stocks)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write favorites: {}", self.path.display()))?;
        debug!("Saved {} favorites to {}", stocks.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFavoritesStore::new(dir.path().join("favorites.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_null_document_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, "null").unwrap();
        assert!(JsonFavoritesStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_directories_and_reloads() {
        let dir = tempdir().unwrap();
        let store = JsonFavoritesStore::new(dir.path().join("nested").join("favorites.json"));

        let mut stock = Stock::new("AAPL");
        stock.add_price(NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(), 196.45);
        store.save(&[stock.clone(), Stock::new("MSFT")]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![stock, Stock::new("MSFT")]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, "{not json").unwrap();

        let result = JsonFavoritesStore::new(&path).load();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse favorites")
        );
    }
}
