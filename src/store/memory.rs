use crate::core::activity::ActivityLog;
use crate::core::favorites::FavoritesStore;
use crate::core::stock::Stock;
use anyhow::{Result, anyhow};
use std::sync::Mutex;
use tracing::debug;

/// Favorites kept in memory, used by tests and dry runs.
#[derive(Default)]
pub struct MemoryFavoritesStore {
    inner: Mutex<Vec<Stock>>,
}

impl MemoryFavoritesStore {
    pub fn new(stocks: Vec<Stock>) -> Self {
        Self {
            inner: Mutex::new(stocks),
        }
    }
}

impl FavoritesStore for MemoryFavoritesStore {
    fn load(&self) -> Result<Vec<Stock>> {
        let stocks = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Favorites lock poisoned"))?;
        Ok(stocks.clone())
    }

    fn save(&self, stocks: &[Stock]) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Favorites lock poisoned"))?;
        debug!("Saving {} favorites in memory", stocks.len());
        *inner = stocks.to_vec();
        Ok(())
    }
}

/// Activity log kept in memory.
#[derive(Default)]
pub struct MemoryActivityLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActivityLog for MemoryActivityLog {
    fn log(&self, message: &str) {
        debug!("{}", message);
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_string());
        }
    }

    fn last_lines(&self, count: usize) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().rev().take(count).cloned().collect())
            .unwrap_or_default()
    }
}
