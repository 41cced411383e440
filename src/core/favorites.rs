//! Persistence of the favorite stocks list

use crate::core::stock::Stock;
use anyhow::Result;

pub trait FavoritesStore: Send + Sync {
    fn load(&self) -> Result<Vec<Stock>>;

    fn save(&self, stocks: &[Stock]) -> Result<()>;
}
