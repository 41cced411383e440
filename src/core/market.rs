//! Market data abstractions

use crate::core::stock::PricePoint;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest intraday price, `None` when the provider has nothing for today.
    async fn intraday_price(&self, symbol: &str) -> Result<Option<f64>>;

    /// Up to `count` daily closing prices on working days, most recent first.
    async fn daily_prices(&self, symbol: &str, count: usize) -> Result<Vec<PricePoint>>;
}
