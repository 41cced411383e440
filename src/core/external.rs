//! Downstream API receiving the results of filtering and rating

use crate::core::stock::StockTransaction;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ExternalApi: Send + Sync {
    async fn send_passing_stock_names(&self, names: &[String]) -> Result<()>;

    async fn send_sell_recommendations(&self, recommendations: &[StockTransaction]) -> Result<()>;
}
