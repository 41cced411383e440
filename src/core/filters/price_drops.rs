use super::StockFilter;
use crate::core::config::PriceDropsInWindowConfig;
use crate::core::stock::Stock;

/// Excludes a stock with too many day-over-day drops among its most recent
/// `lookback_days` prices. Drops do not need to be consecutive.
#[derive(Debug, Clone)]
pub struct PriceDropsInWindowFilter {
    drop_count_threshold: usize,
    lookback_days: usize,
}

impl PriceDropsInWindowFilter {
    pub fn new(drop_count_threshold: usize, lookback_days: usize) -> Self {
        Self {
            drop_count_threshold,
            lookback_days,
        }
    }

    pub fn from_config(config: &PriceDropsInWindowConfig) -> Self {
        Self::new(config.drop_count_threshold, config.lookback_days)
    }
}

impl StockFilter for PriceDropsInWindowFilter {
    fn name(&self) -> &str {
        "PriceDropsInWindow"
    }

    fn should_exclude(&self, stock: &Stock) -> bool {
        if stock.price_history.len() < 2 {
            return false;
        }

        let mut history = stock.history_newest_first();
        history.truncate(self.lookback_days);

        let drops = history
            .windows(2)
            .filter(|pair| pair[0].price < pair[1].price)
            .count();

        drops >= self.drop_count_threshold
    }
}
