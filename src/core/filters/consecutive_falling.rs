use super::StockFilter;
use crate::core::config::ConsecutiveFallingDaysConfig;
use crate::core::stock::Stock;

/// Excludes a stock whose price fell on each of the last `threshold` days.
#[derive(Debug, Clone)]
pub struct ConsecutiveFallingDaysFilter {
    threshold: usize,
}

impl ConsecutiveFallingDaysFilter {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &ConsecutiveFallingDaysConfig) -> Self {
        Self::new(config.threshold)
    }
}

impl StockFilter for ConsecutiveFallingDaysFilter {
    fn name(&self) -> &str {
        "ConsecutiveFallingDays"
    }

    fn should_exclude(&self, stock: &Stock) -> bool {
        if stock.price_history.len() < self.threshold {
            return false;
        }

        let history = stock.history_newest_first();

        // A history of exactly `threshold` entries runs out of pairs on the
        // last step, so it never reaches the threshold.
        let falling_days = (0..self.threshold)
            .take_while(|&i| i + 1 < history.len() && history[i].price < history[i + 1].price)
            .count();

        falling_days >= self.threshold
    }
}
