//! Rules deciding which favorite stocks are reported downstream

pub mod consecutive_falling;
pub mod manager;
pub mod price_drops;

use crate::core::stock::Stock;

pub use consecutive_falling::ConsecutiveFallingDaysFilter;
pub use manager::{Exclusion, FilterManager, FilterReport};
pub use price_drops::PriceDropsInWindowFilter;

/// A read-only predicate over a stock's price history.
pub trait StockFilter: Send + Sync {
    /// Name reported when the filter excludes a stock.
    fn name(&self) -> &str;

    /// Returns true when the stock must not be reported.
    fn should_exclude(&self, stock: &Stock) -> bool;
}
