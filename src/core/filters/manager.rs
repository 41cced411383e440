use super::{ConsecutiveFallingDaysFilter, PriceDropsInWindowFilter, StockFilter};
use crate::core::config::FiltersConfig;
use crate::core::stock::Stock;
use tracing::info;

/// A stock that did not pass, with the first filter that rejected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub stock: String,
    pub filter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Names of passing stocks, in input order.
    pub passing: Vec<String>,
    pub excluded: Vec<Exclusion>,
}

/// Applies an ordered list of filters to favorite stocks.
///
/// Filters run in registration order and evaluation stops at the first one
/// that excludes a stock, so only that filter is reported for it.
pub struct FilterManager {
    filters: Vec<Box<dyn StockFilter>>,
}

impl FilterManager {
    pub fn new(filters: Vec<Box<dyn StockFilter>>) -> Self {
        Self { filters }
    }

    pub fn from_config(config: &FiltersConfig) -> Self {
        Self::new(vec![
            Box::new(ConsecutiveFallingDaysFilter::from_config(
                &config.consecutive_falling_days,
            )),
            Box::new(PriceDropsInWindowFilter::from_config(
                &config.price_drops_in_window,
            )),
        ])
    }

    pub fn evaluate(&self, stocks: &[Stock]) -> FilterReport {
        let mut report = FilterReport::default();

        for stock in stocks {
            match self.filters.iter().find(|f| f.should_exclude(stock)) {
                Some(filter) => {
                    info!(stock = %stock.name, filter = filter.name(), "Stock excluded");
                    report.excluded.push(Exclusion {
                        stock: stock.name.clone(),
                        filter: filter.name().to_string(),
                    });
                }
                None => report.passing.push(stock.name.clone()),
            }
        }

        report
    }

    pub fn passing_stock_names(&self, stocks: &[Stock]) -> Vec<String> {
        self.evaluate(stocks).passing
    }
}
