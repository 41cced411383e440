//! Keeps the price history of favorite stocks up to date
use crate::core::activity::ActivityLog;
use crate::core::favorites::FavoritesStore;
use crate::core::freshness::{is_working_day, should_refresh_on};
use crate::core::market::MarketDataProvider;
use crate::core::stock::Stock;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use futures::future::join;
use tracing::{debug, instrument, warn};

/// What happened to each favorite during a refresh pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: Vec<String>,
    pub up_to_date: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(Stock),
    AlreadyFavorite,
    NoData,
}

/// Builds a stock with up to `working_days_back` prices: today's intraday
/// price when `today` is a working day, then the latest daily closes.
///
/// Provider failures and empty responses are written to `log` and reported
/// as `None`.
#[instrument(name = "FetchStockHistory", skip(provider, log), fields(symbol = %symbol))]
pub async fn fetch_stock_with_history(
    provider: &dyn MarketDataProvider,
    log: &dyn ActivityLog,
    symbol: &str,
    working_days_back: usize,
    today: NaiveDate,
) -> Option<Stock> {
    let intraday = async {
        if is_working_day(today) {
            provider.intraday_price(symbol).await
        } else {
            Ok(None)
        }
    };
    let daily = provider.daily_prices(symbol, working_days_back);
    let (intraday, daily) = join(intraday, daily).await;

    let result: Result<Stock> = (|| {
        let mut stock = Stock::new(symbol);
        match intraday? {
            Some(price) => stock.add_price(today, price),
            None if is_working_day(today) => {
                warn!("No intraday price for {}, using daily prices only", symbol)
            }
            None => {}
        }

        let remaining = working_days_back.saturating_sub(stock.price_history.len());
        for point in daily?.into_iter().take(remaining) {
            stock.add_price(point.date, point.price);
        }
        if stock.price_history.is_empty() {
            bail!("no price data returned");
        }
        Ok(stock)
    })();

    match result {
        Ok(stock) => {
            log.log(&format!(
                "Downloaded data for '{}' ({} days).",
                symbol,
                stock.price_history.len()
            ));
            Some(stock)
        }
        Err(e) => {
            log.log(&format!("Failed to download data for '{symbol}': {e}"));
            None
        }
    }
}

/// Re-fetches the history of every stale stock in place.
///
/// A stock whose fetch fails keeps its cached history; the remaining stocks
/// are still refreshed. `on_progress` is called once per stock.
pub async fn refresh_favorites(
    stocks: &mut [Stock],
    provider: &dyn MarketDataProvider,
    log: &dyn ActivityLog,
    working_days_back: usize,
    today: NaiveDate,
    on_progress: &(dyn Fn(&str) + Send + Sync),
) -> RefreshSummary {
    let mut summary = RefreshSummary::default();

    for stock in stocks.iter_mut() {
        on_progress(&stock.name);

        if !should_refresh_on(&stock.price_history, working_days_back, today) {
            log.log(&format!(
                "Price history for '{}' covers the last {} working days. Skipping update.",
                stock.name, working_days_back
            ));
            summary.up_to_date.push(stock.name.clone());
            continue;
        }

        log.log(&format!("Updating price history for '{}'.", stock.name));
        match fetch_stock_with_history(provider, log, &stock.name, working_days_back, today).await
        {
            Some(updated) => {
                stock.price_history = updated.price_history;
                summary.refreshed.push(stock.name.clone());
            }
            None => {
                log.log(&format!("Could not get updated data for '{}'.", stock.name));
                summary.failed.push(stock.name.clone());
            }
        }
    }

    debug!(?summary, "Refresh finished");
    summary
}

/// Loads the favorites, refreshes stale ones and saves the whole list back.
pub async fn update_favorites(
    store: &dyn FavoritesStore,
    provider: &dyn MarketDataProvider,
    log: &dyn ActivityLog,
    working_days_back: usize,
    today: NaiveDate,
    on_progress: &(dyn Fn(&str) + Send + Sync),
) -> Result<RefreshSummary> {
    let mut stocks = store.load()?;
    let summary = refresh_favorites(
        &mut stocks,
        provider,
        log,
        working_days_back,
        today,
        on_progress,
    )
    .await;
    store.save(&stocks)?;
    Ok(summary)
}

pub async fn add_favorite(
    store: &dyn FavoritesStore,
    provider: &dyn MarketDataProvider,
    log: &dyn ActivityLog,
    symbol: &str,
    working_days_back: usize,
    today: NaiveDate,
) -> Result<AddOutcome> {
    let mut stocks = store.load()?;

    if stocks.iter().any(|s| s.is_named(symbol)) {
        log.log(&format!("'{symbol}' is already a favorite."));
        return Ok(AddOutcome::AlreadyFavorite);
    }

    let stock = match fetch_stock_with_history(provider, log, symbol, working_days_back, today)
        .await
    {
        Some(stock) if !stock.price_history.is_empty() => stock,
        _ => {
            log.log(&format!(
                "Could not add '{symbol}': stock not found or it has no data."
            ));
            return Ok(AddOutcome::NoData);
        }
    };

    stocks.push(stock.clone());
    store.save(&stocks)?;
    log.log(&format!("'{symbol}' was added to favorites."));
    Ok(AddOutcome::Added(stock))
}

/// Removes the first favorite matching `symbol`, ignoring case.
pub fn remove_favorite(
    store: &dyn FavoritesStore,
    log: &dyn ActivityLog,
    symbol: &str,
) -> Result<bool> {
    let mut stocks = store.load()?;

    let Some(index) = stocks.iter().position(|s| s.is_named(symbol)) else {
        log.log(&format!("'{symbol}' is not a favorite, nothing to remove."));
        return Ok(false);
    };

    stocks.remove(index);
    store.save(&stocks)?;
    log.log(&format!("'{symbol}' was removed from favorites."));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stock::PricePoint;
    use crate::store::memory::{MemoryActivityLog, MemoryFavoritesStore};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Friday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 13).unwrap()
    }

    fn working_days_before(date: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut current = date;
        while dates.len() < count {
            current -= Duration::days(1);
            if is_working_day(current) {
                dates.push(current);
            }
        }
        dates
    }

    #[derive(Default)]
    struct MockProvider {
        intraday: HashMap<String, f64>,
        failing: Vec<String>,
        empty: Vec<String>,
        daily_calls: AtomicUsize,
        requested_counts: Mutex<Vec<usize>>,
    }

    impl MockProvider {
        fn with_symbol(mut self, symbol: &str, price: f64) -> Self {
            self.intraday.insert(symbol.to_string(), price);
            self
        }

        fn failing_for(mut self, symbol: &str) -> Self {
            self.failing.push(symbol.to_string());
            self
        }

        /// Answers like a rate-limited service: no error, no data.
        fn empty_for(mut self, symbol: &str) -> Self {
            self.empty.push(symbol.to_string());
            self
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn intraday_price(&self, symbol: &str) -> Result<Option<f64>> {
            if self.failing.iter().any(|s| s == symbol) {
                return Err(anyhow!("service unavailable"));
            }
            Ok(self.intraday.get(symbol).copied())
        }

        async fn daily_prices(&self, symbol: &str, count: usize) -> Result<Vec<PricePoint>> {
            self.daily_calls.fetch_add(1, Ordering::SeqCst);
            self.requested_counts.lock().unwrap().push(count);
            if self.failing.iter().any(|s| s == symbol) {
                return Err(anyhow!("service unavailable"));
            }
            if self.empty.iter().any(|s| s == symbol) {
                return Ok(Vec::new());
            }
            Ok(working_days_before(today(), count)
                .into_iter()
                .enumerate()
                .map(|(i, date)| PricePoint::new(date, 100.0 - i as f64))
                .collect())
        }
    }

    fn no_progress() -> impl Fn(&str) + Send + Sync {
        |_: &str| {}
    }

    #[tokio::test]
    async fn test_fetch_on_working_day_includes_today() {
        let provider = MockProvider::default().with_symbol("AAPL", 150.0);
        let log = MemoryActivityLog::new();

        let stock = fetch_stock_with_history(&provider, &log, "AAPL", 7, today())
            .await
            .unwrap();

        assert_eq!(stock.price_history.len(), 7);
        assert_eq!(stock.price_history[0], PricePoint::new(today(), 150.0));
        assert!(!should_refresh_on(&stock.price_history, 7, today()));
        assert!(log.last_lines(1)[0].contains("Downloaded data for 'AAPL' (7 days)"));
    }

    #[tokio::test]
    async fn test_fetch_on_weekend_uses_daily_only() {
        let provider = MockProvider::default().with_symbol("AAPL", 150.0);
        let log = MemoryActivityLog::new();
        let saturday = today() + Duration::days(1);

        let stock = fetch_stock_with_history(&provider, &log, "AAPL", 5, saturday)
            .await
            .unwrap();

        assert_eq!(stock.price_history.len(), 5);
        assert!(stock.price_history.iter().all(|p| p.date != saturday));
    }

    #[tokio::test]
    async fn test_fetch_without_intraday_keeps_daily_window() {
        let provider = MockProvider::default();
        let log = MemoryActivityLog::new();

        let stock = fetch_stock_with_history(&provider, &log, "MSFT", 4, today())
            .await
            .unwrap();

        assert_eq!(stock.price_history.len(), 4);
        assert_eq!(provider.requested_counts.lock().unwrap()[0], 4);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_logged() {
        let provider = MockProvider::default().failing_for("BAD");
        let log = MemoryActivityLog::new();

        let stock = fetch_stock_with_history(&provider, &log, "BAD", 7, today()).await;

        assert!(stock.is_none());
        assert!(log.last_lines(1)[0].contains("Failed to download data for 'BAD'"));
    }

    #[tokio::test]
    async fn test_refresh_skips_fresh_and_survives_failures() {
        let provider = MockProvider::default()
            .with_symbol("STALE", 42.0)
            .failing_for("BAD");
        let log = MemoryActivityLog::new();

        let mut fresh = Stock::new("FRESH");
        fresh.add_price(today(), 1.0);
        for date in working_days_before(today(), 2) {
            fresh.add_price(date, 1.0);
        }
        let mut bad = Stock::new("BAD");
        bad.add_price(today() - Duration::days(10), 5.0);
        let stale = Stock::new("STALE");

        let mut stocks = vec![bad.clone(), fresh.clone(), stale];
        let seen = Mutex::new(Vec::new());
        let progress = |name: &str| seen.lock().unwrap().push(name.to_string());

        let summary =
            refresh_favorites(&mut stocks, &provider, &log, 3, today(), &progress).await;

        assert_eq!(summary.up_to_date, vec!["FRESH"]);
        assert_eq!(summary.refreshed, vec!["STALE"]);
        assert_eq!(summary.failed, vec!["BAD"]);
        assert_eq!(stocks[0], bad);
        assert_eq!(stocks[1], fresh);
        assert_eq!(stocks[2].price_history.len(), 3);
        assert_eq!(stocks[2].price_history[0].price, 42.0);
        assert_eq!(*seen.lock().unwrap(), vec!["BAD", "FRESH", "STALE"]);
        assert!(
            log.last_lines(20)
                .iter()
                .any(|l| l.contains("Could not get updated data for 'BAD'"))
        );
    }

    #[tokio::test]
    async fn test_fetch_without_any_data_is_a_failure() {
        let provider = MockProvider::default().empty_for("LIMITED");
        let log = MemoryActivityLog::new();

        let stock = fetch_stock_with_history(&provider, &log, "LIMITED", 7, today()).await;

        assert!(stock.is_none());
        assert_eq!(
            log.last_lines(1),
            vec!["Failed to download data for 'LIMITED': no price data returned"]
        );
    }

    #[tokio::test]
    async fn test_empty_response_keeps_cached_history() {
        let provider = MockProvider::default().empty_for("AAPL");
        let log = MemoryActivityLog::new();

        let mut cached = Stock::new("AAPL");
        cached.add_price(today() - Duration::days(7), 180.0);
        cached.add_price(today() - Duration::days(8), 178.5);
        let store = MemoryFavoritesStore::new(vec![cached.clone()]);

        let summary = update_favorites(&store, &provider, &log, 7, today(), &no_progress())
            .await
            .unwrap();

        assert!(summary.refreshed.is_empty());
        assert_eq!(summary.failed, vec!["AAPL"]);
        assert_eq!(store.load().unwrap(), vec![cached]);
    }

    #[tokio::test]
    async fn test_update_favorites_saves_refreshed_history() {
        let provider = MockProvider::default().with_symbol("AAPL", 10.0);
        let log = MemoryActivityLog::new();
        let store = MemoryFavoritesStore::new(vec![Stock::new("AAPL")]);

        let summary = update_favorites(&store, &provider, &log, 3, today(), &no_progress())
            .await
            .unwrap();

        assert_eq!(summary.refreshed, vec!["AAPL"]);
        assert_eq!(store.load().unwrap()[0].price_history.len(), 3);
    }

    #[tokio::test]
    async fn test_add_favorite_rejects_duplicates_ignoring_case() {
        let provider = MockProvider::default().with_symbol("AAPL", 10.0);
        let log = MemoryActivityLog::new();
        let store = MemoryFavoritesStore::new(vec![Stock::new("AAPL")]);

        let outcome = add_favorite(&store, &provider, &log, "aapl", 7, today())
            .await
            .unwrap();

        assert_eq!(outcome, AddOutcome::AlreadyFavorite);
        assert_eq!(provider.daily_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_favorite_saves_fetched_stock() {
        let provider = MockProvider::default().with_symbol("MSFT", 10.0);
        let log = MemoryActivityLog::new();
        let store = MemoryFavoritesStore::default();

        let outcome = add_favorite(&store, &provider, &log, "MSFT", 7, today())
            .await
            .unwrap();

        assert!(matches!(outcome, AddOutcome::Added(ref s) if s.name == "MSFT"));
        assert_eq!(store.load().unwrap().len(), 1);
        assert!(log.last_lines(1)[0].contains("'MSFT' was added to favorites."));
    }

    #[tokio::test]
    async fn test_add_favorite_without_data_is_refused() {
        let provider = MockProvider::default().failing_for("NOPE");
        let log = MemoryActivityLog::new();
        let store = MemoryFavoritesStore::default();

        let outcome = add_favorite(&store, &provider, &log, "NOPE", 7, today())
            .await
            .unwrap();

        assert_eq!(outcome, AddOutcome::NoData);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_remove_favorite() {
        let log = MemoryActivityLog::new();
        let store = MemoryFavoritesStore::new(vec![Stock::new("AAPL"), Stock::new("MSFT")]);

        assert!(remove_favorite(&store, &log, "msft").unwrap());
        assert!(!remove_favorite(&store, &log, "GOOG").unwrap());

        let names: Vec<_> = store.load().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["AAPL"]);
        assert!(log.last_lines(1)[0].contains("'GOOG' is not a favorite"));
    }
}
