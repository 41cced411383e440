use super::ui;
use crate::core::refresh::{self, AddOutcome};
use crate::core::{ActivityLog, FavoritesStore, MarketDataProvider, Stock, should_refresh_on};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

fn day_change(stock: &Stock) -> Option<f64> {
    let history = stock.history_newest_first();
    match history.as_slice() {
        [latest, previous, ..] if previous.price > 0.0 => {
            Some((latest.price - previous.price) / previous.price * 100.0)
        }
        _ => None,
    }
}

pub fn render_favorites(stocks: &[Stock], working_days_back: usize, today: NaiveDate) -> String {
    if stocks.is_empty() {
        return ui::style_text("No favorite stocks yet.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Date"),
        ui::header_cell("Price"),
        ui::header_cell("Change"),
        ui::header_cell("Days"),
        ui::header_cell("History"),
    ]);

    for stock in stocks {
        let latest = stock.latest_price();
        let change = day_change(stock)
            .map(ui::change_cell)
            .unwrap_or_else(|| ui::format_optional_cell(None::<f64>, |c| format!("{c:.2}%")));
        let fresh = !should_refresh_on(&stock.price_history, working_days_back, today);

        table.add_row(vec![
            Cell::new(&stock.name),
            ui::format_optional_cell(latest.map(|p| p.date), |d| d.to_string()),
            ui::format_optional_cell(latest.map(|p| p.price), |p| format!("{p:.2}")),
            change,
            Cell::new(stock.price_history.len()),
            ui::status_cell(if fresh { "Fresh" } else { "Stale" }, fresh),
        ]);
    }

    table.to_string()
}

pub fn list(
    store: &dyn FavoritesStore,
    working_days_back: usize,
    today: NaiveDate,
) -> Result<()> {
    let stocks = store.load()?;
    println!(
        "{}\n\n{}",
        ui::style_text("Favorite stocks", ui::StyleType::Title),
        render_favorites(&stocks, working_days_back, today)
    );
    Ok(())
}

pub async fn add(
    store: &dyn FavoritesStore,
    provider: &dyn MarketDataProvider,
    log: &dyn ActivityLog,
    symbol: &str,
    working_days_back: usize,
    today: NaiveDate,
) -> Result<AddOutcome> {
    let pb = ui::new_progress_bar(1, true);
    pb.set_message(format!("Fetching {symbol}..."));
    let outcome =
        refresh::add_favorite(store, provider, log, symbol, working_days_back, today).await?;
    pb.finish_and_clear();

    let message = match &outcome {
        AddOutcome::Added(stock) => ui::style_text(
            &format!(
                "Added {} with {} days of history",
                stock.name,
                stock.price_history.len()
            ),
            ui::StyleType::Success,
        ),
        AddOutcome::AlreadyFavorite => {
            ui::style_text(&format!("{symbol} is already a favorite"), ui::StyleType::Subtle)
        }
        AddOutcome::NoData => ui::style_text(
            &format!("Could not add {symbol}: no price data found"),
            ui::StyleType::Error,
        ),
    };
    println!("{message}");
    Ok(outcome)
}

pub fn remove(store: &dyn FavoritesStore, log: &dyn ActivityLog, symbol: &str) -> Result<bool> {
    let removed = refresh::remove_favorite(store, log, symbol)?;
    if removed {
        println!(
            "{}",
            ui::style_text(&format!("Removed {symbol}"), ui::StyleType::Success)
        );
    } else {
        println!(
            "{}",
            ui::style_text(&format!("{symbol} is not a favorite"), ui::StyleType::Subtle)
        );
    }
    Ok(removed)
}
