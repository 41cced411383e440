use super::ui;
use crate::core::refresh::{self, RefreshSummary};
use crate::core::{ActivityLog, FavoritesStore, MarketDataProvider};
use anyhow::Result;
use chrono::NaiveDate;

pub async fn run(
    store: &dyn FavoritesStore,
    provider: &dyn MarketDataProvider,
    log: &dyn ActivityLog,
    working_days_back: usize,
    today: NaiveDate,
) -> Result<RefreshSummary> {
    let total = store.load()?.len() as u64;
    let pb = ui::new_progress_bar(total, true);
    let progress = |name: &str| {
        pb.set_message(format!("Checking {name}..."));
        pb.inc(1);
    };

    let summary =
        refresh::update_favorites(store, provider, log, working_days_back, today, &progress)
            .await?;
    pb.finish_and_clear();

    println!(
        "{} updated, {} already up to date, {} failed",
        ui::style_text(&summary.refreshed.len().to_string(), ui::StyleType::Success),
        summary.up_to_date.len(),
        ui::style_text(&summary.failed.len().to_string(), ui::StyleType::Error),
    );
    for name in &summary.failed {
        println!(
            "{}",
            ui::style_text(&format!("  could not update {name}"), ui::StyleType::Error)
        );
    }

    Ok(summary)
}
