use super::ui;
use crate::core::{ActivityLog, ExternalApi, FavoritesStore, FilterManager, FilterReport};
use anyhow::Result;
use comfy_table::Cell;

pub fn render_report(report: &FilterReport) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Result"),
        ui::header_cell("Excluded by"),
    ]);

    for name in &report.passing {
        table.add_row(vec![
            Cell::new(name),
            ui::status_cell("Passed", true),
            Cell::new(""),
        ]);
    }
    for exclusion in &report.excluded {
        table.add_row(vec![
            Cell::new(&exclusion.stock),
            ui::status_cell("Excluded", false),
            Cell::new(&exclusion.filter),
        ]);
    }

    table.to_string()
}

/// Filters the favorites and forwards the passing names to the external API.
///
/// A failed send is logged and reported but does not fail the command.
pub async fn run(
    store: &dyn FavoritesStore,
    filters: &FilterManager,
    api: &dyn ExternalApi,
    log: &dyn ActivityLog,
) -> Result<FilterReport> {
    log.log("Started filtering and sending favorite stocks.");

    let favorites = store.load()?;
    let report = filters.evaluate(&favorites);
    for exclusion in &report.excluded {
        log.log(&format!(
            "'{}' did not pass the filters because of '{}'.",
            exclusion.stock, exclusion.filter
        ));
    }

    if report.passing.is_empty() {
        log.log("No stock passed all filters, nothing was sent to the external API.");
    } else {
        log.log(&format!(
            "Sending {} to the external API.",
            report.passing.join(", ")
        ));
        match api.send_passing_stock_names(&report.passing).await {
            Ok(()) => log.log("Sending to the external API finished."),
            Err(e) => {
                log.log(&format!("Sending to the external API failed: {e}"));
                println!(
                    "{}",
                    ui::style_text(&format!("Could not send results: {e}"), ui::StyleType::Error)
                );
            }
        }
    }

    if !favorites.is_empty() {
        println!("{}", render_report(&report));
    }
    Ok(report)
}
