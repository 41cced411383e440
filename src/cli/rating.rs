use super::ui;
use crate::core::rating::{RatingBatch, is_valid_rating, parse_ratings};
use crate::core::{ActivityLog, ExternalApi};
use crate::store::RatingThresholdStore;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Reads a JSON document from `input`, or from stdin when it is `None` or `-`.
pub fn read_payload(input: Option<&Path>) -> Result<Value> {
    let text = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ratings file: {}", path.display()))?,
        _ => std::io::read_to_string(std::io::stdin())
            .context("Failed to read ratings from stdin")?,
    };
    serde_json::from_str(&text).context("Ratings are not valid JSON")
}

/// Validates received ratings and forwards sell recommendations.
pub async fn rate(
    payload: &Value,
    thresholds: &RatingThresholdStore,
    api: &dyn ExternalApi,
    log: &dyn ActivityLog,
) -> Result<RatingBatch> {
    log.log("Receiving ratings.");
    let threshold = thresholds.get();
    let batch = parse_ratings(payload, threshold, log)?;

    if batch.recommendations.is_empty() {
        log.log("No valid ratings to process.");
        println!(
            "{}",
            ui::style_text("No valid ratings to send", ui::StyleType::Subtle)
        );
        return Ok(batch);
    }

    log.log(&format!(
        "Forwarding {} sell recommendations (threshold {}).",
        batch.recommendations.len(),
        threshold
    ));
    match api.send_sell_recommendations(&batch.recommendations).await {
        Ok(()) => println!(
            "{}",
            ui::style_text(
                &format!(
                    "Sent {} recommendations, skipped {} invalid ratings",
                    batch.recommendations.len(),
                    batch.skipped
                ),
                ui::StyleType::Success
            )
        ),
        Err(e) => {
            log.log(&format!("Sending sell recommendations failed: {e}"));
            println!(
                "{}",
                ui::style_text(
                    &format!("Could not send recommendations: {e}"),
                    ui::StyleType::Error
                )
            );
        }
    }
    Ok(batch)
}

/// Shows the rating threshold, or stores a new one when `value` is given.
pub fn threshold(
    thresholds: &RatingThresholdStore,
    log: &dyn ActivityLog,
    value: Option<i32>,
) -> Result<i32> {
    let Some(value) = value else {
        let current = thresholds.get();
        println!("Rating threshold: {current}");
        return Ok(current);
    };

    if !is_valid_rating(value) {
        log.log(&format!("Rejected invalid rating threshold: {value}"));
        anyhow::bail!("Rating threshold must be between -10 and 10, got {value}");
    }

    thresholds.set(value)?;
    log.log(&format!("Saved new rating threshold: {value}"));
    println!(
        "{}",
        ui::style_text(
            &format!("Rating threshold set to {value}"),
            ui::StyleType::Success
        )
    );
    Ok(value)
}
