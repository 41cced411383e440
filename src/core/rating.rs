//! Validation of externally submitted stock ratings
use crate::core::activity::ActivityLog;
use crate::core::stock::StockTransaction;
use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub const MIN_RATING: i32 = -10;
pub const MAX_RATING: i32 = 10;

const EXPECTED_PROPERTIES: usize = 4;

pub fn is_valid_rating(value: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RatingBatch {
    pub recommendations: Vec<StockTransaction>,
    pub skipped: usize,
}

fn parse_date(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_rating(element: &Value, threshold: i32) -> Result<StockTransaction> {
    let Some(object) = element.as_object() else {
        bail!("Item is not a JSON object: {element}");
    };

    if object.len() != EXPECTED_PROPERTIES {
        bail!(
            "Item has {} properties, expected {}: {element}",
            object.len(),
            EXPECTED_PROPERTIES
        );
    }

    let mut name = None;
    let mut date = None;
    let mut rating = None;
    for (key, value) in object {
        match key.to_lowercase().as_str() {
            "name" => name = value.as_str().filter(|s| !s.is_empty()),
            "date" => date = value.as_str().and_then(parse_date),
            "rating" => {
                rating = value
                    .as_i64()
                    .and_then(|r| i32::try_from(r).ok())
                    .filter(|r| is_valid_rating(*r))
            }
            _ => {}
        }
    }

    match (name, date, rating) {
        (Some(name), Some(date), Some(rating)) => {
            Ok(StockTransaction::with_rating(name, date, rating, threshold))
        }
        _ => bail!("Item has invalid data: {element}"),
    }
}

/// Turns a JSON array of ratings into sell recommendations.
///
/// Invalid items are logged and skipped. A payload that is not an array is an
/// error.
pub fn parse_ratings(
    payload: &Value,
    threshold: i32,
    log: &dyn ActivityLog,
) -> Result<RatingBatch> {
    let Some(items) = payload.as_array() else {
        log.log("Received ratings are not a JSON array.");
        bail!("Expected a JSON array of ratings");
    };

    let mut batch = RatingBatch::default();
    for element in items {
        match parse_rating(element, threshold) {
            Ok(transaction) => {
                log.log(&format!("Accepted rating: {element}"));
                batch.recommendations.push(transaction);
            }
            Err(e) => {
                log.log(&format!("{e}. Item skipped."));
                batch.skipped += 1;
            }
        }
    }

    if batch.skipped > 0 {
        log.log(&format!("Skipped {} invalid ratings.", batch.skipped));
    }
    Ok(batch)
}
