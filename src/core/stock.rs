//! Stock records and the transactions exchanged with the external API

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single closing price for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// A favorite stock and its cached price history.
///
/// The history is kept in insertion order. Anything that reasons about the
/// most recent days must sort it first, see [`Stock::history_newest_first`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub name: String,
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
}

impl Stock {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            price_history: Vec::new(),
        }
    }

    /// Appends a price; an existing entry for the same date is kept as is.
    pub fn add_price(&mut self, date: NaiveDate, price: f64) {
        self.price_history.push(PricePoint::new(date, price));
    }

    /// Case-insensitive comparison on the symbol.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Copy of the history ordered by date, most recent first. Entries with the
    /// same date keep their relative order.
    pub fn history_newest_first(&self) -> Vec<PricePoint> {
        let mut history = self.price_history.clone();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        history
    }

    pub fn latest_price(&self) -> Option<PricePoint> {
        self.price_history
            .iter()
            .copied()
            .max_by(|a, b| a.date.cmp(&b.date))
    }
}

/// Record sent to the downstream API.
///
/// Passing stock notifications leave `rating` and `sell` empty; sell
/// recommendations carry both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub name: String,
    pub date: NaiveDateTime,
    pub rating: Option<i32>,
    pub sell: Option<i32>,
}

impl StockTransaction {
    pub fn new(name: &str, date: NaiveDateTime) -> Self {
        Self {
            name: name.to_string(),
            date,
            rating: None,
            sell: None,
        }
    }

    pub fn with_rating(name: &str, date: NaiveDateTime, rating: i32, threshold: i32) -> Self {
        Self {
            name: name.to_string(),
            date,
            rating: Some(rating),
            sell: Some(if rating < threshold { 1 } else { 0 }),
        }
    }
}
