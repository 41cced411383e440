//! Core business logic abstractions

pub mod activity;
pub mod config;
pub mod external;
pub mod favorites;
pub mod filters;
pub mod freshness;
pub mod log;
pub mod market;
pub mod rating;
pub mod refresh;
pub mod stock;

// Re-export main types for cleaner imports
pub use activity::ActivityLog;
pub use external::ExternalApi;
pub use favorites::FavoritesStore;
pub use filters::{FilterManager, FilterReport, StockFilter};
pub use freshness::{should_refresh, should_refresh_on};
pub use market::MarketDataProvider;
pub use stock::{PricePoint, Stock, StockTransaction};
