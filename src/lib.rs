//! `Hribi` - hill catalog and mountain information for Slovenian peaks
//!
//! This library provides the in-memory hill catalog with its query engine
//! and selection state, plus the weather enrichment, webcam gallery and
//! HTTP API built around it.

pub mod api;
pub mod cache;
pub mod cameras;
pub mod catalog;
pub mod config;
pub mod error;
pub mod news;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cache::Cache;
pub use cameras::Camera;
pub use catalog::{
    Catalog, Difficulty, FilterCriteria, Hill, HillId, Route, SelectionController,
};
pub use config::HribiConfig;
pub use error::HribiError;
pub use news::NewsItem;
pub use weather::{CurrentConditions, DailyForecast, RequestSequence, WeatherService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, HribiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
