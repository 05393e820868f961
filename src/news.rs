//! Editorial news feed
//!
//! A curated list of short news items (hut renovations, polls, gear recalls)
//! shown alongside the catalog. The list is static editorial content, bundled
//! the same way as the camera list, in the order the editors arranged it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::HribiError;

const NEWS_JSON: &str = include_str!("../assets/news.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    /// Place the item is about, when it concerns one ("Vošca (1737 m)")
    #[serde(default)]
    pub location: Option<String>,
    pub date: NaiveDate,
    pub excerpt: String,
    /// Longer body shown when the item is expanded
    #[serde(default)]
    pub details: Option<String>,
}

/// Load the bundled news feed.
pub fn load_default() -> crate::Result<Vec<NewsItem>> {
    serde_json::from_str(NEWS_JSON)
        .map_err(|e| HribiError::validation(format!("bundled news feed: {e}")))
}
