//! Hill and route data types
//!
//! This module provides the core data structures for representing hills,
//! their ascent routes and the attached media records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog-wide hill identifier, unique and stable for the session.
pub type HillId = u32;

/// Route difficulty grades, a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = crate::HribiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(crate::HribiError::validation(format!(
                "unknown difficulty: {other}"
            ))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webcam {
    pub id: u32,
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u32,
    /// Time of the comment
    pub time: DateTime<Utc>,
    /// The user who posted the comment
    pub user: String,
    pub text: String,
}

/// One specific trail ascending or traversing a hill.
///
/// A route belongs to exactly one [`Hill`]; route ids are unique within the
/// owning hill only, never globally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: u32,
    pub start: String,
    pub end: String,
    pub name: String,
    /// Estimated walking time, free text ("6 h 15 min")
    pub time: String,
    pub difficulty: Difficulty,
    /// Meters climbed along the route
    pub height_diff: u32,
    pub summer_gear: String,
    pub winter_gear: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub description_of_start: String,
    pub description_of_path: String,
    /// Associated GPS track filename, if one exists
    #[serde(default)]
    pub gps: Option<String>,
}

/// A named geographic peak or feature with location, metadata and routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hill {
    pub id: HillId,
    pub name: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    pub country: String,
    /// Free-text grouping label ("Julian Alps", "Karst", ...)
    pub mountain_range: String,
    /// Summit height in meters
    pub height: u32,
    /// Category label ("Peak" or "Hill")
    #[serde(rename = "type")]
    pub kind: String,
    /// Editorial popularity, 1 to 5 stars
    pub popularity: u8,
    pub images: Vec<Image>,
    pub routes: Vec<Route>,
    pub description: String,
    #[serde(default)]
    pub webcams: Vec<Webcam>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// GPS track filenames associated via the manifest naming convention
    #[serde(default)]
    pub gps: Vec<String>,
}

impl Hill {
    /// True if any of the hill's routes carries the given difficulty.
    #[must_use]
    pub fn has_route_with_difficulty(&self, difficulty: Difficulty) -> bool {
        self.routes.iter().any(|r| r.difficulty == difficulty)
    }
}
