//! Query engine: pure, side-effect-free functions over a hill collection.
//!
//! Nothing in here mutates its inputs or the catalog; every operation
//! returns borrowed hills in input order. Zero matches is an empty vector,
//! never an error.

use tracing::debug;

use crate::catalog::model::{Difficulty, Hill};
use crate::error::HribiError;

/// Editorial allowlist backing [`popular_subset`]. Matching is a
/// case-sensitive substring test, not a popularity algorithm.
pub const POPULAR_HILLS: &[&str] = &[
    "Triglav",
    "Stol",
    "Šmarna gora",
    "Vogel",
    "Velika planina",
    "Krvavec",
    "Golica",
    "Snežnik",
];

/// Conjunctive filter criteria; an absent criterion is always-true.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Exact match on the hill's mountain range label
    pub mountain_range: Option<String>,
    /// Inclusive lower bound on summit height in meters
    pub min_height: Option<u32>,
    /// Inclusive upper bound on summit height in meters
    pub max_height: Option<u32>,
    /// Matches a hill if *any* of its routes has this difficulty
    pub difficulty: Option<Difficulty>,
}

impl FilterCriteria {
    fn matches(&self, hill: &Hill) -> bool {
        if let Some(range) = &self.mountain_range {
            if hill.mountain_range != *range {
                return false;
            }
        }
        if let Some(min) = self.min_height {
            if hill.height < min {
                return false;
            }
        }
        if let Some(max) = self.max_height {
            if hill.height > max {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if !hill.has_route_with_difficulty(difficulty) {
                return false;
            }
        }
        true
    }
}

/// Filter hills by the given criteria, preserving input order.
///
/// An inverted height range (`min_height > max_height`) is degraded to an
/// empty result rather than an error.
#[must_use]
pub fn filter_by<'a>(hills: &'a [Hill], criteria: &FilterCriteria) -> Vec<&'a Hill> {
    if let (Some(min), Some(max)) = (criteria.min_height, criteria.max_height) {
        if min > max {
            debug!(min, max, "inverted height range, returning empty result");
            return Vec::new();
        }
    }
    hills.iter().filter(|h| criteria.matches(h)).collect()
}

/// Case-insensitive substring search on hill names.
///
/// A blank query returns the full input unfiltered; an unmatched query
/// returns an empty vector.
#[must_use]
pub fn search_by_name<'a>(hills: &'a [Hill], query: &str) -> Vec<&'a Hill> {
    let query = query.trim();
    if query.is_empty() {
        return hills.iter().collect();
    }
    let needle = query.to_lowercase();
    hills
        .iter()
        .filter(|h| h.name.to_lowercase().contains(&needle))
        .collect()
}

/// Select hills whose name contains any allowlist entry (case-sensitive).
#[must_use]
pub fn popular_subset<'a>(hills: &'a [Hill], allowlist: &[&str]) -> Vec<&'a Hill> {
    hills
        .iter()
        .filter(|h| allowlist.iter().any(|entry| h.name.contains(entry)))
        .collect()
}

/// Resolve a free-text name to a single hill.
///
/// Tries an exact case-insensitive match first, then falls back to the first
/// hill whose name contains the query as a case-insensitive substring. Fails
/// with [`HribiError::NotFound`] when both miss; the caller decides how to
/// surface the absence.
pub fn resolve_by_name<'a>(hills: &'a [Hill], query: &str) -> crate::Result<&'a Hill> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(HribiError::not_found("hill named \"\""));
    }

    if let Some(exact) = hills.iter().find(|h| h.name.to_lowercase() == needle) {
        return Ok(exact);
    }
    hills
        .iter()
        .find(|h| h.name.to_lowercase().contains(&needle))
        .ok_or_else(|| HribiError::not_found(format!("hill named {query:?}")))
}

/// Hills within `radius_km` of a point, nearest first, with distances.
#[must_use]
pub fn within_radius<'a>(
    hills: &'a [Hill],
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Vec<(&'a Hill, f64)> {
    let mut nearby: Vec<(&Hill, f64)> = hills
        .iter()
        .filter_map(|hill| {
            let distance = haversine::distance(
                haversine::Location {
                    latitude: lat,
                    longitude: lon,
                },
                haversine::Location {
                    latitude: hill.lat,
                    longitude: hill.lon,
                },
                haversine::Units::Kilometers,
            );
            (distance <= radius_km).then_some((hill, distance))
        })
        .collect();
    nearby.sort_by(|a, b| a.1.total_cmp(&b.1));
    nearby
}
