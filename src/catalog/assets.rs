//! Asset manifest association
//!
//! GPS tracks and photos are flat lists of filenames following a
//! `<hillprefix>-<suffix>.<ext>` naming convention. This module makes that
//! convention an explicit, tested parser instead of ad-hoc string slicing,
//! and reports files no hill claims instead of silently dropping them.

use tracing::warn;

use crate::catalog::model::Image;

/// Result of parsing one manifest filename against the naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry<'a> {
    /// `<prefix>-<suffix>.<ext>`: prefix is everything before the first `-`,
    /// suffix runs from there to the last `.`.
    Matched { prefix: &'a str, suffix: &'a str },
    /// Filename does not follow the convention.
    Unrecognized(&'a str),
}

/// Parse a manifest filename into its hill prefix and descriptive suffix.
#[must_use]
pub fn parse_filename(file: &str) -> ManifestEntry<'_> {
    let Some(dash) = file.find('-') else {
        return ManifestEntry::Unrecognized(file);
    };
    let prefix = &file[..dash];
    if prefix.is_empty() {
        return ManifestEntry::Unrecognized(file);
    }
    let rest = &file[dash + 1..];
    let suffix = match rest.rfind('.') {
        Some(dot) => &rest[..dot],
        None => rest,
    };
    ManifestEntry::Matched { prefix, suffix }
}

/// Normalize a name for prefix comparison: strip whitespace and underscores,
/// lowercase (Unicode-aware, so Slovene diacritics fold correctly).
#[must_use]
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn file_belongs_to(file: &str, normalized_hill: &str) -> bool {
    match parse_filename(file) {
        ManifestEntry::Matched { prefix, .. } => normalize(prefix) == normalized_hill,
        ManifestEntry::Unrecognized(_) => false,
    }
}

/// GPS track filenames belonging to the named hill.
#[must_use]
pub fn gps_files_for(manifest: &[String], hill_name: &str) -> Vec<String> {
    let normalized = normalize(hill_name);
    manifest
        .iter()
        .filter(|file| file_belongs_to(file, &normalized))
        .cloned()
        .collect()
}

/// Images belonging to the named hill, built from the image manifest.
///
/// Falls back to a single default image when nothing matches; a hill's image
/// sequence is never empty.
#[must_use]
pub fn images_for(manifest: &[String], hill_name: &str) -> Vec<Image> {
    let normalized = normalize(hill_name);
    let matches: Vec<Image> = manifest
        .iter()
        .filter(|file| file_belongs_to(file, &normalized))
        .map(|file| {
            let suffix = match parse_filename(file) {
                ManifestEntry::Matched { suffix, .. } => suffix.replace('_', " "),
                ManifestEntry::Unrecognized(_) => String::new(),
            };
            Image {
                name: format!("{hill_name} {suffix}"),
                url: format!("/assets/img/{file}"),
                alt: format!("{hill_name} {suffix}"),
            }
        })
        .collect();

    if matches.is_empty() {
        return vec![Image {
            name: format!("{hill_name} View"),
            url: "/assets/img/default.jpg".to_string(),
            alt: format!("Default view of {hill_name}"),
        }];
    }
    matches
}

/// Manifest files claimed by no hill, logged so curation mistakes surface.
///
/// `hill_names` must be the same display names the association functions are
/// given, so the claimed/unclaimed verdicts agree.
pub fn unmatched_files<'a>(manifest: &'a [String], hill_names: &[String]) -> Vec<&'a str> {
    let normalized_names: Vec<String> = hill_names.iter().map(|n| normalize(n)).collect();
    let unmatched: Vec<&str> = manifest
        .iter()
        .filter(|file| {
            !normalized_names
                .iter()
                .any(|name| file_belongs_to(file, name))
        })
        .map(String::as_str)
        .collect();

    for file in &unmatched {
        warn!(file, "manifest file matches no hill");
    }
    unmatched
}
