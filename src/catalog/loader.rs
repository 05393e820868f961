//! Builds the catalog from the bundled declarative dataset.
//!
//! The dataset is curated reference data: loading happens once, at startup,
//! and nothing mutates it afterwards. Curation gaps are filled in here the
//! same way the editorial data was assembled: hills without curated routes
//! get a synthesized standard route, missing descriptions get a stock one.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::catalog::assets;
use crate::catalog::model::{Comment, Difficulty, Hill, HillId, Route, Webcam};
use crate::catalog::store::Catalog;
use crate::error::HribiError;

const HILLS_JSON: &str = include_str!("../../assets/hills.json");
const GPS_MANIFEST_JSON: &str = include_str!("../../assets/gps_manifest.json");
const IMG_MANIFEST_JSON: &str = include_str!("../../assets/img_manifest.json");

/// One hill as declared in the dataset, before derivation.
#[derive(Debug, Deserialize)]
struct RawHill {
    id: HillId,
    name: String,
    lat: f64,
    lon: f64,
    mountain_range: String,
    height: u32,
    popularity: u8,
    #[serde(default)]
    routes: Vec<Route>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    webcams: Vec<Webcam>,
    #[serde(default)]
    comments: Vec<Comment>,
}

/// Load the bundled Slovenian hills dataset into a catalog.
pub fn load_default() -> crate::Result<Catalog> {
    let raw: Vec<RawHill> = serde_json::from_str(HILLS_JSON)
        .map_err(|e| HribiError::validation(format!("bundled hills dataset: {e}")))?;
    let gps_manifest: Vec<String> = serde_json::from_str(GPS_MANIFEST_JSON)
        .map_err(|e| HribiError::validation(format!("bundled gps manifest: {e}")))?;
    let img_manifest: Vec<String> = serde_json::from_str(IMG_MANIFEST_JSON)
        .map_err(|e| HribiError::validation(format!("bundled image manifest: {e}")))?;

    let catalog = build_catalog(raw, &gps_manifest, &img_manifest);
    info!(
        hills = catalog.len(),
        ranges = catalog.distinct_mountain_ranges().len(),
        "catalog loaded"
    );
    Ok(catalog)
}

fn build_catalog(raw: Vec<RawHill>, gps_manifest: &[String], img_manifest: &[String]) -> Catalog {
    let hills: Vec<Hill> = raw.into_iter().map(|r| build_hill(r, gps_manifest, img_manifest)).collect();

    // Association ran on cleaned display names, so the unmatched check must too
    let display_names: Vec<String> = hills.iter().map(|h| clean_name(&h.name)).collect();
    assets::unmatched_files(gps_manifest, &display_names);
    assets::unmatched_files(img_manifest, &display_names);

    Catalog::new(hills)
}

fn build_hill(raw: RawHill, gps_manifest: &[String], img_manifest: &[String]) -> Hill {
    let display_name = clean_name(&raw.name);
    let popularity = clamp_popularity(raw.popularity, &raw.name);

    let routes = if raw.routes.is_empty() {
        vec![standard_route(&display_name, raw.height)]
    } else {
        raw.routes
    };

    let description = raw.description.unwrap_or_else(|| {
        format!(
            "This is the description for {}. Located in the {}.",
            raw.name, raw.mountain_range
        )
    });

    Hill {
        id: raw.id,
        kind: infer_kind(&raw.name),
        images: assets::images_for(img_manifest, &display_name),
        gps: assets::gps_files_for(gps_manifest, &display_name),
        name: raw.name,
        lat: raw.lat,
        lon: raw.lon,
        country: "Slovenia".to_string(),
        mountain_range: raw.mountain_range,
        height: raw.height,
        popularity,
        routes,
        description,
        webcams: raw.webcams,
        comments: raw.comments,
    }
}

/// Strip a trailing parenthetical from a display name: "Vrh (old)" -> "Vrh".
fn clean_name(name: &str) -> String {
    match name.find('(') {
        Some(pos) => name[..pos].trim_end().to_string(),
        None => name.to_string(),
    }
}

fn infer_kind(name: &str) -> String {
    if name.contains("Peak") || name.contains("Vrh") || name.contains("vrh") {
        "Peak".to_string()
    } else {
        "Hill".to_string()
    }
}

fn clamp_popularity(popularity: u8, name: &str) -> u8 {
    if (1..=5).contains(&popularity) {
        popularity
    } else {
        warn!(name, popularity, "popularity out of range, clamping");
        popularity.clamp(1, 5)
    }
}

/// Placeholder route for hills with no curated route data, derived from the
/// summit height the same way the original dataset was seeded.
fn standard_route(name: &str, height: u32) -> Route {
    debug!(name, "no curated routes, synthesizing standard route");
    let difficulty = if height > 2000 {
        Difficulty::Hard
    } else if height > 1000 {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    };
    Route {
        id: 1,
        name: format!("Standard Route to {name}"),
        start: "Base Camp".to_string(),
        end: format!("Summit of {name}"),
        time: if height > 1500 {
            "4-5 hours".to_string()
        } else {
            "1-2 hours".to_string()
        },
        difficulty,
        height_diff: height,
        summer_gear: "Hiking boots".to_string(),
        winter_gear: "Crampons (if snowy)".to_string(),
        images: vec![],
        comments: vec![],
        description_of_start: "Parking lot at the base.".to_string(),
        description_of_path: "A well-marked path, moderate incline.".to_string(),
        gps: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dataset_loads() {
        let catalog = load_default().unwrap();
        assert!(catalog.len() > 100);
        assert!(!catalog.distinct_mountain_ranges().is_empty());
    }

    #[test]
    fn test_triglav_keeps_curated_routes() {
        let catalog = load_default().unwrap();
        let triglav = catalog.get(1).unwrap();
        assert_eq!(triglav.name, "Triglav");
        assert_eq!(triglav.height, 2864);
        assert_eq!(triglav.routes.len(), 9);
        assert!(triglav.routes.iter().all(|r| r.difficulty == Difficulty::Hard));
        // Route ids are unique within the hill
        let mut ids: Vec<u32> = triglav.routes.iter().map(|r| r.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn test_gps_manifest_association() {
        let catalog = load_default().unwrap();
        let triglav = catalog.get(1).unwrap();
        assert_eq!(triglav.gps.len(), 8);
        assert!(triglav.gps.iter().all(|f| f.starts_with("triglav-")));
    }

    #[test]
    fn test_hills_without_curated_routes_get_standard_route() {
        let catalog = load_default().unwrap();
        let mangart = catalog.get(2).unwrap();
        assert_eq!(mangart.name, "Mangart");
        assert_eq!(mangart.routes.len(), 1);
        assert_eq!(mangart.routes[0].difficulty, Difficulty::Hard);
        assert_eq!(mangart.routes[0].height_diff, mangart.height);
    }

    #[test]
    fn test_every_hill_has_images_and_valid_popularity() {
        let catalog = load_default().unwrap();
        for hill in catalog.all() {
            assert!(!hill.images.is_empty(), "{} has no images", hill.name);
            assert!((1..=5).contains(&hill.popularity));
        }
    }

    #[test]
    fn test_parenthetical_name_still_claims_its_files() {
        let raw = RawHill {
            id: 1,
            name: "Vršič pass (road)".to_string(),
            lat: 46.44,
            lon: 13.74,
            mountain_range: "Julian Alps".to_string(),
            height: 1611,
            popularity: 3,
            routes: vec![],
            description: None,
            webcams: vec![],
            comments: vec![],
        };
        let gps_manifest = vec!["vršič_pass-top.gpx".to_string()];

        let catalog = build_catalog(vec![raw], &gps_manifest, &[]);
        let hill = catalog.get(1).unwrap();
        assert_eq!(hill.gps, vec!["vršič_pass-top.gpx"]);

        // The unmatched check sees the same cleaned names as association did
        let display_names: Vec<String> =
            catalog.all().iter().map(|h| clean_name(&h.name)).collect();
        assert!(assets::unmatched_files(&gps_manifest, &display_names).is_empty());
    }

    #[test]
    fn test_clean_name_strips_parenthetical() {
        assert_eq!(clean_name("Vršič pass (road)"), "Vršič pass");
        assert_eq!(clean_name("Stol"), "Stol");
    }

    #[test]
    fn test_infer_kind() {
        assert_eq!(infer_kind("Veliki vrh"), "Peak");
        assert_eq!(infer_kind("Šmarna gora"), "Hill");
    }

    #[test]
    fn test_standard_route_difficulty_thresholds() {
        assert_eq!(standard_route("A", 2100).difficulty, Difficulty::Hard);
        assert_eq!(standard_route("B", 1500).difficulty, Difficulty::Medium);
        assert_eq!(standard_route("C", 800).difficulty, Difficulty::Easy);
    }
}
