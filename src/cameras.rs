//! Live webcam gallery
//!
//! A curated list of mountain webcams. Several sources publish their feed
//! behind an `image.html?<path>` viewer page; [`live_image_url`] derives the
//! direct image URL and appends a cache-busting timestamp so previews refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HribiError;

const CAMERAS_JSON: &str = include_str!("../assets/cameras.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub url: String,
    #[serde(default)]
    pub embed: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Load the bundled camera list.
pub fn load_default() -> crate::Result<Vec<Camera>> {
    serde_json::from_str(CAMERAS_JSON)
        .map_err(|e| HribiError::validation(format!("bundled camera list: {e}")))
}

/// Best-effort direct image URL for a camera at the given instant.
///
/// Total: a URL that doesn't follow the viewer-page convention is passed
/// through with only the timestamp appended.
#[must_use]
pub fn live_image_url(camera: &Camera, now: DateTime<Utc>) -> String {
    append_timestamp(&unwrap_viewer_url(&camera.url), now)
}

/// Turn `https://host/..../image.html?/path/to/latest.jpg` into
/// `https://host/path/to/latest.jpg`.
fn unwrap_viewer_url(url: &str) -> String {
    let Some(pos) = url.find("image.html?") else {
        return url.to_string();
    };
    let direct_path = &url[pos + "image.html?".len()..];
    match origin_of(url) {
        Some(origin) => format!("{origin}{direct_path}"),
        None => url.to_string(),
    }
}

/// Scheme and host of an absolute URL ("https://host"), without any path.
fn origin_of(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")?;
    let rest = &url[scheme_end + 3..];
    match rest.find('/') {
        Some(slash) => Some(&url[..scheme_end + 3 + slash]),
        None => Some(url),
    }
}

fn append_timestamp(url: &str, now: DateTime<Utc>) -> String {
    if url.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}_={}", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    fn camera(url: &str) -> Camera {
        Camera {
            id: 1,
            name: "Test Cam".to_string(),
            location: None,
            url: url.to_string(),
            embed: true,
            description: None,
        }
    }

    #[test]
    fn test_viewer_url_is_unwrapped() {
        let cam = camera(
            "https://www.meteo.si/uploads/app/image.html?/uploads/probase/www/observ/webcam/KREDA-ICA_dir/siwc_KREDA-ICA_e_latest.jpg",
        );
        let live = live_image_url(&cam, at());
        assert!(live.starts_with(
            "https://www.meteo.si/uploads/probase/www/observ/webcam/KREDA-ICA_dir/siwc_KREDA-ICA_e_latest.jpg?_="
        ));
    }

    #[test]
    fn test_plain_url_gets_timestamp_only() {
        let cam = camera("https://example.com/cam.jpg");
        let live = live_image_url(&cam, at());
        assert!(live.starts_with("https://example.com/cam.jpg?_="));
    }

    #[test]
    fn test_existing_query_uses_ampersand() {
        let cam = camera("https://example.com/cam.jpg?size=big");
        let live = live_image_url(&cam, at());
        assert!(live.contains("size=big&_="));
    }

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://www.meteo.si/uploads/app/image.html?x"),
            Some("https://www.meteo.si")
        );
        assert_eq!(origin_of("no-scheme/path"), None);
    }

    #[test]
    fn test_bundled_cameras_load() {
        let cameras = load_default().unwrap();
        assert!(!cameras.is_empty());
        assert!(cameras.iter().all(|c| !c.url.is_empty()));
    }
}
