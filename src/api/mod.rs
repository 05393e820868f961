//! HTTP API surface
//!
//! Thin axum handlers over the catalog core. All state is an explicitly
//! constructed [`AppState`] handed to the router; handlers only translate
//! between HTTP and the library types.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::cameras::{self, Camera};
use crate::catalog::{
    Catalog, Difficulty, FilterCriteria, Hill, HillId, POPULAR_HILLS, Route, SelectionController,
    query,
};
use crate::error::HribiError;
use crate::news::NewsItem;
use crate::weather::{self, WeatherService};

/// Everything the handlers need, built once in the composition root.
pub struct AppState {
    pub catalog: Catalog,
    /// Absent when no weather API key is configured
    pub weather: Option<WeatherService>,
    pub selection: Mutex<SelectionController>,
    pub cameras: Vec<Camera>,
    pub news: Vec<NewsItem>,
}

#[derive(Serialize)]
pub struct ApiHillSummary {
    pub id: HillId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub mountain_range: String,
    pub height: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub popularity: u8,
}

impl From<&Hill> for ApiHillSummary {
    fn from(hill: &Hill) -> Self {
        Self {
            id: hill.id,
            name: hill.name.clone(),
            lat: hill.lat,
            lon: hill.lon,
            mountain_range: hill.mountain_range.clone(),
            height: hill.height,
            kind: hill.kind.clone(),
            popularity: hill.popularity,
        }
    }
}

#[derive(Serialize)]
pub struct ApiHillDetail {
    #[serde(flatten)]
    pub summary: ApiHillSummary,
    pub country: String,
    pub description: String,
    pub images: Vec<crate::catalog::Image>,
    pub routes: Vec<Route>,
    pub webcams: Vec<crate::catalog::Webcam>,
    pub comments: Vec<crate::catalog::Comment>,
    pub gps: Vec<String>,
}

impl From<&Hill> for ApiHillDetail {
    fn from(hill: &Hill) -> Self {
        Self {
            summary: ApiHillSummary::from(hill),
            country: hill.country.clone(),
            description: hill.description.clone(),
            images: hill.images.clone(),
            routes: hill.routes.clone(),
            webcams: hill.webcams.clone(),
            comments: hill.comments.clone(),
            gps: hill.gps.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct ApiCurrent {
    pub temperature: f32,
    pub description: String,
    pub icon: String,
    pub icon_url: String,
}

#[derive(Serialize)]
pub struct ApiDailyForecast {
    pub day: String,
    pub icon: String,
    pub icon_url: String,
    pub high_temp: i32,
    pub low_temp: i32,
}

/// Weather for one hill; both parts empty when no data is available.
#[derive(Serialize)]
pub struct ApiWeather {
    pub current: Option<ApiCurrent>,
    pub forecast: Vec<ApiDailyForecast>,
}

#[derive(Serialize)]
pub struct ApiNearbyHill {
    #[serde(flatten)]
    pub hill: ApiHillSummary,
    pub distance_km: f64,
}

#[derive(Serialize)]
pub struct ApiCamera {
    pub id: u32,
    pub name: String,
    pub location: Option<String>,
    pub url: String,
    pub live_url: String,
    pub embed: bool,
    pub description: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/hills", get(list_hills))
        .route("/hills/{id}", get(get_hill))
        .route("/hills/{id}/weather", get(get_hill_weather))
        .route("/ranges", get(list_ranges))
        .route("/popular", get(list_popular))
        .route("/resolve", get(resolve_hill))
        .route("/nearby", get(list_nearby))
        .route("/cameras", get(list_cameras))
        .route("/news", get(list_news))
        .route(
            "/selection",
            get(get_selection).put(put_selection).delete(clear_selection),
        )
        .with_state(state)
}

#[derive(Deserialize)]
struct HillsQuery {
    range: Option<String>,
    min_height: Option<u32>,
    max_height: Option<u32>,
    difficulty: Option<String>,
    q: Option<String>,
}

async fn list_hills(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HillsQuery>,
) -> Result<Json<Vec<ApiHillSummary>>, StatusCode> {
    let difficulty = match params.difficulty.as_deref() {
        Some(raw) => Some(
            raw.parse::<Difficulty>()
                .map_err(|_| StatusCode::BAD_REQUEST)?,
        ),
        None => None,
    };

    let criteria = FilterCriteria {
        mountain_range: params.range,
        min_height: params.min_height,
        max_height: params.max_height,
        difficulty,
    };

    let filtered = query::filter_by(state.catalog.all(), &criteria);
    let hills: Vec<ApiHillSummary> = match params.q.as_deref() {
        Some(q) => {
            let owned: Vec<Hill> = filtered.into_iter().cloned().collect();
            query::search_by_name(&owned, q)
                .into_iter()
                .map(ApiHillSummary::from)
                .collect()
        }
        None => filtered.into_iter().map(ApiHillSummary::from).collect(),
    };
    Ok(Json(hills))
}

async fn get_hill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<HillId>,
) -> Result<Json<ApiHillDetail>, StatusCode> {
    match state.catalog.get(id) {
        Ok(hill) => Ok(Json(ApiHillDetail::from(hill))),
        Err(HribiError::NotFound { .. }) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn get_hill_weather(
    State(state): State<Arc<AppState>>,
    Path(id): Path<HillId>,
) -> Result<Json<ApiWeather>, StatusCode> {
    let hill = state.catalog.get(id).map_err(|_| StatusCode::NOT_FOUND)?;

    // No data is a displayable state, never a 5xx
    let Some(service) = &state.weather else {
        return Ok(Json(ApiWeather {
            current: None,
            forecast: vec![],
        }));
    };

    let current = service.current_at(hill.lat, hill.lon).await.map(|c| ApiCurrent {
        icon_url: weather::icon_url(&c.icon),
        temperature: c.temperature,
        description: c.description,
        icon: c.icon,
    });
    let forecast = service
        .forecast_at(hill.lat, hill.lon)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|d| ApiDailyForecast {
            icon_url: weather::icon_url(&d.icon),
            day: d.day,
            icon: d.icon,
            high_temp: d.high_temp,
            low_temp: d.low_temp,
        })
        .collect();

    Ok(Json(ApiWeather { current, forecast }))
}

async fn list_ranges(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.distinct_mountain_ranges().to_vec())
}

async fn list_popular(State(state): State<Arc<AppState>>) -> Json<Vec<ApiHillSummary>> {
    let popular = query::popular_subset(state.catalog.all(), POPULAR_HILLS);
    Json(popular.into_iter().map(ApiHillSummary::from).collect())
}

#[derive(Deserialize)]
struct ResolveQuery {
    name: String,
}

async fn resolve_hill(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<ApiHillSummary>, StatusCode> {
    query::resolve_by_name(state.catalog.all(), &params.name)
        .map(|hill| Json(ApiHillSummary::from(hill)))
        .map_err(|_| StatusCode::NOT_FOUND)
}

#[derive(Deserialize)]
struct NearbyQuery {
    lat: f64,
    lon: f64,
    radius_km: Option<f64>,
}

async fn list_nearby(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyQuery>,
) -> Json<Vec<ApiNearbyHill>> {
    let radius_km = params.radius_km.unwrap_or(30.0);
    let nearby = query::within_radius(state.catalog.all(), params.lat, params.lon, radius_km);
    Json(
        nearby
            .into_iter()
            .map(|(hill, distance_km)| ApiNearbyHill {
                hill: ApiHillSummary::from(hill),
                distance_km,
            })
            .collect(),
    )
}

async fn list_cameras(State(state): State<Arc<AppState>>) -> Json<Vec<ApiCamera>> {
    let now = Utc::now();
    Json(
        state
            .cameras
            .iter()
            .map(|camera| ApiCamera {
                id: camera.id,
                name: camera.name.clone(),
                location: camera.location.clone(),
                url: camera.url.clone(),
                live_url: cameras::live_image_url(camera, now),
                embed: camera.embed,
                description: camera.description.clone(),
            })
            .collect(),
    )
}

async fn list_news(State(state): State<Arc<AppState>>) -> Json<Vec<NewsItem>> {
    Json(state.news.clone())
}

#[derive(Serialize, Deserialize)]
struct SelectionBody {
    ids: Vec<HillId>,
}

async fn get_selection(State(state): State<Arc<AppState>>) -> Json<Vec<HillId>> {
    let selection = state.selection.lock().await;
    Json(selection.selection().to_vec())
}

async fn put_selection(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SelectionBody>,
) -> StatusCode {
    let mut selection = state.selection.lock().await;
    selection.select(body.ids);
    StatusCode::NO_CONTENT
}

async fn clear_selection(State(state): State<Arc<AppState>>) -> StatusCode {
    let mut selection = state.selection.lock().await;
    selection.clear();
    StatusCode::NO_CONTENT
}
