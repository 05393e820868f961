//! Weather enrichment for hills
//!
//! Current conditions and a 5-day forecast summary per hill, fetched from
//! OpenWeatherMap. Weather is best-effort enrichment: provider failures are
//! logged and surfaced as absence, never as errors, and callers must treat
//! "no data" as a normal, displayable state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use rand::RngExt;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::config::WeatherConfig;

/// Current conditions at one point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f32,
    pub description: String,
    /// Provider icon code ("04d" and the like)
    pub icon: String,
}

/// One 3-hourly forecast sample as delivered by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f32,
    pub icon: String,
}

/// Per-day forecast summary for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Day name, Slovenian ("Ponedeljek", ...)
    pub day: String,
    /// Representative icon, chosen by majority vote among the day's samples
    pub icon: String,
    pub high_temp: i32,
    pub low_temp: i32,
}

/// Seam for the weather backend so services and tests can swap providers.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentConditions>;
    async fn forecast_samples(&self, lat: f64, lon: f64) -> Result<Vec<ForecastSample>>;
}

/// OpenWeatherMap client with retrying HTTP middleware.
pub struct OwmClient {
    http: ClientWithMiddleware,
    api_key: String,
    base_url: String,
}

impl OwmClient {
    pub fn new(api_key: String, config: &WeatherConfig) -> Result<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()
            .context("Failed to build HTTP client")?;
        let http = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(OwmClient {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OwmClient {
    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentConditions> {
        let url = format!(
            "{}/weather?lat={lat}&lon={lon}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(&self.api_key)
        );
        let response: owm::CurrentResponse = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse current weather response")?;
        response.try_into()
    }

    async fn forecast_samples(&self, lat: f64, lon: f64) -> Result<Vec<ForecastSample>> {
        let url = format!(
            "{}/forecast?lat={lat}&lon={lon}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(&self.api_key)
        );
        let response: owm::ForecastResponse = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse forecast response")?;
        Ok(response.into_samples())
    }
}

/// `OpenWeatherMap` API response structures and conversion utilities
mod owm {
    use super::{CurrentConditions, ForecastSample};
    use anyhow::anyhow;
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ConditionData {
        pub description: String,
        pub icon: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f32,
    }

    /// Current weather response from `OpenWeatherMap`
    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub weather: Vec<ConditionData>,
        pub main: MainData,
    }

    /// 3-hourly forecast response from `OpenWeatherMap`
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<ForecastItem>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastItem {
        pub dt: i64,
        pub main: MainData,
        pub weather: Vec<ConditionData>,
    }

    impl TryFrom<CurrentResponse> for CurrentConditions {
        type Error = anyhow::Error;

        fn try_from(response: CurrentResponse) -> Result<Self, Self::Error> {
            let condition = response
                .weather
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("current weather response carries no condition"))?;
            Ok(CurrentConditions {
                temperature: response.main.temp,
                description: condition.description,
                icon: condition.icon,
            })
        }
    }

    impl ForecastResponse {
        pub fn into_samples(self) -> Vec<ForecastSample> {
            self.list
                .into_iter()
                .filter_map(|item| {
                    let timestamp: DateTime<Utc> = DateTime::from_timestamp(item.dt, 0)?;
                    let condition = item.weather.into_iter().next()?;
                    Some(ForecastSample {
                        timestamp,
                        temperature: item.main.temp,
                        icon: condition.icon,
                    })
                })
                .collect()
        }
    }
}

/// Display URL for a provider icon code.
#[must_use]
pub fn icon_url(icon_code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon_code}@2x.png")
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Ponedeljek",
        Weekday::Tue => "Torek",
        Weekday::Wed => "Sreda",
        Weekday::Thu => "Četrtek",
        Weekday::Fri => "Petek",
        Weekday::Sat => "Sobota",
        Weekday::Sun => "Nedelja",
    }
}

fn majority_icon(icons: &[String]) -> String {
    let mut best: Option<(&str, usize)> = None;
    for icon in icons {
        let count = icons.iter().filter(|i| *i == icon).count();
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((icon, count)),
        }
    }
    best.map(|(icon, _)| icon.to_string()).unwrap_or_default()
}

/// Collapse 3-hourly samples into per-day summaries, at most five days.
///
/// Days appear in sample order; each day carries its rounded high/low and the
/// icon a majority of that day's samples agree on (first seen wins ties).
#[must_use]
pub fn summarize_forecast(samples: &[ForecastSample]) -> Vec<DailyForecast> {
    let mut days: Vec<(NaiveDate, Vec<&ForecastSample>)> = Vec::new();
    for sample in samples {
        let date = sample.timestamp.date_naive();
        match days.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(sample),
            None => days.push((date, vec![sample])),
        }
    }

    days.into_iter()
        .take(5)
        .map(|(date, bucket)| {
            let high = bucket
                .iter()
                .map(|s| s.temperature)
                .fold(f32::MIN, f32::max);
            let low = bucket
                .iter()
                .map(|s| s.temperature)
                .fold(f32::MAX, f32::min);
            let icons: Vec<String> = bucket.iter().map(|s| s.icon.clone()).collect();
            DailyForecast {
                day: day_name(chrono::Datelike::weekday(&date)).to_string(),
                icon: majority_icon(&icons),
                high_temp: high.round() as i32,
                low_temp: low.round() as i32,
            }
        })
        .collect()
}

/// Weather lookups for hills, with a persistent TTL cache in front of the
/// provider. All failures degrade to `None`.
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    cache: Cache,
    ttl: Duration,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, cache: Cache, ttl: Duration) -> Self {
        WeatherService {
            provider,
            cache,
            ttl,
        }
    }

    /// Build a service from config; `None` when no API key is configured,
    /// in which case weather enrichment is disabled.
    pub fn from_config(config: &WeatherConfig, cache: Cache, ttl: Duration) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            warn!("no weather API key configured, weather enrichment disabled");
            return Ok(None);
        };
        let client = OwmClient::new(api_key, config)?;
        Ok(Some(WeatherService::new(Arc::new(client), cache, ttl)))
    }

    /// Current conditions at a point, or `None` when unavailable.
    pub async fn current_at(&self, lat: f64, lon: f64) -> Option<CurrentConditions> {
        let key = cache_key("current", lat, lon);
        if let Some(cached) = self.cache_get::<CurrentConditions>(&key).await {
            return Some(cached);
        }

        match self.provider.current(lat, lon).await {
            Ok(conditions) => {
                self.cache_put(&key, conditions.clone()).await;
                Some(conditions)
            }
            Err(e) => {
                warn!(lat, lon, error = %e, "current weather unavailable");
                None
            }
        }
    }

    /// Five-day forecast summary at a point, or `None` when unavailable.
    pub async fn forecast_at(&self, lat: f64, lon: f64) -> Option<Vec<DailyForecast>> {
        let key = cache_key("forecast", lat, lon);
        if let Some(cached) = self.cache_get::<Vec<DailyForecast>>(&key).await {
            return Some(cached);
        }

        match self.provider.forecast_samples(lat, lon).await {
            Ok(samples) => {
                let summary = summarize_forecast(&samples);
                self.cache_put(&key, summary.clone()).await;
                Some(summary)
            }
            Err(e) => {
                warn!(lat, lon, error = %e, "forecast unavailable");
                None
            }
        }
    }

    async fn cache_get<T: serde::de::DeserializeOwned + Send + 'static>(
        &self,
        key: &str,
    ) -> Option<T> {
        match self.cache.get::<T>(key).await {
            Ok(hit) => hit,
            Err(e) => {
                debug!(key, error = %e, "cache read failed");
                None
            }
        }
    }

    async fn cache_put<T: Serialize + Send + std::fmt::Debug + 'static>(&self, key: &str, value: T) {
        // Jitter the TTL so cached entries do not all expire at once
        let jitter: f32 = rand::rng().random_range(0.9..1.1);
        let ttl = Duration::from_secs((self.ttl.as_secs() as f32 * jitter) as u64);
        if let Err(e) = self.cache.put(key, value, ttl).await {
            debug!(key, error = %e, "cache write failed");
        }
    }
}

/// Coordinates are rounded so nearby lookups share a cache entry.
fn cache_key(kind: &str, lat: f64, lon: f64) -> String {
    format!("weather:{kind}:{lat:.2}:{lon:.2}")
}

/// Issues monotonically increasing request tokens so a stale response can be
/// recognized and discarded.
///
/// A slow request started before a newer one must not overwrite the newer
/// result: callers take a token with [`begin`](Self::begin) before starting a
/// request and check [`is_current`](Self::is_current) when it completes.
///
/// The stateless HTTP handlers have no per-client "latest request" to guard,
/// so the server does not use this itself; it is offered to interactive hosts
/// (one instance per weather panel) that fire a lookup on every selection
/// change and must only render the newest result.
#[derive(Debug, Default)]
pub struct RequestSequence {
    counter: AtomicU64,
}

impl RequestSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, invalidating all earlier tokens.
    pub fn begin(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while no newer request has begun since this token was issued.
    #[must_use]
    pub fn is_current(&self, token: u64) -> bool {
        self.counter.load(Ordering::SeqCst) == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::TimeZone;

    fn sample(day: u32, hour: u32, temperature: f32, icon: &str) -> ForecastSample {
        ForecastSample {
            timestamp: Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap(),
            temperature,
            icon: icon.to_string(),
        }
    }

    #[test]
    fn test_summarize_groups_by_day_with_high_low() {
        let samples = vec![
            sample(2, 6, 1.4, "04d"),
            sample(2, 12, 8.6, "01d"),
            sample(2, 18, 4.0, "04d"),
            sample(3, 12, 12.2, "10d"),
        ];
        let summary = summarize_forecast(&samples);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].high_temp, 9);
        assert_eq!(summary[0].low_temp, 1);
        assert_eq!(summary[0].icon, "04d");
        assert_eq!(summary[0].day, "Ponedeljek"); // 2026-03-02
        assert_eq!(summary[1].day, "Torek");
    }

    #[test]
    fn test_summarize_caps_at_five_days() {
        let samples: Vec<ForecastSample> = (1..=7)
            .map(|day| sample(day, 12, 10.0, "01d"))
            .collect();
        assert_eq!(summarize_forecast(&samples).len(), 5);
    }

    #[test]
    fn test_majority_icon_first_seen_wins_ties() {
        let icons = vec!["01d".to_string(), "04d".to_string()];
        assert_eq!(majority_icon(&icons), "01d");

        let icons = vec!["01d".to_string(), "04d".to_string(), "04d".to_string()];
        assert_eq!(majority_icon(&icons), "04d");
    }

    #[test]
    fn test_summarize_empty_is_empty() {
        assert!(summarize_forecast(&[]).is_empty());
    }

    #[test]
    fn test_cache_key_rounds_coordinates() {
        assert_eq!(
            cache_key("current", 46.3768, 13.8378),
            "weather:current:46.38:13.84"
        );
    }

    #[test]
    fn test_icon_url() {
        assert_eq!(
            icon_url("04d"),
            "https://openweathermap.org/img/wn/04d@2x.png"
        );
    }

    #[test]
    fn test_request_sequence_discards_stale() {
        let sequence = RequestSequence::new();
        let first = sequence.begin();
        let second = sequence.begin();
        assert!(!sequence.is_current(first));
        assert!(sequence.is_current(second));
    }

    struct FailingProvider;

    #[async_trait]
    impl WeatherProvider for FailingProvider {
        async fn current(&self, _lat: f64, _lon: f64) -> Result<CurrentConditions> {
            Err(anyhow!("provider down"))
        }

        async fn forecast_samples(&self, _lat: f64, _lon: f64) -> Result<Vec<ForecastSample>> {
            Err(anyhow!("provider down"))
        }
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_none() {
        let dir = std::env::temp_dir().join(format!("hribi-weather-test-{}", std::process::id()));
        let cache = Cache::open(&dir).unwrap();
        let service = WeatherService::new(
            Arc::new(FailingProvider),
            cache,
            Duration::from_secs(60),
        );

        assert!(service.current_at(46.0, 14.0).await.is_none());
        assert!(service.forecast_at(46.0, 14.0).await.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
