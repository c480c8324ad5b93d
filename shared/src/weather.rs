//! Weather proxy backed by the OpenWeather current conditions API.

use async_trait::async_trait;
use lambda_http::Request;
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::WeatherResult;
use crate::proxy::{param, round_to, MockRng, Proxy};
use crate::{Config, Error, Result};

/// Conditions the mock generator picks from.
pub const MOCK_DESCRIPTIONS: [&str; 4] = ["Clear sky", "Partly cloudy", "Sunny", "Light rain"];

const MISSING_CITY: &str = "City parameter is required";
const LOOKUP_FAILED: &str = "City not found or API error";

/// Validated weather lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    pub fn new(city: Option<&str>) -> Result<Self> {
        match city.map(str::trim).filter(|c| !c.is_empty()) {
            Some(city) => Ok(Self {
                city: city.to_string(),
            }),
            None => Err(Error::Validation(MISSING_CITY.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: i32,
    pressure: i32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl TryFrom<OwCurrentResponse> for WeatherResult {
    type Error = Error;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self> {
        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| {
                Error::Internal("OpenWeather response contained no conditions".to_string())
            })?;

        Ok(Self {
            city: parsed.name,
            temperature: parsed.main.temp.round() as i32,
            feels_like: parsed.main.feels_like.round() as i32,
            humidity: parsed.main.humidity,
            description,
            wind_speed: parsed.wind.speed,
            pressure: parsed.main.pressure,
        })
    }
}

/// Proxy for `GET /weather?city=<name>`.
#[derive(Debug)]
pub struct WeatherProxy {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    rng: MockRng,
}

impl WeatherProxy {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http: config.http_client()?,
            api_key: config.openweather_api_key.clone(),
            base_url: config.openweather_base_url.trim_end_matches('/').to_string(),
            rng: MockRng::from_os(),
        })
    }

    /// Replace the mock data source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: MockRng) -> Self {
        self.rng = rng;
        self
    }

    /// Look up current conditions, live or mocked depending on configuration.
    pub async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherResult> {
        match self.api_key.as_deref() {
            Some(key) => self.fetch_current(&query.city, key).await,
            None => {
                debug!(city = %query.city, "No OpenWeather key configured, generating mock weather");
                self.mock(&query.city)
            }
        }
    }

    fn mock(&self, city: &str) -> Result<WeatherResult> {
        let mut rng = self.rng.lock()?;

        Ok(WeatherResult {
            city: city.to_string(),
            temperature: rng.random_range(15..35),
            feels_like: rng.random_range(15..35),
            humidity: rng.random_range(40..80),
            description: MOCK_DESCRIPTIONS[rng.random_range(0..MOCK_DESCRIPTIONS.len())]
                .to_string(),
            wind_speed: round_to(rng.random_range(2.0..12.0), 1),
            pressure: rng.random_range(1000..1050),
        })
    }

    async fn fetch_current(&self, city: &str, api_key: &str) -> Result<WeatherResult> {
        let url = format!("{}/weather", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                warn!(city = %city, timeout = e.is_timeout(), "OpenWeather request failed");
                Error::from_transport(e, 404, LOOKUP_FAILED)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(city = %city, status = %status, "OpenWeather lookup failed");
            return Err(Error::upstream(404, LOOKUP_FAILED));
        }

        let parsed: OwCurrentResponse = response
            .json()
            .await
            .map_err(|e| Error::from_transport(e, 404, LOOKUP_FAILED))?;
        WeatherResult::try_from(parsed)
    }
}

#[async_trait]
impl Proxy for WeatherProxy {
    type Query = WeatherQuery;
    type Output = WeatherResult;

    const NAME: &'static str = "weather";

    fn parse(event: &Request) -> Result<WeatherQuery> {
        WeatherQuery::new(param(event, "city"))
    }

    async fn handle(&self, query: WeatherQuery) -> Result<WeatherResult> {
        self.lookup(&query).await
    }

    fn is_live(&self) -> bool {
        self.api_key.is_some()
    }
}
