use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org";

/// Current weather for a city, in the shape OpenWeatherMap reports it.
/// Only the fields that are displayed are kept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub name: String,
    pub sys: Sys,
    pub main: MainReadings,
    pub weather: Vec<Conditions>,
    pub wind: Wind,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sys {
    pub country: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MainReadings {
    pub temp: f64, // Celsius
    pub humidity: f64, // Percent
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Conditions {
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Wind {
    pub speed: f64, // m/s
}

impl WeatherReport {
    pub fn description(&self) -> Option<&str> {
        self.weather.first().map(|c| c.description.as_str())
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found (status {status})")]
    NotFound { status: StatusCode },
    #[error("Weather report has no {0}")]
    Incomplete(&'static str),
    #[error("Weather request failed: {source}")]
    Request {
        #[from]
        source: reqwest::Error,
    },
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

async fn decode_report(response: Response) -> Result<WeatherReport, WeatherError> {
    let status = response.status();
    if !status.is_success() {
        return Err(WeatherError::NotFound { status });
    }
    let report: WeatherReport = response.json().await?;
    if report.description().is_none() {
        return Err(WeatherError::Incomplete("weather description"));
    }
    Ok(report)
}

/// A `/weather?city=<name>` endpoint, such as the one served by the
/// weathervue binary itself.
#[derive(Debug, Clone)]
pub struct WeatherEndpoint {
    client: Client,
    base_url: String,
}

impl WeatherEndpoint {
    pub fn new(base_url: impl Into<String>) -> WeatherEndpoint {
        WeatherEndpoint {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl WeatherSource for WeatherEndpoint {
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));
        debug!("Fetching weather for {} from {}", city, url);
        let response = self
            .client
            .get(url)
            .query(&[("city", city)])
            .send()
            .await?;
        decode_report(response).await
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherMap {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OpenWeatherMap {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> OpenWeatherMap {
        OpenWeatherMap {
            client: Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherMap {
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.api_url.trim_end_matches('/'));
        debug!("Fetching weather for {} from {}", city, url);
        let response = self
            .client
            .get(url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;
        decode_report(response).await
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode as AxumStatusCode;
    use axum::response::{IntoResponse, Response as AxumResponse};
    use axum::{Json, Router, routing::get};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::net::SocketAddr;

    pub(crate) fn lagos() -> Value {
        json!({
            "name": "Lagos",
            "sys": {"country": "NG"},
            "main": {"temp": 31, "humidity": 70},
            "weather": [{"description": "clear sky"}],
            "wind": {"speed": 3.1}
        })
    }

    async fn respond(city: Option<&String>) -> AxumResponse {
        match city.map(String::as_str) {
            Some("Lagos") => Json(lagos()).into_response(),
            Some("Nowhere") => Json(json!({"name": "Nowhere"})).into_response(),
            _ => (
                AxumStatusCode::NOT_FOUND,
                Json(json!({"cod": "404", "message": "city not found"})),
            )
                .into_response(),
        }
    }

    /// Serves canned reports both as a `/weather` endpoint and as the
    /// OpenWeatherMap API on a random local port.
    pub(crate) async fn spawn_mock_upstream() -> SocketAddr {
        let app = Router::new()
            .route(
                "/weather",
                get(|Query(query): Query<HashMap<String, String>>| async move {
                    respond(query.get("city")).await
                }),
            )
            .route(
                "/data/2.5/weather",
                get(|Query(query): Query<HashMap<String, String>>| async move {
                    assert_eq!(query.get("units").map(String::as_str), Some("metric"));
                    respond(query.get("q")).await
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    #[tokio::test]
    async fn endpoint_decodes_report() {
        let addr = spawn_mock_upstream().await;
        let report = WeatherEndpoint::new(format!("http://{addr}"))
            .fetch("Lagos")
            .await
            .unwrap();
        assert_eq!(report.name, "Lagos");
        assert_eq!(report.sys.country, "NG");
        assert_eq!(report.main.temp, 31.0);
        assert_eq!(report.description(), Some("clear sky"));
        assert_eq!(report.wind.speed, 3.1);
    }

    #[tokio::test]
    async fn endpoint_maps_error_status_to_not_found() {
        let addr = spawn_mock_upstream().await;
        let result = WeatherEndpoint::new(format!("http://{addr}/"))
            .fetch("Atlantis")
            .await;
        assert!(matches!(
            result,
            Err(WeatherError::NotFound { status }) if status == StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn report_with_missing_fields_is_rejected() {
        let addr = spawn_mock_upstream().await;
        let result = WeatherEndpoint::new(format!("http://{addr}"))
            .fetch("Nowhere")
            .await;
        assert!(matches!(result, Err(WeatherError::Request { .. })));
    }

    #[tokio::test]
    async fn open_weather_map_queries_by_city_name() {
        let addr = spawn_mock_upstream().await;
        let source = OpenWeatherMap::new(format!("http://{addr}"), "secret");
        assert_eq!(source.fetch("Lagos").await.unwrap().name, "Lagos");
        assert!(matches!(
            source.fetch("Atlantis").await,
            Err(WeatherError::NotFound { .. })
        ));
    }

    #[test]
    fn report_without_conditions_has_no_description() {
        let mut value = lagos();
        value["weather"] = json!([]);
        let report: WeatherReport = serde_json::from_value(value).unwrap();
        assert_eq!(report.description(), None);
    }
}
