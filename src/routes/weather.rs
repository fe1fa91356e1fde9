use askama::Template;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use serde_json::json;

use crate::app::WeatherState;
use crate::error::AppError;
use crate::routes::index::render_main;
use crate::weather::{WeatherError, WeatherReport, WeatherSource};

pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name";
pub const NOT_FOUND_MESSAGE: &str = "City not found";
pub const FETCH_FAILED_MESSAGE: &str = "Could not fetch weather";

pub fn routes(state: WeatherState) -> Router {
    Router::new()
        .route("/", get(get_weather_page))
        .route("/widget", get(get_widget))
        .route("/weather", get(get_weather_report))
        .with_state(state)
}

#[derive(Deserialize, Debug)]
struct CityQuery {
    #[serde(default)]
    city: String,
}

#[derive(Template)]
#[template(path = "weather.html")]
struct WeatherPageTemplate<'a> {
    city: &'a str,
    info: &'a str,
}

#[derive(Template)]
#[template(path = "weather_info.html")]
struct WeatherInfoTemplate<'a> {
    report: &'a WeatherReport,
    description: &'a str,
}

#[derive(Template)]
#[template(path = "weather_message.html")]
struct WeatherMessageTemplate<'a> {
    message: &'a str,
}

/// Renders the content of the weather display region for `city`.
///
/// A blank city is rejected before any request is made. Every outcome
/// renders the whole region, so nothing from an earlier lookup remains.
pub async fn render_widget(
    source: &dyn WeatherSource,
    city: &str,
) -> Result<String, askama::Error> {
    let city = city.trim();
    if city.is_empty() {
        return WeatherMessageTemplate {
            message: EMPTY_CITY_MESSAGE,
        }
        .render();
    }

    match source.fetch(city).await {
        Ok(report) => WeatherInfoTemplate {
            report: &report,
            description: report.description().unwrap_or_default(),
        }
        .render(),
        Err(WeatherError::NotFound { status }) => {
            log::debug!("No weather for {}: upstream answered {}", city, status);
            WeatherMessageTemplate {
                message: NOT_FOUND_MESSAGE,
            }
            .render()
        }
        Err(err) => {
            log::error!("Failed to fetch weather for {}: {}", city, err);
            WeatherMessageTemplate {
                message: FETCH_FAILED_MESSAGE,
            }
            .render()
        }
    }
}

fn render_page(city: &str, info: &str) -> Result<String, askama::Error> {
    let content = WeatherPageTemplate { city, info }.render()?;
    render_main("Weather", &content)
}

async fn get_weather_page() -> Result<Response, AppError> {
    Ok(Html(render_page("", "")?).into_response())
}

async fn get_widget(
    headers: HeaderMap,
    State(state): State<WeatherState>,
    Query(query): Query<CityQuery>,
) -> Result<Response, AppError> {
    let info = render_widget(state.widget_source.as_ref(), &query.city).await?;
    // htmx swaps the fragment into the page, plain form submissions get the
    // whole page back.
    let content = if headers.get("hx-request").is_some() {
        info
    } else {
        render_page(&query.city, &info)?
    };
    Ok(Html(content).into_response())
}

async fn get_weather_report(
    State(state): State<WeatherState>,
    Query(query): Query<CityQuery>,
) -> Response {
    let city = query.city.trim();
    if city.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": EMPTY_CITY_MESSAGE })),
        )
            .into_response();
    }
    match state.upstream.fetch(city).await {
        Ok(report) => Json(report).into_response(),
        Err(WeatherError::NotFound { status }) => {
            log::debug!("No weather for {}: upstream answered {}", city, status);
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": NOT_FOUND_MESSAGE })),
            )
                .into_response()
        }
        Err(err) => {
            log::error!("Failed to fetch weather for {}: {}", city, err);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": FETCH_FAILED_MESSAGE })),
            )
                .into_response()
        }
    }
}
