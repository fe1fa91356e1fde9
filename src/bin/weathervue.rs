use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tododo::app::{WeatherState, create_weather_app, serve};
use tododo::weather::{DEFAULT_OPENWEATHER_URL, OpenWeatherMap, WeatherEndpoint, WeatherSource};

#[derive(Parser, Debug)]
#[command(author, version, about = "Weather lookup page", long_about = None)]
struct Args {
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    #[arg(long, env = "OPENWEATHER_API_KEY")]
    api_key: Option<String>,

    #[arg(long, env = "OPENWEATHER_API_URL", default_value = DEFAULT_OPENWEATHER_URL)]
    api_url: String,

    /// Base URL of a `/weather?city=` endpoint for the widget to query.
    /// Without it the widget asks OpenWeatherMap directly.
    #[arg(long, env = "WEATHER_ENDPOINT")]
    weather_endpoint: Option<String>,

    #[arg(short, long, env = "KEY_FILE_PATH", requires = "cert_file_path")]
    key_file_path: Option<String>,

    #[arg(short, long, env = "CERT_FILE_PATH", requires = "key_file_path")]
    cert_file_path: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();

    let api_key = args.api_key.unwrap_or_else(|| {
        log::warn!("no OpenWeatherMap api key given, all lookups will fail");
        String::new()
    });
    let upstream: Arc<dyn WeatherSource> = Arc::new(OpenWeatherMap::new(args.api_url, api_key));
    let widget_source: Arc<dyn WeatherSource> = match args.weather_endpoint {
        Some(endpoint) => {
            log::info!("widget queries {}", endpoint);
            Arc::new(WeatherEndpoint::new(endpoint))
        }
        None => upstream.clone(),
    };

    let app = create_weather_app(WeatherState {
        widget_source,
        upstream,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    serve(app, addr, args.key_file_path.zip(args.cert_file_path))
        .await
        .expect("server failed");
}
