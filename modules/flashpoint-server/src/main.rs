use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flashpoint_common::{Config, Origin};
use flashpoint_feed::{GdeltAdapter, HttpTranslator, PendingGuard, RssAdapter, SourceAdapter};

mod rest;
mod sim;
mod state;
mod stream;

use state::AppState;

const GDELT_ENDPOINT: &str = "https://api.gdeltproject.org/api/v2/doc/doc?query=iran OR israel OR \"middle east\" OR oil&mode=artlist&maxrecords=20&format=json";
const REUTERS_ENDPOINT: &str =
    "https://www.reutersagency.com/feed/?best-regions=middle-east&post_type=best";
const BBC_ENDPOINT: &str = "https://feeds.bbci.co.uk/news/world/middle_east/rss.xml";

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("flashpoint=info".parse()?))
        .init();

    let config = Config::from_env();
    let client = reqwest::Client::builder()
        .timeout(config.fetch_timeout)
        .build()?;

    // GDELT is pre-filtered by its query; the RSS firehoses carry a
    // relevance keyword set each.
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(GdeltAdapter::new(client.clone(), GDELT_ENDPOINT, 20)),
        Arc::new(RssAdapter::new(
            client.clone(),
            Origin::Reuters,
            REUTERS_ENDPOINT,
            keywords(&["iran", "israel", "middle east", "oil"]),
            10,
        )),
        Arc::new(RssAdapter::new(
            client.clone(),
            Origin::Bbc,
            BBC_ENDPOINT,
            keywords(&["iran", "israel", "middle east"]),
            10,
        )),
    ];

    let sim_rx = sim::spawn_simulation(&config);

    let state = Arc::new(AppState {
        adapters,
        feed_cap: config.feed_cap,
        fetch_timeout: config.fetch_timeout,
        arc_points: config.arc_points,
        batch_size: config.batch_size,
        translator: Arc::new(HttpTranslator::new(client, &config.translate_url)),
        pending: PendingGuard::new(),
        sim: sim_rx,
    });

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/api/news", get(rest::api_news))
        .route("/api/strikes", get(rest::api_strikes))
        .route("/api/translate", post(rest::api_translate))
        .route("/api/stream", get(stream::api_stream))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let addr = format!("{}:{}", config.host, config.port);
    info!(addr, "Flashpoint server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
