use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
/// Every knob has a default: the public feeds need no credentials.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub host: String,
    pub port: u16,

    // News pipeline
    pub feed_cap: usize,
    pub fetch_timeout: Duration,

    // Translation collaborator
    pub translate_url: String,

    // Simulation
    pub tick_interval: Duration,
    pub progress_step: f32,
    pub marker_ttl_ms: i64,
    pub arc_points: usize,
    pub batch_size: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("FLASHPOINT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed_env("FLASHPOINT_PORT", 3000),
            feed_cap: parsed_env("FEED_CAP", 30),
            fetch_timeout: Duration::from_secs(parsed_env("FETCH_TIMEOUT_SECS", 10)),
            translate_url: env::var("TRANSLATE_URL")
                .unwrap_or_else(|_| "https://libretranslate.com/translate".to_string()),
            tick_interval: Duration::from_millis(parsed_env("TICK_INTERVAL_MS", 1000)),
            progress_step: parsed_env("PROGRESS_STEP", 2.0),
            marker_ttl_ms: parsed_env("MARKER_TTL_MS", 30_000),
            arc_points: parsed_env("ARC_POINTS", 64),
            batch_size: parsed_env("BATCH_SIZE", 5),
        }
    }
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid number, got {v:?}")),
        Err(_) => default,
    }
}
