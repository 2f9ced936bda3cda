//! Process configuration, loaded once from the environment (spec.md S6, S9).
//!
//! Recognized keys: `SERVER_PORT`, `SIMULATION_ENABLED`, `HEALTH_ENABLED`,
//! `METRICS_ENABLED`, `METRICS_WINDOW_SECS`, `EXCHANGE_SYMBOLS`. Everything
//! else falls back to a documented default. The resulting `AppConfig` is
//! immutable for the process lifetime, per spec.md S9's config strategy.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub simulation_enabled: bool,
    pub health_enabled: bool,
    pub metrics_enabled: bool,
    pub metrics_window: Duration,
    pub symbols: Vec<String>,
}

impl AppConfig {
    /// Load configuration from the environment, applying defaults for any
    /// unset key. Reads a `.env` file first if present (teacher's
    /// `dotenvy::dotenv().ok()` pattern), then falls back to process env.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server_port: env_parsed("SERVER_PORT", 8080),
            simulation_enabled: env_bool("SIMULATION_ENABLED", true),
            health_enabled: env_bool("HEALTH_ENABLED", true),
            metrics_enabled: env_bool("METRICS_ENABLED", true),
            metrics_window: Duration::from_secs(env_parsed("METRICS_WINDOW_SECS", 60)),
            symbols: env_symbols("EXCHANGE_SYMBOLS", &["AAPL", "MSFT", "GOOG"]),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"),
        Err(_) => default,
    }
}

fn env_symbols(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.split(',').map(|s| s.trim().to_uppercase()).collect(),
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}
