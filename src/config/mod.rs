/// Application configuration module
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub data_source: DataSourceConfig,
    pub http_timeout: Duration,
    pub timings: Timings,
}

/// Where satellite documents are read from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSourceConfig {
    Assets(PathBuf),
    Http(String),
}

/// Timing knobs of the screen controllers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Quiet period after the last search keystroke before filtering
    pub search_debounce: Duration,
    /// Pause between two replayed positions
    pub position_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(300),
            position_interval: Duration::from_secs(3),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://satellites.db?mode=rwc".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let data_source = match env::var("SATELLITE_DATA_URL") {
            Ok(url) if !url.trim().is_empty() => {
                DataSourceConfig::Http(url.trim_end_matches('/').to_string())
            }
            _ => DataSourceConfig::Assets(
                env::var("ASSETS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("assets")),
            ),
        };

        let defaults = Timings::default();
        let timings = Timings {
            search_debounce: env_millis("SEARCH_DEBOUNCE_MS", defaults.search_debounce),
            position_interval: env_millis("POSITION_INTERVAL_MS", defaults.position_interval),
        };

        Ok(Self {
            database_url,
            bind_addr,
            data_source,
            http_timeout: Duration::from_secs(env_u64("HTTP_TIMEOUT_SECONDS", 30)),
            timings,
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_millis(key: &str, default: Duration) -> Duration {
    Duration::from_millis(env_u64(key, default.as_millis() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let timings = Timings::default();
        assert_eq!(timings.search_debounce, Duration::from_millis(300));
        assert_eq!(timings.position_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_env_u64_falls_back_on_garbage() {
        assert_eq!(env_u64("SATELLITE_TRACKER_SURELY_UNSET", 7), 7);
        assert_eq!(
            env_millis("SATELLITE_TRACKER_SURELY_UNSET", Duration::from_millis(250)),
            Duration::from_millis(250)
        );
    }
}
