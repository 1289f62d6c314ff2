use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Runtime configuration, read from the environment once at startup and
/// passed into every component explicitly.
#[derive(Clone)]
pub struct Config {
    /// How often the scheduler wakes up to look for due subscribers.
    pub poll_interval: Duration,
    pub db_url: String,
    pub db_path: String,
    pub logs_path: PathBuf,
    /// Base URL of the JSearch provider. Overridable for tests.
    pub provider_url: String,
    pub rapidapi_key: String,
    /// Timeout applied to every outbound HTTP request.
    pub request_timeout: Duration,
    /// Hard cap on concurrently subscribed users.
    pub max_subscribers: i64,
    pub default_lookback_days: i64,
    pub min_lookback_days: i64,
    /// Minimum interval between two deliveries to the same subscriber.
    pub default_cadence: Duration,
    /// Maximum number of postings per delivery.
    pub result_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3600),
            db_url: "sqlite://data.db".to_string(),
            db_path: "data.db".to_string(),
            logs_path: PathBuf::from("logs"),
            provider_url: "https://jsearch.p.rapidapi.com".to_string(),
            rapidapi_key: String::new(),
            request_timeout: Duration::from_secs(15),
            max_subscribers: 18,
            default_lookback_days: 4,
            min_lookback_days: 1,
            default_cadence: Duration::from_secs(4 * 24 * 60 * 60),
            result_cap: 20,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let mut config = Self::default();

        config.poll_interval = read_secs("POLL_INTERVAL", config.poll_interval)?;
        config.request_timeout = read_secs("REQUEST_TIMEOUT", config.request_timeout)?;
        config.default_cadence = read_secs("DELIVERY_CADENCE", config.default_cadence)?;

        if let Ok(v) = std::env::var("DB_URL") {
            config.db_url = v;
        }
        if let Ok(v) = std::env::var("DB_PATH") {
            config.db_path = v;
        }
        if let Ok(v) = std::env::var("LOGS_PATH") {
            config.logs_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("PROVIDER_URL") {
            config.provider_url = v;
        }
        if let Ok(v) = std::env::var("MAX_SUBSCRIBERS") {
            config.max_subscribers = parse_key("MAX_SUBSCRIBERS", &v)?;
        }
        if let Ok(v) = std::env::var("DEFAULT_LOOKBACK_DAYS") {
            config.default_lookback_days = parse_key("DEFAULT_LOOKBACK_DAYS", &v)?;
        }
        if let Ok(v) = std::env::var("RESULT_CAP") {
            config.result_cap = parse_key("RESULT_CAP", &v)?;
        }

        config.rapidapi_key =
            std::env::var("RAPIDAPI_KEY").map_err(|_| AppError::MissingConfig {
                key: "RAPIDAPI_KEY".to_string(),
            })?;

        Ok(config)
    }
}

fn read_secs(key: &str, default: Duration) -> Result<Duration, AppError> {
    match std::env::var(key) {
        Ok(v) => Ok(Duration::from_secs(parse_key(key, &v)?)),
        Err(_) => Ok(default),
    }
}

fn parse_key<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| AppError::InvalidConfig {
        key: key.to_string(),
        msg: e.to_string(),
    })
}
