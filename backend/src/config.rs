use anyhow::anyhow;
use chrono_tz::Tz;
use std::env;

pub const DEFAULT_MAX_RANGE_DAYS: i64 = 366;
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Single organizational timezone used for "now" and "today".
    pub time_zone: Tz,
    /// Widest day-record window a caller may request.
    pub max_range_days: i64,
    /// How many employees an organization batch loads at once.
    pub batch_concurrency: usize,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow!("DATABASE_URL must be set"))?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let time_zone_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        let max_range_days = env::var("MAX_RANGE_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|days: &i64| *days > 0)
            .unwrap_or(DEFAULT_MAX_RANGE_DAYS);

        let batch_concurrency = env::var("BATCH_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_BATCH_CONCURRENCY);

        Ok(Config {
            database_url,
            bind_addr,
            time_zone,
            max_range_days,
            batch_concurrency,
        })
    }

    /// Configuration for tests and tools that never reach a real database.
    pub fn for_timezone(time_zone: Tz) -> Self {
        Self {
            database_url: String::new(),
            bind_addr: "127.0.0.1:0".to_string(),
            time_zone,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}
