//! Process configuration, read from the environment once at startup.

use std::time::Duration;

use chrono::Duration as ChronoDuration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
    /// How long a reservation lives before becoming expirable.
    pub reservation_ttl: ChronoDuration,
    /// How often the sweeper scans for expired holds.
    pub sweep_interval: Duration,
    /// Whether to load the demo catalog at startup.
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            reservation_ttl: ChronoDuration::minutes(5),
            sweep_interval: Duration::from_secs(60),
            seed_demo_data: false,
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults
    /// (with a warning) on missing or malformed values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            reservation_ttl: ChronoDuration::minutes(env_i64(
                "RESERVATION_TTL_MINUTES",
                defaults.reservation_ttl.num_minutes(),
            )),
            sweep_interval: Duration::from_secs(
                env_i64("SWEEP_INTERVAL_SECS", defaults.sweep_interval.as_secs() as i64) as u64,
            ),
            seed_demo_data: std::env::var("SEED_DEMO_DATA")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.seed_demo_data),
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    match std::env::var(key) {
        Ok(raw) => match raw.parse::<i64>() {
            Ok(v) if v > 0 => v,
            _ => {
                tracing::warn!(key, value = %raw, default, "invalid env value; using default");
                default
            }
        },
        Err(_) => default,
    }
}
