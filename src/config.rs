use crate::domain::dashboard::{Mode, Symbol, TimeInterval};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Runtime settings of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub api_base_url: String,
    #[serde(with = "millis")]
    pub poll_period: Duration,
    pub candle_limit: u32,
    pub trade_limit: u32,
    pub snapshot_limit: u32,
    pub default_mode: Mode,
    pub default_symbol: Symbol,
    pub default_interval: TimeInterval,
    pub training_window_hours: u32,
    pub initial_balance: f64,
    pub risk_pct: f64,
    pub symbols: Vec<Symbol>,
    pub intervals: Vec<TimeInterval>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            poll_period: Duration::from_secs(4),
            candle_limit: 500,
            trade_limit: 300,
            snapshot_limit: 2000,
            default_mode: Mode::Train,
            default_symbol: Symbol::from("BTCUSDT"),
            default_interval: TimeInterval::OneMinute,
            training_window_hours: 24,
            initial_balance: 10_000.0,
            risk_pct: 0.1,
            symbols: vec![Symbol::from("BTCUSDT"), Symbol::from("ETHUSDT")],
            intervals: vec![
                TimeInterval::OneMinute,
                TimeInterval::FiveMinutes,
                TimeInterval::FifteenMinutes,
                TimeInterval::OneHour,
            ],
        }
    }
}

impl DashboardConfig {
    /// Defaults with the API URL baked in at build time via `DASHBOARD_API_URL`
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = option_env!("DASHBOARD_API_URL") {
            config = config.with_api_base_url(url);
        }
        config
    }

    /// Blank overrides are ignored; a trailing slash is dropped
    pub fn with_api_base_url(mut self, url: &str) -> Self {
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() {
            self.api_base_url = url.to_string();
        }
        self
    }

    pub fn training_window(&self) -> Duration {
        Duration::from_secs(u64::from(self.training_window_hours) * 3600)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
