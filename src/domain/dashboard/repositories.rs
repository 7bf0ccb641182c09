use super::value_objects::{Mode, Symbol, TimeInterval};
use crate::domain::errors::ApiResult;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_CANDLE_LIMIT: u32 = 500;
pub const DEFAULT_TRADE_LIMIT: u32 = 200;
pub const DEFAULT_SNAPSHOT_LIMIT: u32 = 1000;

/// Body of the start command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub mode: Mode,
    pub symbol: Symbol,
    pub interval: TimeInterval,
    pub from_iso: Option<String>,
    pub to_iso: Option<String>,
    pub initial_balance: f64,
    pub risk_pct: f64,
}

impl StartRequest {
    /// The training window is only sent in `TRAIN` mode; `LIVE` sends `null`
    pub fn new(
        mode: Mode,
        symbol: Symbol,
        interval: TimeInterval,
        window: (&str, &str),
        initial_balance: f64,
        risk_pct: f64,
    ) -> Self {
        let (from_iso, to_iso) = match mode {
            Mode::Train => (Some(window.0.to_string()), Some(window.1.to_string())),
            Mode::Live => (None, None),
        };
        Self { mode, symbol, interval, from_iso, to_iso, initial_balance, risk_pct }
    }
}

/// Remote bot service.
///
/// Reads return the raw JSON body; shaping it is the normalizer's job.
/// Implementations run on a single-threaded executor, so the futures need
/// not be `Send`.
#[allow(async_fn_in_trait)]
pub trait BotApi {
    async fn status(&self) -> ApiResult<Value>;

    async fn candles(&self, symbol: &Symbol, interval: TimeInterval, limit: Option<u32>) -> ApiResult<Value>;

    async fn trades(&self, mode: Mode, symbol: &Symbol, limit: Option<u32>) -> ApiResult<Value>;

    async fn snapshots(&self, mode: Mode, symbol: &Symbol, limit: Option<u32>) -> ApiResult<Value>;

    async fn start(&self, request: &StartRequest) -> ApiResult<()>;

    async fn pause(&self) -> ApiResult<()>;

    async fn reset(&self, mode: Mode, symbol: &Symbol) -> ApiResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_start_omits_training_window() {
        let request = StartRequest::new(
            Mode::Live,
            Symbol::from("BTCUSDT"),
            TimeInterval::OneMinute,
            ("2026-01-01T00:00:00.000Z", "2026-01-02T00:00:00.000Z"),
            10_000.0,
            0.1,
        );
        assert_eq!(request.from_iso, None);
        assert_eq!(request.to_iso, None);
    }
}
