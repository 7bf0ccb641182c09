use super::value_objects::{TimePoint, TradeSide};
use serde_json::Value;

/// Canonical candle: only the close feeds the price chart
#[derive(Debug, Clone, PartialEq)]
pub struct CandleRow {
    pub open_time: TimePoint,
    pub close: f64,
}

/// Canonical executed trade
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRow {
    pub id: Option<String>,
    pub side: TradeSide,
    pub quantity: f64,
    pub price: f64,
    pub fee: f64,
    pub realized_pnl: f64,
    pub executed_at: TimePoint,
}

/// Canonical portfolio snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub taken_at: TimePoint,
    pub total: f64,
    pub cash: f64,
    pub position_value: f64,
}

/// Bot status, kept as the service sent it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BotStatus {
    raw: Value,
}

impl BotStatus {
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// `false` when the flag is missing or not a boolean
    pub fn running(&self) -> bool {
        self.raw.get("running").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Everything one refresh cycle produced, already normalized
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardData {
    pub status: Option<BotStatus>,
    pub candles: Vec<CandleRow>,
    pub trades: Vec<TradeRow>,
    pub snapshots: Vec<SnapshotRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_passes_through_unknown_fields() {
        let status = BotStatus::from_value(json!({
            "running": true,
            "mode": "LIVE",
            "symbol": "ETHUSDT",
            "uptime": 42
        }));
        assert!(status.running());
        assert_eq!(status.raw()["mode"], "LIVE");
        assert_eq!(status.raw()["uptime"], 42);
    }

    #[test]
    fn status_without_flag_is_not_running() {
        assert!(!BotStatus::from_value(json!({ "running": "yes" })).running());
        assert!(!BotStatus::from_value(Value::Null).running());
        assert!(BotStatus::from_value(Value::Null).raw().is_null());
    }
}
