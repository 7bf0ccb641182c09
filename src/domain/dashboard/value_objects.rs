use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

/// Operating context of the bot
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Backtest over a historical window
    #[default]
    Train,
    /// Real-time trading
    Live,
}

impl Mode {
    pub fn as_query(&self) -> &str {
        self.as_ref()
    }
}

/// Trading pair, always upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: String) -> Result<Self, String> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

/// Candle interval understood by the bot service
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
pub enum TimeInterval {
    #[default]
    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    OneMinute,

    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    FiveMinutes,

    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    FifteenMinutes,

    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,
}

impl TimeInterval {
    pub fn as_query(&self) -> &str {
        self.as_ref()
    }
}

/// Direction of an executed trade.
///
/// The backend is inconsistent about casing (`BUY` vs `Buy`), and anything
/// unrecognised is kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TradeSide {
    Buy,
    Sell,
    Unknown(String),
}

impl TradeSide {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUY" => Self::Buy,
            "SELL" => Self::Sell,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of a row on a time axis.
///
/// Rows whose timestamp cannot be resolved fall back to their index in the
/// batch they arrived in, so they stay plottable and ordered relative to
/// siblings of the same refresh. Positional values are not comparable across
/// refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimePoint {
    /// Epoch milliseconds
    Resolved(i64),
    /// Ordinal within the source batch
    Positional(usize),
}

impl TimePoint {
    pub fn axis_value(&self) -> f64 {
        match *self {
            Self::Resolved(ms) => ms as f64,
            Self::Positional(index) => index as f64,
        }
    }

    pub fn millis(&self) -> Option<i64> {
        match *self {
            Self::Resolved(ms) => Some(ms),
            Self::Positional(_) => None,
        }
    }
}
