//! Tolerant conversion of raw service records into canonical rows.
//!
//! The bot service is inconsistent about field names across payload
//! variants. Every logical field is therefore described by a [`FieldLookup`]:
//! an ordered list of accessors tried in priority order, first present value
//! wins. Nothing in here fails; missing or malformed data degrades to `0`
//! for numbers and to a positional [`TimePoint`] for time.

use super::entities::{BotStatus, CandleRow, DashboardData, SnapshotRow, TradeRow};
use super::value_objects::{TimePoint, TradeSide};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

/// Reads one candidate field out of a record
pub type Accessor = for<'r> fn(&'r Value) -> Option<&'r Value>;

/// Ordered candidates for one logical field
pub struct FieldLookup {
    candidates: &'static [Accessor],
}

impl FieldLookup {
    pub const fn new(candidates: &'static [Accessor]) -> Self {
        Self { candidates }
    }

    /// First present candidate, in priority order
    pub fn resolve<'r>(&self, record: &'r Value) -> Option<&'r Value> {
        self.candidates.iter().find_map(|get| get(record))
    }

    pub fn number(&self, record: &Value) -> f64 {
        coerce_number(self.resolve(record))
    }

    pub fn time(&self, record: &Value, index: usize) -> TimePoint {
        self.resolve(record)
            .and_then(parse_timestamp)
            .map_or(TimePoint::Positional(index), TimePoint::Resolved)
    }
}

pub static CANDLE_OPEN_TIME: FieldLookup = FieldLookup::new(&[field_accessor!("openTime")]);
pub static CANDLE_CLOSE: FieldLookup = FieldLookup::new(&[field_accessor!("close")]);

pub static TRADE_TIME: FieldLookup = FieldLookup::new(&[
    field_accessor!("executedAt"),
    field_accessor!("purchased_at"),
    field_accessor!("ts"),
]);
pub static TRADE_ID: FieldLookup = FieldLookup::new(&[field_accessor!("id")]);
pub static TRADE_SIDE: FieldLookup = FieldLookup::new(&[field_accessor!("side")]);
pub static TRADE_QUANTITY: FieldLookup = FieldLookup::new(&[field_accessor!("quantity")]);
pub static TRADE_PRICE: FieldLookup = FieldLookup::new(&[field_accessor!("price")]);
pub static TRADE_FEE: FieldLookup = FieldLookup::new(&[field_accessor!("fee")]);
pub static TRADE_REALIZED_PNL: FieldLookup = FieldLookup::new(&[field_accessor!("realizedPnl")]);

pub static SNAPSHOT_TIME: FieldLookup = FieldLookup::new(&[
    field_accessor!("ts"),
    field_accessor!("snapshotTime"),
    field_accessor!("snapshot_time"),
    field_accessor!("time"),
    field_accessor!("createdAt"),
    field_accessor!("created_at"),
    field_accessor!("executedAt"),
    field_accessor!("purchased_at"),
]);
pub static SNAPSHOT_TOTAL: FieldLookup =
    FieldLookup::new(&[field_accessor!("totalValue"), field_accessor!("total")]);
pub static SNAPSHOT_CASH: FieldLookup =
    FieldLookup::new(&[field_accessor!("cashBalance"), field_accessor!("cash")]);
pub static SNAPSHOT_POSITION: FieldLookup =
    FieldLookup::new(&[field_accessor!("positionValue"), field_accessor!("pos")]);

/// Numeric coercion: numbers as-is, decimal strings parsed, booleans as 1/0.
/// Anything else, and any non-finite result, is `0`.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        _ => 0.0,
    };
    if number.is_finite() { number } else { 0.0 }
}

/// Epoch milliseconds for a timestamp-like value.
///
/// Numbers are taken as epoch milliseconds. Strings go through
/// [`parse_datetime`]. Empty strings, zero and every other JSON type are
/// unusable.
pub fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|ms| ms.is_finite()).map(|ms| ms as i64))
            .filter(|ms| *ms != 0),
        Value::String(s) => parse_datetime(s.trim()),
        _ => None,
    }
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// RFC 3339 with offset, an offset-less ISO date-time read as local time,
/// or a bare date read as UTC midnight
pub fn parse_datetime(text: &str) -> Option<i64> {
    parse_datetime_in(&Local, text)
}

pub(crate) fn parse_datetime_in<Tz: TimeZone>(tz: &Tz, text: &str) -> Option<i64> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            // A skipped wall-clock time (DST gap) has no instant
            return tz.from_local_datetime(&naive).earliest().map(|dt| dt.timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Payloads that are not JSON arrays count as empty
pub fn records(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

pub fn normalize_candle(index: usize, record: &Value) -> CandleRow {
    CandleRow {
        open_time: CANDLE_OPEN_TIME.time(record, index),
        close: CANDLE_CLOSE.number(record),
    }
}

pub fn normalize_trade(index: usize, record: &Value) -> TradeRow {
    TradeRow {
        id: TRADE_ID.resolve(record).map(|id| match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        side: TRADE_SIDE
            .resolve(record)
            .and_then(Value::as_str)
            .map_or_else(|| TradeSide::Unknown(String::new()), TradeSide::parse),
        quantity: TRADE_QUANTITY.number(record),
        price: TRADE_PRICE.number(record),
        fee: TRADE_FEE.number(record),
        realized_pnl: TRADE_REALIZED_PNL.number(record),
        executed_at: TRADE_TIME.time(record, index),
    }
}

pub fn normalize_snapshot(index: usize, record: &Value) -> SnapshotRow {
    SnapshotRow {
        taken_at: SNAPSHOT_TIME.time(record, index),
        total: SNAPSHOT_TOTAL.number(record),
        cash: SNAPSHOT_CASH.number(record),
        position_value: SNAPSHOT_POSITION.number(record),
    }
}

pub fn normalize_candles(records: &[Value]) -> Vec<CandleRow> {
    records.iter().enumerate().map(|(i, r)| normalize_candle(i, r)).collect()
}

pub fn normalize_trades(records: &[Value]) -> Vec<TradeRow> {
    records.iter().enumerate().map(|(i, r)| normalize_trade(i, r)).collect()
}

pub fn normalize_snapshots(records: &[Value]) -> Vec<SnapshotRow> {
    records.iter().enumerate().map(|(i, r)| normalize_snapshot(i, r)).collect()
}

/// Normalize the four payloads of one refresh cycle
pub fn normalize_cycle(status: Value, candles: Value, trades: Value, snapshots: Value) -> DashboardData {
    DashboardData {
        status: Some(BotStatus::from_value(status)),
        candles: normalize_candles(&records(candles)),
        trades: normalize_trades(&records(trades)),
        snapshots: normalize_snapshots(&records(snapshots)),
    }
}
