//! Chart- and table-ready projections of canonical rows.

use super::entities::{CandleRow, DashboardData, SnapshotRow, TradeRow};
use super::value_objects::TradeSide;
use crate::time_utils::display_time;
use std::collections::HashSet;

/// Padding added on both sides of the data before rounding
pub const AXIS_PADDING: f64 = 200.0;
/// Axis bounds land on multiples of this step
pub const AXIS_STEP: f64 = 100.0;

/// One point of the portfolio chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityPoint {
    pub t: f64,
    pub total: f64,
    pub cash: f64,
    pub pos: f64,
}

/// Trade overlay for the price chart
#[derive(Debug, Clone, PartialEq)]
pub struct TradeMarker {
    pub display_time: String,
    pub price: f64,
    pub side: TradeSide,
}

/// One point of the price chart
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub display_time: String,
    pub close: f64,
}

/// Pre-formatted trade history line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeHistoryRow {
    pub key: String,
    pub date: String,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub fee: String,
    pub realized_pnl: String,
}

/// Headline figures taken from the newest equity point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFigures {
    pub total: String,
    pub cash: String,
    pub position_value: String,
}

impl From<&EquityPoint> for SummaryFigures {
    fn from(point: &EquityPoint) -> Self {
        Self {
            total: format!("{:.2}", point.total),
            cash: format!("{:.2}", point.cash),
            position_value: format!("{:.2}", point.pos),
        }
    }
}

/// Y-axis display range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Pad the observed bounds and round outwards to the axis step
    pub fn padded(data_min: f64, data_max: f64) -> Self {
        Self {
            min: ((data_min - AXIS_PADDING) / AXIS_STEP).floor() * AXIS_STEP,
            max: ((data_max + AXIS_PADDING) / AXIS_STEP).ceil() * AXIS_STEP,
        }
    }

    /// Padded range over a series, `None` when the series is empty
    pub fn for_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min, max) = values.into_iter().fold(None, |bounds, v| match bounds {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })?;
        Some(Self::padded(min, max))
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Snapshots as a chronologically ordered series.
///
/// Stable sort: snapshots sharing a timestamp keep their arrival order.
pub fn equity_curve(snapshots: &[SnapshotRow]) -> Vec<EquityPoint> {
    let mut curve: Vec<EquityPoint> = snapshots
        .iter()
        .map(|s| EquityPoint {
            t: s.taken_at.axis_value(),
            total: s.total,
            cash: s.cash,
            pos: s.position_value,
        })
        .collect();
    curve.sort_by(|a, b| a.t.total_cmp(&b.t));
    curve
}

pub fn trade_markers(trades: &[TradeRow]) -> Vec<TradeMarker> {
    trades
        .iter()
        .map(|t| TradeMarker {
            display_time: display_time(t.executed_at),
            price: t.price,
            side: t.side.clone(),
        })
        .collect()
}

pub fn price_series(candles: &[CandleRow]) -> Vec<PricePoint> {
    candles
        .iter()
        .map(|c| PricePoint { display_time: display_time(c.open_time), close: c.close })
        .collect()
}

/// History rows keyed by trade id, or by `side-date-price` without one.
/// Repeated keys get a `#n` suffix so every row key is unique.
pub fn trade_history(trades: &[TradeRow]) -> Vec<TradeHistoryRow> {
    let mut used = HashSet::with_capacity(trades.len());
    trades
        .iter()
        .map(|t| {
            let date = display_time(t.executed_at);
            let price = format!("{:.2}", t.price);
            let base = t.id.clone().unwrap_or_else(|| format!("{}-{}-{}", t.side, date, t.price));
            TradeHistoryRow {
                key: unique_key(base, &mut used),
                date,
                side: t.side.to_string(),
                quantity: format!("{:.6}", t.quantity),
                price,
                fee: format!("{:.4}", t.fee),
                realized_pnl: format!("{:.2}", t.realized_pnl),
            }
        })
        .collect()
}

fn unique_key(base: String, used: &mut HashSet<String>) -> String {
    let mut key = base.clone();
    let mut n = 1;
    while !used.insert(key.clone()) {
        n += 1;
        key = format!("{base}#{n}");
    }
    key
}

/// Newest point of an already sorted curve
pub fn latest_summary(curve: &[EquityPoint]) -> Option<EquityPoint> {
    curve.last().copied()
}

/// All projections the dashboard renders, derived in one pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardView {
    pub equity: Vec<EquityPoint>,
    pub equity_axis: Option<AxisRange>,
    pub markers: Vec<TradeMarker>,
    pub prices: Vec<PricePoint>,
    pub price_axis: Option<AxisRange>,
    pub history: Vec<TradeHistoryRow>,
    pub latest: Option<EquityPoint>,
}

impl DashboardView {
    pub fn derive(data: &DashboardData) -> Self {
        let equity = equity_curve(&data.snapshots);
        let prices = price_series(&data.candles);
        Self {
            // cash and position share the total's axis on the chart
            equity_axis: AxisRange::for_values(
                equity.iter().flat_map(|p| [p.total, p.cash, p.pos]),
            ),
            price_axis: AxisRange::for_values(prices.iter().map(|p| p.close)),
            latest: latest_summary(&equity),
            markers: trade_markers(&data.trades),
            history: trade_history(&data.trades),
            equity,
            prices,
        }
    }

    pub fn summary(&self) -> Option<SummaryFigures> {
        self.latest.as_ref().map(SummaryFigures::from)
    }
}
