//! Mapping of chart series onto SVG viewport coordinates.

use crate::domain::dashboard::{AxisRange, EquityPoint, PricePoint, TradeMarker, TradeSide};

/// Drawing area of a chart, in SVG user units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800.0, height: 260.0, margin: 24.0 }
    }
}

impl Viewport {
    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.margin).max(0.0)
    }

    fn inner_height(&self) -> f64 {
        (self.height - 2.0 * self.margin).max(0.0)
    }

    /// x for slot `index` of `count` evenly spaced slots
    pub fn slot_x(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.margin + self.inner_width() / 2.0;
        }
        self.margin + self.inner_width() * index as f64 / (count - 1) as f64
    }

    /// x for `t` within `[t_min, t_max]`
    pub fn time_x(&self, t: f64, t_min: f64, t_max: f64) -> f64 {
        let span = t_max - t_min;
        if span <= 0.0 {
            return self.margin + self.inner_width() / 2.0;
        }
        self.margin + self.inner_width() * (t - t_min) / span
    }

    /// y for `value` on `axis`; larger values sit higher
    pub fn value_y(&self, value: f64, axis: &AxisRange) -> f64 {
        let span = axis.span();
        if span <= 0.0 {
            return self.margin + self.inner_height() / 2.0;
        }
        self.margin + self.inner_height() * (axis.max - value) / span
    }
}

/// `points` attribute of an SVG polyline
pub fn polyline(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Equity series as (x, y) pairs, selecting one value per point
pub fn equity_points(
    curve: &[EquityPoint],
    axis: &AxisRange,
    viewport: &Viewport,
    value: impl Fn(&EquityPoint) -> f64,
) -> Vec<(f64, f64)> {
    let (Some(first), Some(last)) = (curve.first(), curve.last()) else {
        return Vec::new();
    };
    curve
        .iter()
        .map(|p| (viewport.time_x(p.t, first.t, last.t), viewport.value_y(value(p), axis)))
        .collect()
}

/// Price series laid out on evenly spaced slots
pub fn price_points(prices: &[PricePoint], axis: &AxisRange, viewport: &Viewport) -> Vec<(f64, f64)> {
    prices
        .iter()
        .enumerate()
        .map(|(i, p)| (viewport.slot_x(i, prices.len()), viewport.value_y(p.close, axis)))
        .collect()
}

/// Marker dot placed over the price chart
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDot {
    pub x: f64,
    pub y: f64,
    pub side: TradeSide,
    pub title: String,
}

impl MarkerDot {
    pub fn color(&self) -> &'static str {
        match self.side {
            TradeSide::Buy => "#2ecc71",
            TradeSide::Sell => "#e74c3c",
            TradeSide::Unknown(_) => "#95a5a6",
        }
    }
}

/// Trade markers anchored to the price slot with the same display time.
///
/// Markers without a matching candle, or outside the axis, are not drawn.
pub fn marker_dots(
    markers: &[TradeMarker],
    prices: &[PricePoint],
    axis: &AxisRange,
    viewport: &Viewport,
) -> Vec<MarkerDot> {
    markers
        .iter()
        .filter(|m| !m.display_time.is_empty() && axis.contains(m.price))
        .filter_map(|m| {
            let slot = prices.iter().position(|p| p.display_time == m.display_time)?;
            Some(MarkerDot {
                x: viewport.slot_x(slot, prices.len()),
                y: viewport.value_y(m.price, axis),
                side: m.side.clone(),
                title: format!("{} {:.2} @ {}", m.side, m.price, m.display_time),
            })
        })
        .collect()
}
