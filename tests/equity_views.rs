use bot_dashboard_wasm::domain::dashboard::normalizer::normalize_cycle;
use bot_dashboard_wasm::domain::dashboard::{
    AxisRange, DashboardView, SnapshotRow, TimePoint, equity_curve,
};
use quickcheck_macros::quickcheck;
use serde_json::json;

fn rows(points: &[(u32, i16)]) -> Vec<SnapshotRow> {
    points
        .iter()
        .map(|&(ms, total)| SnapshotRow {
            taken_at: TimePoint::Resolved(i64::from(ms)),
            total: f64::from(total),
            cash: 0.0,
            position_value: 0.0,
        })
        .collect()
}

#[quickcheck]
fn equity_curve_is_chronological(points: Vec<(u32, i16)>) -> bool {
    let curve = equity_curve(&rows(&points));
    curve.len() == points.len() && curve.windows(2).all(|w| w[0].t <= w[1].t)
}

#[quickcheck]
fn equal_times_keep_arrival_order(totals: Vec<i16>) -> bool {
    let points: Vec<(u32, i16)> = totals.iter().map(|&t| (42, t)).collect();
    let curve = equity_curve(&rows(&points));
    curve.iter().map(|p| p.total).eq(totals.iter().map(|&t| f64::from(t)))
}

#[quickcheck]
fn axis_range_covers_padded_data(values: Vec<i16>) -> bool {
    let Some(axis) = AxisRange::for_values(values.iter().map(|&v| f64::from(v))) else {
        return values.is_empty();
    };
    let min = values.iter().copied().min().map(f64::from).unwrap_or_default();
    let max = values.iter().copied().max().map(f64::from).unwrap_or_default();
    axis.min <= min - 200.0
        && axis.max >= max + 200.0
        && axis.min % 100.0 == 0.0
        && axis.max % 100.0 == 0.0
        && axis.span() < max - min + 600.0
}

#[test]
fn derived_view_from_raw_payloads() {
    let data = normalize_cycle(
        json!({ "running": true }),
        json!([
            { "openTime": "2024-01-01T00:00:00Z", "close": 250 },
            { "openTime": "2024-01-01T00:01:00Z", "close": 340 }
        ]),
        json!([{ "side": "BUY", "price": 300, "quantity": 1, "executedAt": "2024-01-01T00:01:00Z" }]),
        json!("not an array"),
    );
    let view = DashboardView::derive(&data);

    assert_eq!(view.price_axis, Some(AxisRange { min: 0.0, max: 600.0 }));
    assert_eq!(view.equity_axis, None);
    assert!(view.summary().is_none());
    assert_eq!(view.markers[0].display_time, view.prices[1].display_time);
    assert_eq!(view.history[0].quantity, "1.000000");
    assert_eq!(view.history[0].price, "300.00");
}
