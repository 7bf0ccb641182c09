mod common;

use bot_dashboard_wasm::application::CycleOutcome;
use bot_dashboard_wasm::domain::dashboard::{Symbol, TimePoint, TradeSide};
use bot_dashboard_wasm::domain::errors::ApiError;
use common::{Harness, snapshot};
use futures::task::LocalSpawnExt;
use serde_json::json;

fn trade(id: &str, price: f64) -> serde_json::Value {
    json!({
        "id": id,
        "side": "BUY",
        "quantity": "0.5",
        "price": price,
        "fee": 0.01,
        "realizedPnl": null,
        "executedAt": "2024-01-01T00:00:00Z"
    })
}

#[test]
fn successful_cycle_replaces_all_collections() {
    let mut h = Harness::new();
    h.api.set_status(json!({ "running": true, "mode": "TRAIN" }));
    h.api.set_candles(json!([{ "openTime": 1_704_067_200_000_i64, "close": "42000.5" }]));
    h.api.set_trades(json!([trade("t-1", 42_000.0)]));
    h.api.set_snapshots(json!([
        snapshot("2024-01-01T00:01:00Z", 10_100.0),
        snapshot("2024-01-01T00:00:00Z", 10_000.0),
    ]));

    let controller = h.controller.clone();
    assert_eq!(h.block_on(controller.refresh()), CycleOutcome::Applied);

    let state = h.controller.state();
    assert!(state.data.status.as_ref().is_some_and(|s| s.running()));
    assert_eq!(state.data.candles[0].close, 42_000.5);
    assert_eq!(state.data.trades[0].side, TradeSide::Buy);
    assert_eq!(state.data.trades[0].quantity, 0.5);
    assert_eq!(state.data.trades[0].realized_pnl, 0.0);
    assert_eq!(state.error, None);

    let view = state.view();
    let totals: Vec<f64> = view.equity.iter().map(|p| p.total).collect();
    assert_eq!(totals, vec![10_000.0, 10_100.0]);
    assert_eq!(view.summary().map(|s| s.total), Some("10100.00".to_string()));
}

#[test]
fn failed_read_leaves_data_untouched_and_sets_error() {
    let mut h = Harness::new();
    h.api.set_trades(json!([trade("t-1", 100.0)]));
    h.api.set_snapshots(json!([snapshot("2024-01-01T00:00:00Z", 10_000.0)]));
    let controller = h.controller.clone();
    h.block_on(controller.refresh());
    let before = h.controller.state().data;

    h.api.set_trades(json!([trade("t-1", 100.0), trade("t-2", 101.0)]));
    h.api.set_snapshots(json!([]));
    h.api.fail("trades", ApiError::status("trades", 500));
    let outcome = h.block_on(controller.refresh());

    assert_eq!(outcome, CycleOutcome::Failed(ApiError::status("trades", 500)));
    let state = h.controller.state();
    assert_eq!(state.data, before);
    assert_eq!(state.data.trades.len(), 1);
    assert_eq!(state.data.snapshots.len(), 1);
    assert_eq!(state.error.as_deref(), Some("trades failed"));
}

#[test]
fn next_successful_cycle_clears_the_error() {
    let mut h = Harness::new();
    h.api.fail("status", ApiError::Transport("Failed to fetch".to_string()));
    let controller = h.controller.clone();
    h.block_on(controller.refresh());
    assert_eq!(h.controller.state().error.as_deref(), Some("Failed to fetch"));

    h.api.recover("status");
    assert_eq!(h.block_on(controller.refresh()), CycleOutcome::Applied);
    assert_eq!(h.controller.state().error, None);
}

#[test]
fn slower_older_cycle_cannot_overwrite_newer_data() {
    let mut h = Harness::new();
    let gate = h.api.gate("candles");
    h.api.set_snapshots(json!([snapshot("2024-01-01T00:00:00Z", 1.0)]));

    let slow = {
        let controller = h.controller.clone();
        h.pool
            .spawner()
            .spawn_local_with_handle(async move { controller.refresh().await })
            .expect("spawn slow cycle")
    };
    h.settle();

    h.api.set_snapshots(json!([snapshot("2024-01-01T00:00:00Z", 2.0)]));
    let controller = h.controller.clone();
    assert_eq!(h.block_on(controller.refresh()), CycleOutcome::Applied);

    gate.send(()).expect("slow cycle waiting");
    assert_eq!(h.block_on(slow), CycleOutcome::Discarded);
    assert_eq!(h.controller.state().data.snapshots[0].total, 2.0);
}

#[test]
fn failure_of_a_superseded_cycle_is_ignored() {
    let mut h = Harness::new();
    h.controller.mount();
    h.settle();
    let gate = h.api.gate("trades");
    let stale = {
        let controller = h.controller.clone();
        h.pool
            .spawner()
            .spawn_local_with_handle(async move { controller.refresh().await })
            .expect("spawn stale cycle")
    };
    h.settle();

    h.controller.set_symbol(Symbol::from("ETHUSDT"));
    h.settle();
    h.api.fail("trades", ApiError::status("trades", 502));
    gate.send(()).expect("stale cycle waiting");

    assert_eq!(h.block_on(stale), CycleOutcome::Discarded);
    assert_eq!(h.controller.state().error, None);
}

#[test]
fn non_array_payloads_count_as_empty() {
    let mut h = Harness::new();
    h.api.set_candles(json!({ "error": "maintenance" }));
    h.api.set_trades(json!(null));
    h.api.set_snapshots(json!([{ "total": 5 }, { "total": 7 }]));
    let controller = h.controller.clone();
    assert_eq!(h.block_on(controller.refresh()), CycleOutcome::Applied);

    let data = h.controller.state().data;
    assert!(data.candles.is_empty());
    assert!(data.trades.is_empty());
    assert_eq!(data.snapshots[1].taken_at, TimePoint::Positional(1));
}

#[test]
fn listener_sees_every_transition() {
    let mut h = Harness::new();
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    {
        let seen = seen.clone();
        h.controller.subscribe(move |state| seen.borrow_mut().push(state.error.clone()));
    }
    h.api.fail("candles", ApiError::status("candles", 500));
    let controller = h.controller.clone();
    h.block_on(controller.refresh());
    h.api.recover("candles");
    h.block_on(controller.refresh());

    assert_eq!(
        *seen.borrow(),
        vec![Some("candles failed".to_string()), None, None]
    );
}
