#![allow(dead_code)]

use bot_dashboard_wasm::application::{Cadence, DashboardController, Runtime};
use bot_dashboard_wasm::config::DashboardConfig;
use bot_dashboard_wasm::domain::dashboard::{BotApi, Mode, StartRequest, Symbol, TimeInterval};
use bot_dashboard_wasm::domain::errors::{ApiError, ApiResult};
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

/// 2024-01-01T00:00:00Z
pub const NOW_MS: i64 = 1_704_067_200_000;

#[derive(Default)]
struct Backend {
    status: Value,
    candles: Value,
    trades: Value,
    snapshots: Value,
    failing: HashMap<&'static str, ApiError>,
    gates: HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>,
    calls: Vec<String>,
    starts: Vec<StartRequest>,
}

/// Scripted bot service. Clones share the same backend.
#[derive(Clone, Default)]
pub struct FakeApi {
    backend: Rc<RefCell<Backend>>,
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.set_status(json!({ "running": false, "mode": "TRAIN", "symbol": "BTCUSDT" }));
        api.set_candles(json!([]));
        api.set_trades(json!([]));
        api.set_snapshots(json!([]));
        api
    }

    pub fn set_status(&self, value: Value) {
        self.backend.borrow_mut().status = value;
    }

    pub fn set_candles(&self, value: Value) {
        self.backend.borrow_mut().candles = value;
    }

    pub fn set_trades(&self, value: Value) {
        self.backend.borrow_mut().trades = value;
    }

    pub fn set_snapshots(&self, value: Value) {
        self.backend.borrow_mut().snapshots = value;
    }

    /// Make `operation` fail until [`FakeApi::recover`] is called
    pub fn fail(&self, operation: &'static str, error: ApiError) {
        self.backend.borrow_mut().failing.insert(operation, error);
    }

    pub fn recover(&self, operation: &'static str) {
        self.backend.borrow_mut().failing.remove(operation);
    }

    /// Hold the next call of `operation` until the returned sender fires
    pub fn gate(&self, operation: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.backend.borrow_mut().gates.entry(operation).or_default().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.backend.borrow().calls.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.backend.borrow().calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn starts(&self) -> Vec<StartRequest> {
        self.backend.borrow().starts.clone()
    }

    async fn respond(&self, operation: &'static str, call: String) -> ApiResult<Value> {
        let gate = {
            let mut backend = self.backend.borrow_mut();
            backend.calls.push(call);
            backend.gates.get_mut(operation).and_then(VecDeque::pop_front)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let backend = self.backend.borrow();
        if let Some(error) = backend.failing.get(operation) {
            return Err(error.clone());
        }
        Ok(match operation {
            "status" => backend.status.clone(),
            "candles" => backend.candles.clone(),
            "trades" => backend.trades.clone(),
            "snapshots" => backend.snapshots.clone(),
            _ => Value::Null,
        })
    }
}

impl BotApi for FakeApi {
    async fn status(&self) -> ApiResult<Value> {
        self.respond("status", "status".to_string()).await
    }

    async fn candles(&self, symbol: &Symbol, interval: TimeInterval, limit: Option<u32>) -> ApiResult<Value> {
        self.respond("candles", format!("candles {symbol} {interval} {limit:?}")).await
    }

    async fn trades(&self, mode: Mode, symbol: &Symbol, limit: Option<u32>) -> ApiResult<Value> {
        self.respond("trades", format!("trades {mode} {symbol} {limit:?}")).await
    }

    async fn snapshots(&self, mode: Mode, symbol: &Symbol, limit: Option<u32>) -> ApiResult<Value> {
        self.respond("snapshots", format!("snapshots {mode} {symbol} {limit:?}")).await
    }

    async fn start(&self, request: &StartRequest) -> ApiResult<()> {
        self.backend.borrow_mut().starts.push(request.clone());
        self.respond("start", "start".to_string()).await.map(|_| ())
    }

    async fn pause(&self) -> ApiResult<()> {
        self.respond("pause", "pause".to_string()).await.map(|_| ())
    }

    async fn reset(&self, mode: Mode, symbol: &Symbol) -> ApiResult<()> {
        self.respond("reset", format!("reset {mode} {symbol}")).await.map(|_| ())
    }
}

#[derive(Default)]
struct Timers {
    next_id: Cell<u64>,
    active: RefCell<Vec<(u64, Duration)>>,
    ticks: RefCell<HashMap<u64, Box<dyn FnMut()>>>,
    events: RefCell<Vec<String>>,
}

/// Deterministic runtime: tasks run on a `LocalPool`, timers only fire when
/// a test calls [`FakeRuntime::tick`]
#[derive(Clone)]
pub struct FakeRuntime {
    spawner: LocalSpawner,
    timers: Rc<Timers>,
}

pub struct FakeCadence {
    id: u64,
    timers: Rc<Timers>,
}

impl Cadence for FakeCadence {
    fn cancel(self) {
        self.timers.active.borrow_mut().retain(|(id, _)| *id != self.id);
        self.timers.ticks.borrow_mut().remove(&self.id);
        self.timers.events.borrow_mut().push(format!("cancel#{}", self.id));
    }
}

impl FakeRuntime {
    pub fn new(spawner: LocalSpawner) -> Self {
        Self { spawner, timers: Rc::new(Timers::default()) }
    }

    pub fn active(&self) -> Vec<Duration> {
        self.timers.active.borrow().iter().map(|(_, period)| *period).collect()
    }

    pub fn events(&self) -> Vec<String> {
        self.timers.events.borrow().clone()
    }

    /// Fire every armed timer once
    pub fn tick(&self) {
        let ids: Vec<u64> = self.timers.active.borrow().iter().map(|(id, _)| *id).collect();
        for id in ids {
            let tick = self.timers.ticks.borrow_mut().remove(&id);
            if let Some(mut tick) = tick {
                tick();
                if self.timers.active.borrow().iter().any(|(active, _)| *active == id) {
                    self.timers.ticks.borrow_mut().insert(id, tick);
                }
            }
        }
    }
}

impl Runtime for FakeRuntime {
    type Cadence = FakeCadence;

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).expect("local pool accepts tasks");
    }

    fn every(&self, period: Duration, tick: Box<dyn FnMut()>) -> FakeCadence {
        let id = self.timers.next_id.get() + 1;
        self.timers.next_id.set(id);
        self.timers.active.borrow_mut().push((id, period));
        self.timers.ticks.borrow_mut().insert(id, tick);
        self.timers.events.borrow_mut().push(format!("arm#{id}"));
        FakeCadence { id, timers: Rc::clone(&self.timers) }
    }
}

pub type Controller = DashboardController<FakeApi, FakeRuntime>;

/// Controller wired to fakes, plus the pool that drives it
pub struct Harness {
    pub pool: LocalPool,
    pub api: FakeApi,
    pub runtime: FakeRuntime,
    pub controller: Controller,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        let pool = LocalPool::new();
        let api = FakeApi::new();
        let runtime = FakeRuntime::new(pool.spawner());
        let controller = DashboardController::new(api.clone(), runtime.clone(), config, NOW_MS);
        Self { pool, api, runtime, controller }
    }

    /// Run spawned work until nothing can make progress
    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn block_on<F: std::future::Future>(&mut self, future: F) -> F::Output {
        self.pool.run_until(future)
    }
}

pub fn snapshot(ts: &str, total: f64) -> Value {
    json!({ "ts": ts, "totalValue": total, "cashBalance": total / 2.0, "positionValue": total / 2.0 })
}
