//! Refresh lifecycle of the dashboard.
//!
//! The controller owns the only mutable dashboard state. Every change of
//! mode, symbol or interval runs one transition: cancel the armed cadence,
//! refresh once, arm a new cadence. Each refresh cycle carries an identity so
//! that a slow cycle can never overwrite what a newer cycle already applied.

use super::runtime::{Cadence, Runtime};
use super::state::DashboardState;
use crate::config::DashboardConfig;
use crate::domain::dashboard::normalizer::normalize_cycle;
use crate::domain::dashboard::{BotApi, Mode, Symbol, TimeInterval};
use crate::domain::errors::ApiError;
use crate::domain::logging::{LogComponent, LogEntry, LogLevel, get_logger};
use futures::future::try_join4;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

const COMPONENT: LogComponent = LogComponent::Application("Poller");

/// Result of one refresh cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// All four reads succeeded and replaced the dashboard data
    Applied,
    /// A read failed; data untouched, error slot set
    Failed(ApiError),
    /// A newer cycle or a parameter change superseded this one
    Discarded,
}

/// Cycle identity bookkeeping.
///
/// Ids grow monotonically. A result is accepted only if its cycle is newer
/// than the last accepted one and was issued after the latest parameter
/// change.
#[derive(Debug, Clone, Default)]
pub struct CycleTracker {
    issued: u64,
    accepted: u64,
    floor: u64,
}

impl CycleTracker {
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Everything issued so far becomes stale
    pub fn invalidate(&mut self) {
        self.floor = self.issued + 1;
    }

    pub fn accept(&mut self, cycle: u64) -> bool {
        if cycle < self.floor || cycle <= self.accepted {
            return false;
        }
        self.accepted = cycle;
        true
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }
}

type Listener = Rc<dyn Fn(&DashboardState)>;

pub(crate) struct Inner<A, R: Runtime> {
    pub(crate) api: A,
    runtime: R,
    config: DashboardConfig,
    state: RefCell<DashboardState>,
    cycles: RefCell<CycleTracker>,
    cadence: RefCell<Option<R::Cadence>>,
    listener: RefCell<Option<Listener>>,
}

impl<A, R: Runtime> Drop for Inner<A, R> {
    fn drop(&mut self) {
        if let Some(cadence) = self.cadence.get_mut().take() {
            cadence.cancel();
        }
    }
}

/// Poller and owner of the dashboard state
pub struct DashboardController<A, R: Runtime> {
    pub(crate) inner: Rc<Inner<A, R>>,
}

impl<A, R: Runtime> Clone for DashboardController<A, R> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<A: BotApi + 'static, R: Runtime> DashboardController<A, R> {
    pub fn new(api: A, runtime: R, config: DashboardConfig, now_ms: i64) -> Self {
        let state = DashboardState::initial(&config, now_ms);
        Self {
            inner: Rc::new(Inner {
                api,
                runtime,
                config,
                state: RefCell::new(state),
                cycles: RefCell::new(CycleTracker::default()),
                cadence: RefCell::new(None),
                listener: RefCell::new(None),
            }),
        }
    }

    /// Called with a copy of the state after every transition
    pub fn subscribe(&self, listener: impl Fn(&DashboardState) + 'static) {
        *self.inner.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn state(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn is_polling(&self) -> bool {
        self.inner.cadence.borrow().is_some()
    }

    /// Start polling with the current parameters
    pub fn mount(&self) {
        self.restart_polling();
    }

    /// Stop polling; in-flight cycles may still land
    pub fn unmount(&self) {
        if self.cancel_cadence() {
            log(LogLevel::Info, "polling stopped");
        }
    }

    pub fn set_mode(&self, mode: Mode) {
        self.change_params(|s| std::mem::replace(&mut s.params.mode, mode) != mode);
    }

    pub fn set_symbol(&self, symbol: Symbol) {
        self.change_params(|s| {
            let changed = s.params.symbol != symbol;
            s.params.symbol = symbol;
            changed
        });
    }

    pub fn set_interval(&self, interval: TimeInterval) {
        self.change_params(|s| std::mem::replace(&mut s.params.interval, interval) != interval);
    }

    pub fn set_initial_balance(&self, initial_balance: f64) {
        self.update(|s| s.start_inputs.initial_balance = initial_balance);
    }

    pub fn set_risk_pct(&self, risk_pct: f64) {
        self.update(|s| s.start_inputs.risk_pct = risk_pct);
    }

    pub fn set_training_window(&self, from_iso: String, to_iso: String) {
        self.update(|s| {
            s.start_inputs.from_iso = from_iso;
            s.start_inputs.to_iso = to_iso;
        });
    }

    /// One refresh cycle; clears the error slot when it starts
    pub async fn refresh(&self) -> CycleOutcome {
        self.run_cycle(true).await
    }

    fn change_params(&self, apply: impl FnOnce(&mut DashboardState) -> bool) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            apply(&mut state)
        };
        if changed {
            self.notify();
            self.restart_polling();
        }
    }

    /// cancel-if-armed, immediate refresh, arm a new cadence
    fn restart_polling(&self) {
        self.cancel_cadence();
        self.inner.cycles.borrow_mut().invalidate();

        let params = self.inner.state.borrow().params.clone();
        get_logger().log(
            LogEntry::new(LogLevel::Info, COMPONENT, "polling (re)armed")
                .with_field("mode", params.mode)
                .with_field("symbol", &params.symbol)
                .with_field("interval", params.interval)
                .with_field("period_ms", self.inner.config.poll_period.as_millis()),
        );

        self.spawn_refresh();

        let weak: Weak<Inner<A, R>> = Rc::downgrade(&self.inner);
        let cadence = self.inner.runtime.every(
            self.inner.config.poll_period,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    DashboardController { inner }.spawn_refresh();
                }
            }),
        );
        *self.inner.cadence.borrow_mut() = Some(cadence);
    }

    fn cancel_cadence(&self) -> bool {
        let armed = self.inner.cadence.borrow_mut().take();
        match armed {
            Some(cadence) => {
                cadence.cancel();
                true
            }
            None => false,
        }
    }

    pub(crate) fn spawn_refresh(&self) {
        let this = self.clone();
        self.inner.runtime.spawn(Box::pin(async move {
            this.refresh().await;
        }));
    }

    pub(crate) fn spawn_task(&self, task: futures::future::LocalBoxFuture<'static, ()>) {
        self.inner.runtime.spawn(task);
    }

    pub(crate) async fn run_cycle(&self, clear_error: bool) -> CycleOutcome {
        let cycle = self.inner.cycles.borrow_mut().begin();
        let params = self.inner.state.borrow().params.clone();
        if clear_error {
            self.clear_error();
        }
        crate::log_debug!(COMPONENT, "cycle {cycle} started for {} {}", params.mode, params.symbol);

        let api = &self.inner.api;
        let config = &self.inner.config;
        let result = try_join4(
            api.status(),
            api.candles(&params.symbol, params.interval, Some(config.candle_limit)),
            api.trades(params.mode, &params.symbol, Some(config.trade_limit)),
            api.snapshots(params.mode, &params.symbol, Some(config.snapshot_limit)),
        )
        .await;

        if !self.inner.cycles.borrow_mut().accept(cycle) {
            crate::log_debug!(COMPONENT, "cycle {cycle} superseded, result dropped");
            return CycleOutcome::Discarded;
        }

        match result {
            Ok((status, candles, trades, snapshots)) => {
                let data = normalize_cycle(status, candles, trades, snapshots);
                get_logger().log(
                    LogEntry::new(LogLevel::Debug, COMPONENT, "cycle applied")
                        .with_field("cycle", cycle)
                        .with_field("candles", data.candles.len())
                        .with_field("trades", data.trades.len())
                        .with_field("snapshots", data.snapshots.len()),
                );
                self.update(|s| s.data = data);
                CycleOutcome::Applied
            }
            Err(err) => {
                crate::log_warn!(COMPONENT, "cycle {cycle} failed: {err}");
                self.set_error(&err);
                CycleOutcome::Failed(err)
            }
        }
    }

    pub(crate) fn clear_error(&self) {
        if self.inner.state.borrow().error.is_some() {
            self.update(|s| s.error = None);
        }
    }

    pub(crate) fn set_error(&self, err: &ApiError) {
        let message = err.to_string();
        self.update(|s| s.error = Some(message));
    }

    fn update(&self, apply: impl FnOnce(&mut DashboardState)) {
        {
            let mut state = self.inner.state.borrow_mut();
            apply(&mut state);
        }
        self.notify();
    }

    fn notify(&self) {
        let listener = self.inner.listener.borrow().clone();
        if let Some(listener) = listener {
            let snapshot = self.inner.state.borrow().clone();
            listener(&snapshot);
        }
    }
}

fn log(level: LogLevel, message: &str) {
    get_logger().log(LogEntry::new(level, COMPONENT, message));
}
