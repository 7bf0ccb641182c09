use crate::application::runtime::{Cadence, Runtime};
use futures::future::LocalBoxFuture;
use gloo_timers::callback::Interval;
use std::time::Duration;

/// JS event loop: `spawn_local` for tasks, `setInterval` for cadences
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserRuntime;

/// Armed `setInterval`; dropping it also clears the timer
pub struct IntervalCadence(Interval);

impl Cadence for IntervalCadence {
    fn cancel(self) {
        drop(self.0.cancel());
    }
}

impl Runtime for BrowserRuntime {
    type Cadence = IntervalCadence;

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn every(&self, period: Duration, tick: Box<dyn FnMut()>) -> IntervalCadence {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        IntervalCadence(Interval::new(millis, tick))
    }
}
