use futures::future::LocalBoxFuture;
use std::time::Duration;

/// Handle of an armed recurring trigger
pub trait Cadence {
    /// Stop the trigger; no tick fires after this returns
    fn cancel(self);
}

/// Single-threaded task spawning and recurring timers.
///
/// The browser implementation sits on the JS event loop; tests plug in a
/// deterministic runtime that counts timers.
pub trait Runtime: 'static {
    type Cadence: Cadence + 'static;

    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    fn every(&self, period: Duration, tick: Box<dyn FnMut()>) -> Self::Cadence;
}
