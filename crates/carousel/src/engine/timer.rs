use derive_more::{Display, From, Into};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Identifies one arming of a timer. Ticks from an older arming are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, From, Into)]
pub struct TickEpoch(u64);

impl TickEpoch {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub epoch: TickEpoch,
}

/// A recurring callback source owned by one autoplay scheduler.
pub trait Timer {
    /// Cancels whatever is in flight and starts counting `period` from zero.
    fn arm(&mut self, period: Duration) -> TickEpoch;
    /// Cancels the pending callback. Safe to call when nothing is armed.
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    epoch: TickEpoch,
    period: Option<Duration>,
    elapsed: Duration,
}

/// Hand-driven clock. Clones share the same state so a test can keep a handle
/// while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    state: Rc<RefCell<ManualState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward and returns every tick that came due.
    pub fn advance(&self, by: Duration) -> Vec<Tick> {
        let mut state = self.state.borrow_mut();
        state.now += by;

        let Some(period) = state.period.filter(|p| !p.is_zero()) else {
            return Vec::new();
        };

        state.elapsed += by;
        let mut ticks = Vec::new();
        while state.elapsed >= period {
            state.elapsed -= period;
            ticks.push(Tick { epoch: state.epoch });
        }
        ticks
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of pending recurring callbacks (0 or 1).
    pub fn scheduled(&self) -> usize {
        usize::from(self.state.borrow().period.is_some())
    }

    /// Time left until the next tick, if armed.
    pub fn remaining(&self) -> Option<Duration> {
        let state = self.state.borrow();
        state.period.map(|p| p.saturating_sub(state.elapsed))
    }
}

impl Timer for ManualTimer {
    fn arm(&mut self, period: Duration) -> TickEpoch {
        let mut state = self.state.borrow_mut();
        state.epoch = state.epoch.next();
        state.period = Some(period);
        state.elapsed = Duration::ZERO;
        state.epoch
    }

    fn disarm(&mut self) {
        let mut state = self.state.borrow_mut();
        state.period = None;
        state.elapsed = Duration::ZERO;
    }

    fn is_armed(&self) -> bool {
        self.state.borrow().period.is_some()
    }
}
