use super::timer::{Tick, TickEpoch, Timer};
use std::time::Duration;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Drives automatic advancement through a [`Timer`].
///
/// Interaction sources (hover, touch, drag) suspend autoplay through a counter
/// so overlapping sources compose: the countdown only restarts once every one
/// of them has resumed. The timer is released whenever the scheduler leaves
/// `Running`, and on drop.
#[derive(Debug)]
pub struct AutoplayScheduler<T: Timer> {
    enabled: bool,
    interval: Duration,
    item_count: usize,
    suspend_count: u32,
    phase: Phase,
    epoch: Option<TickEpoch>,
    timer: T,
}

impl<T: Timer> AutoplayScheduler<T> {
    pub fn new(timer: T, enabled: bool, interval: Duration) -> Self {
        Self {
            enabled,
            interval,
            item_count: 0,
            suspend_count: 0,
            phase: Phase::Idle,
            epoch: None,
            timer,
        }
    }

    fn eligible(&self) -> bool {
        self.enabled && self.item_count > 1 && !self.interval.is_zero()
    }

    pub fn start(&mut self) {
        if !self.eligible() {
            self.stop();
            return;
        }
        if self.suspend_count > 0 {
            self.release();
            self.set_phase(Phase::Paused);
        } else {
            self.arm();
        }
    }

    /// Cancels any pending tick and returns to `Idle`. Idempotent.
    pub fn stop(&mut self) {
        self.release();
        self.set_phase(Phase::Idle);
    }

    pub fn suspend(&mut self) {
        self.suspend_count += 1;
        if self.phase == Phase::Running {
            self.release();
            self.set_phase(Phase::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.suspend_count == 0 {
            log::warn!("Autoplay resume without a matching suspend");
            return;
        }
        self.suspend_count -= 1;
        if self.suspend_count == 0 && self.phase == Phase::Paused {
            self.arm();
        }
    }

    /// Restarts the countdown from zero when running; otherwise a no-op.
    pub fn restart(&mut self) {
        if self.phase == Phase::Running {
            self.arm();
        }
    }

    /// Returns `true` when `tick` belongs to the live countdown and the
    /// carousel should advance.
    pub fn on_tick(&self, tick: Tick) -> bool {
        self.phase == Phase::Running && self.epoch == Some(tick.epoch)
    }

    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
        if !self.eligible() {
            self.stop();
        }
    }

    pub fn configure(&mut self, enabled: bool, interval: Duration) {
        self.enabled = enabled;
        self.interval = interval;
        self.start();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn suspend_count(&self) -> u32 {
        self.suspend_count
    }

    fn arm(&mut self) {
        self.epoch = Some(self.timer.arm(self.interval));
        self.set_phase(Phase::Running);
    }

    fn release(&mut self) {
        self.timer.disarm();
        self.epoch = None;
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("Autoplay {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }
}

impl<T: Timer> Drop for AutoplayScheduler<T> {
    fn drop(&mut self) {
        self.timer.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::timer::ManualTimer;

    const INTERVAL: Duration = Duration::from_millis(4000);

    fn scheduler(items: usize) -> (AutoplayScheduler<ManualTimer>, ManualTimer) {
        let clock = ManualTimer::new();
        let mut autoplay = AutoplayScheduler::new(clock.clone(), true, INTERVAL);
        autoplay.set_item_count(items);
        (autoplay, clock)
    }

    #[test]
    fn test_start_requires_more_than_one_item() {
        for items in [0, 1] {
            let (mut autoplay, clock) = scheduler(items);
            autoplay.start();
            assert_eq!(autoplay.phase(), Phase::Idle);
            assert_eq!(clock.scheduled(), 0);
        }

        let (mut autoplay, clock) = scheduler(2);
        autoplay.start();
        assert_eq!(autoplay.phase(), Phase::Running);
        assert_eq!(clock.scheduled(), 1);
    }

    #[test]
    fn test_disabled_never_runs() {
        let clock = ManualTimer::new();
        let mut autoplay = AutoplayScheduler::new(clock.clone(), false, INTERVAL);
        autoplay.set_item_count(5);
        autoplay.start();
        assert_eq!(autoplay.phase(), Phase::Idle);
        assert!(clock.advance(INTERVAL * 3).is_empty());
    }

    #[test]
    fn test_overlapping_suspends_resume_at_zero() {
        let (mut autoplay, clock) = scheduler(5);
        autoplay.start();

        autoplay.suspend(); // hover
        autoplay.suspend(); // drag
        assert_eq!(autoplay.phase(), Phase::Paused);
        assert_eq!(clock.scheduled(), 0);

        autoplay.resume();
        assert_eq!(autoplay.phase(), Phase::Paused);
        assert_eq!(autoplay.suspend_count(), 1);

        autoplay.resume();
        assert_eq!(autoplay.phase(), Phase::Running);
        assert_eq!(clock.remaining(), Some(INTERVAL));
    }

    #[test]
    fn test_unmatched_resume_is_ignored() {
        let (mut autoplay, _clock) = scheduler(5);
        autoplay.start();
        autoplay.resume();
        assert_eq!(autoplay.suspend_count(), 0);
        assert_eq!(autoplay.phase(), Phase::Running);
    }

    #[test]
    fn test_start_while_suspended_waits_for_resume() {
        let (mut autoplay, clock) = scheduler(5);
        autoplay.suspend();
        autoplay.start();
        assert_eq!(autoplay.phase(), Phase::Paused);
        assert_eq!(clock.scheduled(), 0);

        autoplay.resume();
        assert_eq!(autoplay.phase(), Phase::Running);
    }

    #[test]
    fn test_stale_ticks_are_rejected() {
        let (mut autoplay, clock) = scheduler(5);
        autoplay.start();
        let stale = clock.advance(INTERVAL);
        assert_eq!(stale.len(), 1);

        autoplay.restart();
        assert!(!autoplay.on_tick(stale[0]));

        let fresh = clock.advance(INTERVAL);
        assert!(autoplay.on_tick(fresh[0]));
    }

    #[test]
    fn test_stop_is_idempotent_and_cancels() {
        let (mut autoplay, clock) = scheduler(5);
        autoplay.start();
        let pending = clock.advance(INTERVAL);

        autoplay.stop();
        autoplay.stop();
        assert_eq!(autoplay.phase(), Phase::Idle);
        assert_eq!(clock.scheduled(), 0);
        assert!(!autoplay.on_tick(pending[0]));

        // resuming after a stop must not bring the timer back
        autoplay.suspend();
        autoplay.resume();
        assert_eq!(clock.scheduled(), 0);
    }

    #[test]
    fn test_shrinking_to_one_item_stops() {
        let (mut autoplay, clock) = scheduler(5);
        autoplay.start();
        autoplay.set_item_count(1);
        assert_eq!(autoplay.phase(), Phase::Idle);
        assert_eq!(clock.scheduled(), 0);
    }

    #[test]
    fn test_drop_releases_timer() {
        let (mut autoplay, clock) = scheduler(5);
        autoplay.start();
        drop(autoplay);
        assert_eq!(clock.scheduled(), 0);
    }
}
