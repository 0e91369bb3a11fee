use crate::engine::{Tick, TickEpoch, Timer};
use crate::events::AppEvent;
use async_channel::Sender;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Autoplay timer backed by a tokio interval task that feeds ticks into the
/// daemon's event queue.
#[derive(Debug)]
pub struct TokioTimer {
    tx: Sender<AppEvent>,
    runtime: Handle,
    task: Option<JoinHandle<()>>,
    epoch: TickEpoch,
}

impl TokioTimer {
    pub fn new(tx: Sender<AppEvent>, runtime: Handle) -> Self {
        Self {
            tx,
            runtime,
            task: None,
            epoch: TickEpoch::default(),
        }
    }
}

impl Timer for TokioTimer {
    fn arm(&mut self, period: Duration) -> TickEpoch {
        self.disarm();
        self.epoch = self.epoch.next();

        let tick = Tick { epoch: self.epoch };
        let tx = self.tx.clone();
        self.task = Some(self.runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(AppEvent::Tick(tick)).await.is_err() {
                    break;
                }
            }
        }));

        self.epoch
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_armed(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}
