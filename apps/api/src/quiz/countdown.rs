//! Background one-second ticker for an active quiz.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::quiz::runner::{QuizRunner, Tick};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns the ticking task. Dropping the handle cancels it, so a torn-down
/// quiz never receives a stray tick.
#[derive(Debug)]
pub struct CountdownHandle {
    task: JoinHandle<()>,
}

#[cfg(test)]
impl CountdownHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Ticks `runner` every `period` until it completes.
pub fn spawn_countdown(runner: Arc<Mutex<QuizRunner>>, period: Duration) -> CountdownHandle {
    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick resolves immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match runner.lock().await.tick() {
                Tick::Running(remaining) => debug!("Quiz countdown: {remaining}s left"),
                Tick::Expired | Tick::Idle => break,
            }
        }
        debug!("Quiz countdown stopped");
    });
    CountdownHandle { task }
}
