//! Timer-driven advancement of the selected date.
//!
//! The check runs on a fixed period (two minutes by default, see
//! `DATE_ROLLOVER_PERIOD`) and compares whole calendar dates, so a manual
//! selection of another day is never clobbered. The task is owned by a
//! guard and cancelled when the guard is dropped, so no timer outlives
//! the store it ticks.

use std::time::Duration;

use chrono::Local;
use tokio::task::JoinHandle;
use tracing::debug;

use super::SyncStore;

/// Handle for the background rollover task. Dropping it stops the task.
#[derive(Debug)]
pub struct DateRollover {
    handle: JoinHandle<()>,
}

impl Drop for DateRollover {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl SyncStore {
    /// Spawn a task that advances the selected date across midnight.
    ///
    /// Must be called from within a Tokio runtime. The returned guard
    /// ties the task's lifetime to the caller's scope.
    pub fn spawn_date_rollover(&self, period: Duration) -> DateRollover {
        let store = self.clone();
        let handle = tokio::spawn(async move {
            let mut today = Local::now().date_naive();
            let mut ticks = tokio::time::interval(period);
            // The first tick completes immediately; consume it so the
            // loop starts with a full period.
            ticks.tick().await;
            loop {
                ticks.tick().await;
                let now = Local::now().date_naive();
                if now != today {
                    if store.roll_selected_date(today, now) {
                        debug!(date = %now, "selected date rolled to new day");
                    }
                    today = now;
                }
            }
        });
        DateRollover { handle }
    }
}
