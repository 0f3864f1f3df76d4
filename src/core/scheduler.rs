// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Task scheduler for timed operations

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Runs named closures on a fixed period until cancelled or dropped
pub struct Scheduler {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Run `task` every `period`, first after one full period.
    /// Re-using a name replaces the earlier task.
    pub fn every<F>(&self, name: &str, period: Duration, task: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let task_name = name.to_string();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                trace!(task = %task_name, "running scheduled task");
                task();
            }
        });

        if let Some(previous) = self.tasks.lock().insert(name.to_string(), handle) {
            previous.abort();
        }
        debug!("Scheduled task '{}' with interval {:?}", name, period);
    }

    pub fn cancel(&self, name: &str) -> bool {
        match self.tasks.lock().remove(name) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, name: &str) -> bool {
        self.tasks.lock().contains_key(name)
    }

    pub fn cancel_all(&self) {
        for (_, handle) in self.tasks.lock().drain() {
            handle.abort();
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_runs_on_period() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        scheduler.every("sweep", Duration::from_secs(60), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(3 * 60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_task() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        scheduler.every("sweep", Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(scheduler.is_scheduled("sweep"));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(scheduler.cancel("sweep"));
        assert!(!scheduler.is_scheduled("sweep"));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
