//! Flush Scheduler
//!
//! Background thread that flushes the store at a fixed period.
//!
//! ## State Machine
//! ```text
//!   Idle ──start()──▶ Running ──stop()──▶ Stopped
//!  (period = 0,         │  ▲
//!   never spawned)      └──┘ tick: flush, log failures
//! ```
//!
//! ## Stop Signal
//! The stop signal is the disconnection of a zero-capacity crossbeam
//! channel: dropping the only `Sender` wakes the `select!` immediately, no
//! matter where the ticker is in its period. A tick that became ready at the
//! same moment is discarded. `stop()` joins the thread, so once it returns
//! no flush started by the scheduler is still running.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use crossbeam::select;

use crate::error::{Result, SnapError};

const THREAD_NAME: &str = "snapkv-flush";

/// Tick counters shared between the scheduler thread and the store
#[derive(Debug, Default)]
pub struct FlushCounters {
    completed: AtomicU64,
    failed: AtomicU64,
}

impl FlushCounters {
    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> FlushStats {
        FlushStats {
            completed: self.completed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

/// Outcome counts of background flushes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Ticks whose flush succeeded
    pub completed: u64,

    /// Ticks whose flush returned an error
    pub failed: u64,
}

impl FlushStats {
    pub fn total(&self) -> u64 {
        self.completed + self.failed
    }
}

/// Handle to a running flush thread
pub struct FlushScheduler {
    /// Dropping this sender is the stop signal
    stop_tx: Option<Sender<()>>,

    handle: Option<JoinHandle<()>>,
}

impl FlushScheduler {
    /// Spawn the flush thread
    ///
    /// `flush` runs once per `period`. Its errors are logged and counted,
    /// never propagated. `period` must be non-zero.
    pub fn start<F>(period: Duration, counters: Arc<FlushCounters>, flush: F) -> Result<Self>
    where
        F: Fn() -> Result<()> + Send + 'static,
    {
        if period.is_zero() {
            return Err(SnapError::Config(
                "flush scheduler needs a non-zero period".to_string(),
            ));
        }

        let (stop_tx, stop_rx) = channel::bounded::<()>(0);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(period, stop_rx, counters, flush))
            .map_err(|e| SnapError::SchedulerSpawn(e.to_string()))?;

        tracing::debug!(period_ms = period.as_millis() as u64, "flush scheduler started");

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Fire the stop signal and wait for the thread to exit
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn stop(&mut self) {
        // Disconnects the channel
        drop(self.stop_tx.take());

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("flush scheduler thread panicked");
            } else {
                tracing::debug!("flush scheduler stopped");
            }
        }
    }

    /// Whether the thread has not been stopped yet
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for FlushScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<F>(period: Duration, stop_rx: Receiver<()>, counters: Arc<FlushCounters>, flush: F)
where
    F: Fn() -> Result<()>,
{
    let ticker = channel::tick(period);

    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => {
                // select! picks randomly among ready arms
                if let Err(TryRecvError::Disconnected) = stop_rx.try_recv() {
                    break;
                }

                match flush() {
                    Ok(()) => {
                        counters.completed.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => {
                        counters.failed.fetch_add(1, Ordering::SeqCst);
                        tracing::warn!(error = %e, "periodic flush failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Instant;

    fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let counters = Arc::new(FlushCounters::default());
        let result = FlushScheduler::start(Duration::ZERO, counters, || Ok(()));
        assert!(matches!(result, Err(SnapError::Config(_))));
    }

    #[test]
    fn test_ticks_invoke_flush() {
        let counters = Arc::new(FlushCounters::default());
        let mut scheduler =
            FlushScheduler::start(Duration::from_millis(10), Arc::clone(&counters), || Ok(()))
                .unwrap();

        assert!(wait_for(|| counters.snapshot().completed >= 3));
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(counters.snapshot().failed, 0);
    }

    #[test]
    fn test_failures_do_not_stop_the_loop() {
        let counters = Arc::new(FlushCounters::default());
        let _scheduler = FlushScheduler::start(Duration::from_millis(10), Arc::clone(&counters), || {
            Err(io::Error::new(io::ErrorKind::Other, "disk full").into())
        })
        .unwrap();

        assert!(wait_for(|| counters.snapshot().failed >= 3));
        assert_eq!(counters.snapshot().completed, 0);
    }

    #[test]
    fn test_no_ticks_after_stop() {
        let counters = Arc::new(FlushCounters::default());
        let mut scheduler =
            FlushScheduler::start(Duration::from_millis(5), Arc::clone(&counters), || Ok(()))
                .unwrap();

        assert!(wait_for(|| counters.snapshot().completed >= 1));
        scheduler.stop();
        let after_stop = counters.snapshot();

        thread::sleep(Duration::from_millis(50));
        assert_eq!(counters.snapshot(), after_stop);
    }

    #[test]
    fn test_stop_is_prompt_with_long_period() {
        let counters = Arc::new(FlushCounters::default());
        let mut scheduler =
            FlushScheduler::start(Duration::from_secs(3600), Arc::clone(&counters), || Ok(()))
                .unwrap();

        let started = Instant::now();
        scheduler.stop();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(counters.snapshot().total(), 0);
    }

    #[test]
    fn test_stop_twice_is_harmless() {
        let counters = Arc::new(FlushCounters::default());
        let mut scheduler =
            FlushScheduler::start(Duration::from_millis(10), counters, || Ok(())).unwrap();

        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
    }
}
