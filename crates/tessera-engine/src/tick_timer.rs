//! Fixed-interval tick source for interactive runs.
//!
//! [`TickTimer`] owns a background thread that sends a [`Tick`] every
//! interval over a bounded crossbeam channel. It never touches a model:
//! the owner receives ticks and calls
//! [`execute_step()`](crate::SimulationExecutor::execute_step) itself, so
//! steps always run on the owner's thread. When the owner falls behind,
//! ticks that do not fit in the channel are dropped rather than queued.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use log::{debug, trace};

use crate::config::ConfigError;

/// One timer tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    /// Sequence number of the tick, starting at 0. Dropped ticks leave gaps.
    pub sequence: u64,
    /// When the tick was produced.
    pub at: Instant,
}

/// Background thread producing [`Tick`]s.
#[derive(Debug)]
pub struct TickTimer {
    ticks: Receiver<Tick>,
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TickTimer {
    /// Start ticking every `interval`, buffering at most `capacity` ticks.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] for a zero interval or capacity,
    /// [`ConfigError::ThreadSpawnFailed`] if the thread cannot start.
    pub fn start(interval: Duration, capacity: usize) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::invalid("interval", "must be non-zero"));
        }
        if capacity == 0 {
            return Err(ConfigError::invalid("capacity", "must be at least 1"));
        }

        let (tick_tx, tick_rx) = bounded(capacity);
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let thread = thread::Builder::new()
            .name("tessera-tick".into())
            .spawn(move || run(interval, &tick_tx, &stop_rx))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("tick timer: {e}"),
            })?;
        debug!("tick timer started at {interval:?}");

        Ok(Self {
            ticks: tick_rx,
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }

    /// The tick channel.
    pub fn receiver(&self) -> &Receiver<Tick> {
        &self.ticks
    }

    /// Stop the thread and wait for it. Idempotent.
    pub fn stop(&mut self) {
        // Dropping the sender disconnects the stop channel.
        self.stop.take();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
            debug!("tick timer stopped");
        }
    }

    /// Whether the thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(interval: Duration, ticks: &Sender<Tick>, stop: &Receiver<()>) {
    let mut sequence = 0u64;
    loop {
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
        let tick = Tick {
            sequence,
            at: Instant::now(),
        };
        sequence += 1;
        match ticks.try_send(tick) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => trace!("tick {} dropped", tick.sequence),
            Err(TrySendError::Disconnected(_)) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_interval_and_capacity() {
        assert!(matches!(
            TickTimer::start(Duration::ZERO, 4),
            Err(ConfigError::InvalidParameter { name: "interval", .. })
        ));
        assert!(matches!(
            TickTimer::start(Duration::from_millis(1), 0),
            Err(ConfigError::InvalidParameter { name: "capacity", .. })
        ));
    }

    #[test]
    fn ticks_arrive_in_order() {
        let timer = TickTimer::start(Duration::from_millis(2), 16).unwrap();
        let first = timer.receiver().recv_timeout(Duration::from_secs(5)).unwrap();
        let second = timer.receiver().recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(second.sequence > first.sequence);
        assert!(second.at >= first.at);
    }

    #[test]
    fn stop_joins_and_disconnects() {
        let mut timer = TickTimer::start(Duration::from_millis(1), 1).unwrap();
        timer.stop();
        assert!(!timer.is_running());
        timer.stop();
        // At most the one buffered tick remains, then the channel is closed.
        let _ = timer.receiver().try_recv();
        assert!(timer.receiver().recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn full_channel_drops_ticks() {
        let timer = TickTimer::start(Duration::from_millis(1), 1).unwrap();
        std::thread::sleep(Duration::from_millis(100));
        let first = timer.receiver().recv_timeout(Duration::from_secs(5)).unwrap();
        let next = timer.receiver().recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first.sequence, 0);
        assert!(next.sequence > 1);
    }
}
