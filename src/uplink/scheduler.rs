//! # Uplink Scheduler
//!
//! The heartbeat: forwards the current state of both slots to the outbound
//! channel on a fixed period, whether or not anything changed.
//!
//! The remote side runs a liveness watchdog (reference timeout 500 ms) and
//! enters a fail-safe state when no update arrives within it. The scheduler
//! therefore never gates a dispatch on a did-anything-change check, never
//! backs off after a sink failure, and reads the live store on every tick
//! rather than anything captured at setup time.

use std::time::Duration;

use tokio::time::{interval, Interval};
use tracing::debug;

use crate::gamepad::StateFrame;

use super::sink::StateSink;

/// Fixed-cadence dispatcher of state frames to a [`StateSink`].
pub struct Uplink<S: StateSink> {
    sink: S,
    period: Duration,
    frames_sent: u64,
    frames_dropped: u64,
}

impl<S: StateSink> Uplink<S> {
    /// Creates an uplink dispatching to `sink` every `period`.
    #[must_use]
    pub fn new(sink: S, period: Duration) -> Self {
        Self {
            sink,
            period,
            frames_sent: 0,
            frames_dropped: 0,
        }
    }

    /// The configured tick period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Creates the tick timer for the engine loop. The first tick fires
    /// immediately, so the watchdog sees a frame as soon as the engine runs.
    #[must_use]
    pub fn ticker(&self) -> Interval {
        interval(self.period)
    }

    /// Frames handed to the sink successfully.
    #[must_use]
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Frames the sink refused. Dropped frames are not retried; the next
    /// tick carries fresher state anyway.
    #[must_use]
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    /// Dispatches one frame, unconditionally.
    pub fn dispatch(&mut self, frame: StateFrame) {
        match self.sink.send(frame) {
            Ok(()) => {
                self.frames_sent += 1;
            }
            Err(e) => {
                self.frames_dropped += 1;
                debug!("Failed to send state frame: {}", e);
            }
        }
    }
}
