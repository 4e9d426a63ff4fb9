//! # Uplink Module
//!
//! Outbound side of the engine.
//!
//! This module handles:
//! - The [`StateSink`] seam the embedder's transport implements
//! - A bounded-channel sink for in-process consumers
//! - The fixed-cadence [`Uplink`] scheduler that keeps the remote watchdog
//!   satisfied

pub mod scheduler;
pub mod sink;

pub use scheduler::Uplink;
pub use sink::{ChannelSink, SinkError, StateSink};
