//! Trait abstraction for the outbound state channel to enable testing

use thiserror::Error;
use tokio::sync::mpsc;

use crate::gamepad::StateFrame;

/// Error from a sink's send attempt.
///
/// Sink failures never delay or skip a tick; the scheduler logs them and
/// tries again on the next tick.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The channel is backed up; the frame was dropped.
    #[error("outbound channel full, frame dropped")]
    Full,
    /// The consumer is gone.
    #[error("outbound channel closed")]
    Closed,
}

/// Outbound channel for state frames.
///
/// `send` must not block: the uplink scheduler calls it on every tick and a
/// slow consumer must never widen the gap the remote watchdog measures.
pub trait StateSink: Send {
    /// Hand one frame to the transport, fire-and-forget.
    fn send(&mut self, frame: StateFrame) -> Result<(), SinkError>;
}

/// [`StateSink`] backed by a bounded tokio channel.
///
/// Frames are handed over with `try_send`; when the consumer falls behind
/// the frame is dropped rather than the tick delayed.
pub struct ChannelSink {
    tx: mpsc::Sender<StateFrame>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<StateFrame>) -> Self {
        Self { tx }
    }
}

impl StateSink for ChannelSink {
    fn send(&mut self, frame: StateFrame) -> Result<(), SinkError> {
        self.tx.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::Full,
            mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_delivers_frames() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut sink = ChannelSink::new(tx);

        let mut frame = StateFrame::default();
        frame.gamepad1.a = true;
        sink.send(frame.clone()).unwrap();

        assert_eq!(rx.try_recv().unwrap(), frame);
    }

    #[test]
    fn test_channel_sink_full_drops_frame() {
        let (tx, _rx) = mpsc::channel(1);
        let mut sink = ChannelSink::new(tx);

        sink.send(StateFrame::default()).unwrap();
        let err = sink.send(StateFrame::default()).unwrap_err();
        assert_eq!(err, SinkError::Full);
    }

    #[test]
    fn test_channel_sink_closed() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut sink = ChannelSink::new(tx);

        let err = sink.send(StateFrame::default()).unwrap_err();
        assert_eq!(err, SinkError::Closed);
    }
}
