//! Progress reporting for pipeline runs.

use async_trait::async_trait;
use tokio::sync::mpsc;

use lessonforge_core::models::ProgressEvent;

/// Receives progress updates from a pipeline run. Implementations must not
/// block the run on a slow consumer.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, event: ProgressEvent);
}

/// Sink that forwards events into an unbounded channel. When the receiver is
/// gone the event is dropped; the run outcome is still recorded on the
/// artifact.
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ProgressSink for ChannelSink {
    async fn report(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}

/// Sink that discards all events.
pub struct NullSink;

#[async_trait]
impl ProgressSink for NullSink {
    async fn report(&self, _event: ProgressEvent) {}
}
