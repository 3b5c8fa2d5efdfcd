//! Blocking hand-off of report records to a consumer thread

use crate::types::{Report, Reporter};
use tokio::sync::mpsc;

/// Capacity of the report queue.
///
/// With a single slot the walk can be at most one record ahead of the
/// consumer, so the printed log tracks what is happening on disk.
pub const REPORT_QUEUE_CAPACITY: usize = 1;

/// Producer half: hands each record to the consumer, blocking while the
/// queue is full.
///
/// Must not be used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: mpsc::Sender<Report>,
}

/// Consumer half, iterated on its own thread
#[derive(Debug)]
pub struct ReportReceiver {
    receiver: mpsc::Receiver<Report>,
}

/// Create a connected reporter/receiver pair
pub fn report_channel() -> (ChannelReporter, ReportReceiver) {
    let (sender, receiver) = mpsc::channel(REPORT_QUEUE_CAPACITY);
    (ChannelReporter { sender }, ReportReceiver { receiver })
}

impl Reporter for ChannelReporter {
    fn report(&self, record: Report) {
        if let Err(err) = self.sender.blocking_send(record) {
            tracing::warn!(record = %err.0, "report consumer has stopped, record dropped");
        }
    }
}

impl Iterator for ReportReceiver {
    type Item = Report;

    /// Next record, or `None` once every reporter has been dropped
    fn next(&mut self) -> Option<Report> {
        self.receiver.blocking_recv()
    }
}
