//! User-facing output

pub mod channel;
pub mod progress;

pub use channel::{report_channel, ChannelReporter, ReportReceiver};
pub use progress::{render_line, ConsoleReporter};
