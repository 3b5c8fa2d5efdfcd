//! Main mirror command

use crate::config::{Config, OutputFormat};
use crate::platform::{NativePlatform, Platform};
use crate::scanner::Mirror;
use crate::types::{MirrorError, Reporter, RunStats};
use crate::ui::{report_channel, ConsoleReporter};
use std::thread;

/// Mirror `config.source` into `config.destination` on the native platform.
///
/// Every record goes to `reporter` before its action runs. A reporter that
/// blocks needs its consumer running on another thread.
pub fn run(config: &Config, reporter: &dyn Reporter) -> Result<(), MirrorError> {
    run_with_platform(config, &NativePlatform, reporter)
}

/// Same as [`run`] with explicit platform capabilities
pub fn run_with_platform(
    config: &Config,
    platform: &dyn Platform,
    reporter: &dyn Reporter,
) -> Result<(), MirrorError> {
    Mirror::new(platform, reporter).run(config)
}

/// Run with the console reporter consuming records on its own thread.
///
/// Returns the counters of everything printed together with the outcome of
/// the walk.
pub fn run_reported(config: &Config, format: OutputFormat) -> (RunStats, Result<(), MirrorError>) {
    let (reporter, receiver) = report_channel();
    let console = ConsoleReporter::new(format);
    let consumer = thread::spawn(move || console.consume(receiver));

    let result = run(config, &reporter);

    // Closing the channel ends the consumer loop.
    drop(reporter);
    let stats = match consumer.join() {
        Ok(stats) => stats,
        Err(_) => {
            tracing::error!("report consumer panicked");
            RunStats::default()
        }
    };

    (stats, result)
}
