//! Console output of the action log

use crate::config::OutputFormat;
use crate::types::{Report, RunStats};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Prints report records as they arrive, with a spinner for the record
/// currently being worked on and a summary at the end.
pub struct ConsoleReporter {
    format: OutputFormat,
    spinner: ProgressBar,
    stats: RunStats,
    started_at: Instant,
}

impl ConsoleReporter {
    /// Create a console reporter printing in `format`
    pub fn new(format: OutputFormat) -> Self {
        let spinner = match format {
            OutputFormat::Text => {
                let spinner = ProgressBar::new_spinner();
                spinner.enable_steady_tick(Duration::from_millis(120));
                if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                    spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
                }
                spinner
            }
            // JSON output is for machines; keep stdout clean.
            OutputFormat::Json => ProgressBar::hidden(),
        };

        Self {
            format,
            spinner,
            stats: RunStats::default(),
            started_at: Instant::now(),
        }
    }

    /// Print one record and update the counters
    pub fn handle(&mut self, record: &Report) {
        self.stats.record(record);

        let line = render_line(self.format, record);
        self.spinner.suspend(|| println!("{}", line));
        self.spinner.set_message(format!(
            "{} copied | {} backed up | {} removed",
            self.stats.copied, self.stats.backed_up, self.stats.removed
        ));
    }

    /// Drain `records`, then print the summary
    pub fn consume<I>(mut self, records: I) -> RunStats
    where
        I: IntoIterator<Item = Report>,
    {
        for record in records {
            self.handle(&record);
        }
        self.finish();
        self.stats
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
        if self.format == OutputFormat::Json {
            return;
        }

        let stats = &self.stats;
        let errors = if stats.errors > 0 {
            style(format!("{} errors", stats.errors)).red().bold()
        } else {
            style(format!("{} errors", stats.errors)).green()
        };
        eprintln!(
            "{} {} dirs created, {} copied, {} skipped, {} backed up, {} removed, {} in {:.2?}",
            style("Done:").bold(),
            stats.dirs_created,
            stats.copied,
            stats.skipped,
            stats.backed_up,
            stats.removed,
            errors,
            self.started_at.elapsed()
        );
    }
}

/// One output line for `record`
pub fn render_line(format: OutputFormat, record: &Report) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(record).unwrap_or_else(|err| {
            format!(r#"{{"verb":"error","message":"unprintable record: {}"}}"#, err)
        }),
        OutputFormat::Text => {
            let fields = record.fields();
            match record {
                Report::Error { message } => format!("{} {}", style("error").red().bold(), message),
                _ => {
                    let verb = record.verb();
                    let styled = match record {
                        Report::Copy { .. } => style(verb).green(),
                        Report::Mkdir { .. } => style(verb).cyan(),
                        Report::Backup { .. } | Report::Sync { .. } => style(verb).yellow(),
                        Report::Remove { .. } => style(verb).magenta(),
                        _ => style(verb).dim(),
                    };
                    let operands = fields[1..].join(" ");
                    format!("{} {}", styled, operands)
                }
            }
        }
    }
}
