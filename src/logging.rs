#![cfg(feature = "std")]

//! Stderr logger. Lines carry the time since start-up so both peers' logs
//! of one match can be lined up; stdout stays free for the board and the
//! simulator's JSON.

use std::env;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Metadata, Record};

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "CARGO_PUSH_LOG";

static STARTED: OnceLock<Instant> = OnceLock::new();

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = STARTED.get_or_init(Instant::now).elapsed();
        eprintln!("{}", format_line(elapsed.as_secs_f64(), record));
    }

    fn flush(&self) {}
}

fn format_line(elapsed_secs: f64, record: &Record) -> String {
    format!("{:>9.3}s {:<5} {}", elapsed_secs, record.level(), record.args())
}

fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|lvl| lvl.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr logger with the level from `CARGO_PUSH_LOG`
/// (`info` when unset or unparsable). Later calls keep the first logger.
pub fn init_logging() {
    STARTED.get_or_init(Instant::now);
    let level = level_from(env::var(LOG_ENV).ok().as_deref());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_defaults_to_info() {
        assert_eq!(level_from(None), LevelFilter::Info);
        assert_eq!(level_from(Some("chatty")), LevelFilter::Info);
        assert_eq!(level_from(Some(" debug ")), LevelFilter::Debug);
        assert_eq!(level_from(Some("off")), LevelFilter::Off);
    }

    #[test]
    fn line_carries_elapsed_time_and_level() {
        let line = format_line(
            1.25,
            &Record::builder()
                .args(format_args!("[match] room-7 finished"))
                .level(log::Level::Warn)
                .build(),
        );
        assert_eq!(line, "    1.250s WARN  [match] room-7 finished");
    }
}
