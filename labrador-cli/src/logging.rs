use chrono::{Local, NaiveTime};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::PROGRESS_BAR;

/// Both the library and the binary log under this crate name; records of
/// other crates (rayon, indicatif, ...) are not printed.
const LOGGED_CRATE: &str = "labrador";

struct LabradorLogger;

impl Log for LabradorLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && is_logged_target(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let msg = format_record(
            Local::now().time(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        if PROGRESS_BAR.is_hidden() {
            eprintln!("{}", msg);
        } else {
            PROGRESS_BAR.println(msg);
        }
    }

    fn flush(&self) {}
}

fn is_logged_target(target: &str) -> bool {
    target.split("::").next() == Some(LOGGED_CRATE)
}

/// Formats a log line. The crate name is dropped from the target, leaving
/// the module path (e.g. `topdom` instead of `labrador::topdom`).
fn format_record(time: NaiveTime, level: Level, target: &str, msg: &str) -> String {
    let module = target.strip_prefix("labrador::").unwrap_or(target);

    format!(
        "{} {:<5} [{}] {}",
        time.format("%H:%M:%S%.3f"),
        level,
        module,
        msg
    )
}

static LOGGER: LabradorLogger = LabradorLogger;

pub fn init_logging(filter: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(filter);

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use log::Level;

    use crate::logging::{format_record, is_logged_target};

    #[test]
    fn test_logged_targets() {
        assert!(is_logged_target("labrador"));
        assert!(is_logged_target("labrador::topdom"));
        assert!(is_logged_target("labrador::loader"));
        assert!(!is_logged_target("rayon_core::registry"));
        assert!(!is_logged_target("labradoodle"));
    }

    #[test]
    fn test_format_record() {
        let time = NaiveTime::from_hms_milli_opt(12, 30, 5, 42).unwrap();

        assert_eq!(
            format_record(time, Level::Info, "labrador::topdom", "Found 2 domain boundaries"),
            "12:30:05.042 INFO  [topdom] Found 2 domain boundaries"
        );
        assert_eq!(
            format_record(time, Level::Warn, "labrador", "Skipped"),
            "12:30:05.042 WARN  [labrador] Skipped"
        );
    }
}
