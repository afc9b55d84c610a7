//! Captures log records emitted on the current thread, for assertions in tests.

use std::{cell::RefCell, sync::Once};

use log::{Level, LevelFilter, Log, Metadata, Record};

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static INITIALIZE: Once = Once::new();

/// Runs `f` and returns what it logged on this thread.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<(Level, String)>) {
    INITIALIZE.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });

    RECORDS.with(|records| records.borrow_mut().clear());

    let result = f();

    (result, RECORDS.with(RefCell::take))
}

/// Messages logged at `level`.
pub fn messages_at(records: &[(Level, String)], level: Level) -> Vec<&str> {
    records
        .iter()
        .filter(|(record_level, _)| *record_level == level)
        .map(|(_, message)| message.as_str())
        .collect()
}
