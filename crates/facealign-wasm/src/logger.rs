//! `log` backend that writes to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(
            record.level(),
            record.target(),
            &record.args().to_string(),
        ));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Later calls only reset the level.
pub(crate) fn install(level: LevelFilter) {
    // Err means a logger is already installed, which is fine.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Set the console log level: `off`, `error`, `warn`, `info`, `debug` or `trace`.
///
/// Returns `false` and leaves the level unchanged for an unknown name.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match parse_level(level) {
        Some(filter) => {
            install(filter);
            true
        }
        None => false,
    }
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

fn format_record(level: Level, target: &str, message: &str) -> String {
    format!("[{}] {}: {}", level, target, message)
}
