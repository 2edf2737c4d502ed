use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

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
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug => web_sys::console::debug_1(&msg),
            Level::Trace => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

/// Route `log` output to the browser console at `level` ("off", "error", ..., "trace").
/// Returns `false` for an unknown level. Calling again only changes the level.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> bool {
    let Ok(filter) = level.parse::<LevelFilter>() else {
        return false;
    };
    // Already installed on repeat calls
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
    true
}
