use log::{LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::Mutex;

const MAX_LOGS: usize = 100;

/// Global log storage, shown in the log pane
static LOGS: Mutex<VecDeque<String>> = Mutex::new(VecDeque::new());

static LOGGER: BufferLogger = BufferLogger;

/// `log` backend that keeps the most recent records in memory. Writing to
/// stderr would corrupt the raw-mode screen.
struct BufferLogger;

impl Log for BufferLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        push(format_record(record.level(), &record.args().to_string()));
    }

    fn flush(&self) {}
}

fn format_record(level: log::Level, message: &str) -> String {
    let timestamp = chrono::Local::now().format("%H:%M:%S");
    format!("[{}] {:<5} {}", timestamp, level, message)
}

fn push(line: String) {
    if let Ok(mut logs) = LOGS.lock() {
        logs.push_back(line);
        while logs.len() > MAX_LOGS {
            logs.pop_front();
        }
    }
}

/// Install the buffer logger. Safe to call more than once.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Get recent logs for display, newest first
pub fn get_recent_logs(count: usize) -> Vec<String> {
    if let Ok(logs) = LOGS.lock() {
        logs.iter().rev().take(count).cloned().collect()
    } else {
        Vec::new()
    }
}
