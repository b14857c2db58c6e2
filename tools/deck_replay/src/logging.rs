use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use serde_json::json;

pub const LOG_JSON_PATH_ENV: &str = "DECK_REPLAY_LOG_JSON_PATH";

pub struct Logger {
    json_file: Option<File>,
}

impl Logger {
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(LOG_JSON_PATH_ENV).ok();
        Self::new(path.map(PathBuf::from))
    }

    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let json_file = match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("failed to open log file {}", path.display()))?;
                Some(file)
            }
            None => None,
        };
        Ok(Self { json_file })
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        eprintln!("{}", message.as_ref());
        self.event("info", message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        eprintln!("{}", message.as_ref());
        self.event("error", message.as_ref());
    }

    pub fn event(&mut self, level: &str, message: &str) {
        self.write_entry(json!({
            "ts_ms": wall_clock_ms(),
            "level": level,
            "msg": message,
        }));
    }

    /// Appends a structured record (e.g. one replay outcome) to the JSON log.
    pub fn record<T: Serialize>(&mut self, kind: &str, payload: &T) {
        if self.json_file.is_none() {
            return;
        }
        let payload = serde_json::to_value(payload).unwrap_or(serde_json::Value::Null);
        self.write_entry(json!({
            "ts_ms": wall_clock_ms(),
            "level": "info",
            "kind": kind,
            "data": payload,
        }));
    }

    fn write_entry(&mut self, entry: serde_json::Value) {
        let Some(file) = &mut self.json_file else {
            return;
        };
        let _ = writeln!(file, "{entry}");
        let _ = file.flush();
    }
}

fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Forwards the engine's `log` records to stderr.
struct StderrLog;

impl Log for StderrLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static STDERR_LOG: StderrLog = StderrLog;

pub fn init_engine_log(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // A second install (tests) keeps the first backend.
    if log::set_logger(&STDERR_LOG).is_ok() {
        log::set_max_level(level);
    }
}
