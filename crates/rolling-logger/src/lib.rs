//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to stderr and to a size-rotated
//! log file, and keeps the most recent lines in a circular buffer so the app
//! can show them without reading the file back.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Rotate the active file once it grows past this many bytes
pub const DEFAULT_MAX_BYTES: u64 = 2 * 1024 * 1024;
/// Number of rotated files kept next to the active one
pub const DEFAULT_MAX_FILES: usize = 3;
/// Lines kept in memory for `recent_lines`
pub const RECENT_CAPACITY: usize = 200;

static RECENT: OnceLock<Mutex<VecDeque<String>>> = OnceLock::new();

fn recent() -> &'static Mutex<VecDeque<String>> {
    RECENT.get_or_init(|| Mutex::new(VecDeque::with_capacity(RECENT_CAPACITY)))
}

fn remember(line: &str) {
    if let Ok(mut buf) = recent().lock() {
        if buf.len() == RECENT_CAPACITY {
            buf.pop_front();
        }
        buf.push_back(line.to_string());
    }
}

/// Most recent log lines, oldest first
pub fn recent_lines() -> Vec<String> {
    recent()
        .lock()
        .map(|buf| buf.iter().cloned().collect())
        .unwrap_or_default()
}

/// File writer that rotates `<name>.log` -> `<name>.log.1` -> ... when full
pub struct RollingFile {
    dir: PathBuf,
    base_name: String,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
}

impl RollingFile {
    pub fn open(dir: &Path, base_name: &str, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", base_name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            dir: dir.to_path_buf(),
            base_name: base_name.to_string(),
            max_bytes,
            max_files,
            file,
            written,
        })
    }

    pub fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.base_name))
    }

    fn rotated_path(&self, n: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.base_name, n))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.max_files == 0 {
            self.file = File::create(self.active_path())?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.rotated_path(self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.max_files).rev() {
            let from = self.rotated_path(n);
            if from.exists() {
                fs::rename(&from, self.rotated_path(n + 1))?;
            }
        }
        fs::rename(self.active_path(), self.rotated_path(1))?;

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.active_path())?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;

        for line in String::from_utf8_lossy(&buf[..n]).lines() {
            if !line.trim().is_empty() {
                remember(line);
            }
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging to `<log_dir>/<app_name>.log` and stderr.
///
/// Also bridges records emitted through the `log` crate.
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    let mut file = RollingFile::open(&log_dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES)
        .map_err(|e| format!("Failed to open log file in {}: {}", log_dir.display(), e))?;

    writeln!(
        file,
        "=== {} started at {} ===",
        app_name,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
    )
    .map_err(|e| e.to_string())?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));
    let stderr_layer = fmt::layer().with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))
}

/// Initialize stderr-only logging (CLI runs without a log dir)
pub fn init_stderr() -> Result<(), String> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))
}

pub fn info(msg: &str) -> Result<(), String> {
    log::info!("{}", msg);
    remember(msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    log::error!("{}", msg);
    remember(msg);
    Ok(())
}
