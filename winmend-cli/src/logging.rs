//! Tracing setup: a stderr layer plus an append-only run log file.
//!
//! The file layer is installed at startup with no file behind it; events are
//! dropped until [`RunLog::attach`] opens the log for the current run.

use anyhow::Context;
use camino::Utf8Path;
use fs_err::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Shared handle to the run log file.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    file: Arc<Mutex<Option<File>>>,
}

impl RunLog {
    /// Open `path` for appending, creating its directory, and route file events to it.
    pub fn attach(&self, path: &Utf8Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            fs_err::create_dir_all(parent)
                .with_context(|| format!("create log dir {}", parent))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path))?;
        *self.lock() = Some(file);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct RunLogWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for RunLogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RunLog {
    type Writer = RunLogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RunLogWriter(self.lock())
    }
}

/// Install the global subscriber. Stderr honours `RUST_LOG` (default `info`);
/// the run log always records `info` and above.
pub fn init(run_log: RunLog) {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(stderr_filter);
    let file = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(run_log)
        .with_filter(LevelFilter::INFO);

    tracing_subscriber::registry().with(stderr).with(file).init();
}
