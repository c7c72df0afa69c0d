use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use chrono::Local;
use slog::{Drain, Level, Logger};

use crate::errors::Result;

fn timestamp(io: &mut dyn io::Write) -> io::Result<()> {
    write!(io, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
}

/// Send all log records at `level` or above to the file at `path`, which is
/// truncated first. Every line carries the id of the thread that logged it.
///
/// The returned guard must be kept alive for as long as logging is needed.
pub fn configure_logger(level: Level, path: &Path) -> Result<slog_scope::GlobalLoggerGuard> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let decorator = slog_term::PlainSyncDecorator::new(file);
    let drain = slog_term::FullFormat::new(decorator)
        .use_custom_timestamp(timestamp)
        .build()
        .filter_level(level)
        .fuse();
    let log = Logger::root(
        drain,
        o!("thread" => slog::FnValue(|_| format!("{:x}", thread_id::get()))),
    );
    Ok(slog_scope::set_global_logger(log))
}
