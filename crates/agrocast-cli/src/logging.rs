//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set. Otherwise the level comes from `-v` on top of a
//! per-command base: services log at `info`, one-shot commands at `warn`.
//! Services may also write a plain-text copy to `<log_dir>/<name>.log`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// A type-erased subscriber layer.
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Filter directive for a verbosity count.
pub fn level_for(verbose: u8, base: &'static str) -> &'static str {
    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    let start = LEVELS.iter().position(|l| *l == base).unwrap_or(1);
    LEVELS[(start + usize::from(verbose)).min(LEVELS.len() - 1)]
}

/// Plain-text layer writing to `<dir>/<name>.log`, creating `dir` if needed.
pub fn file_layer(dir: &Path, name: &str) -> Result<(BoxedLayer, WorkerGuard)> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("opening log file in {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((fmt::layer().with_ansi(false).with_writer(writer).boxed(), guard))
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file on drop; keep it alive for the
/// life of the process.
pub fn init(
    verbose: u8,
    base: &'static str,
    json: bool,
    log_file: Option<(&Path, &str)>,
) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, base)));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if json {
        layers.push(fmt::layer().json().boxed());
    } else {
        layers.push(fmt::layer().with_target(false).boxed());
    }

    let guard = match log_file {
        Some((dir, name)) => {
            let (layer, guard) = file_layer(dir, name)?;
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry().with(layers).with(filter).init();
    Ok(guard)
}
