//! Tracing subscriber setup.
//!
//! Two sinks:
//! - **Console** on stderr, filtered by `RUST_LOG` (default `info`). Stdout
//!   stays reserved for command output.
//! - **File** (optional), no ANSI colours, debug level for futbot crates and
//!   warn for everything else. Rolled over at startup once it reaches
//!   10 MB; the five most recent rolled files (`futbot.log.1` newest) are kept.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::CliError;

const CONSOLE_DEFAULT_FILTER: &str = "info";
const FILE_FILTER: &str = "warn,futbot=debug,futbot_core=debug";
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;
const RETAINED_LOGS: usize = 5;

/// Install the global subscriber. Call once, before any command runs.
pub fn init(log_file: Option<&Path>) -> Result<(), CliError> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(CONSOLE_DEFAULT_FILTER));
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let file = match log_file {
        Some(path) => Some(file_layer(path)?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(file)
        .with(console)
        .try_init()
        .map_err(|error| CliError::Logging(error.to_string()))
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn file_layer(path: &Path) -> Result<BoxedLayer, CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    rotate(path, MAX_LOG_BYTES, RETAINED_LOGS)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Ok(tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new(FILE_FILTER))
        .boxed())
}

/// Shift `path` to `path.1` (and `path.N` to `path.N+1`) when it has reached
/// `max_bytes`, dropping anything beyond `retained`.
fn rotate(path: &Path, max_bytes: u64, retained: usize) -> io::Result<()> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.len() >= max_bytes => {}
        Ok(_) => return Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(error),
    }

    if retained == 0 {
        return fs::remove_file(path);
    }

    match fs::remove_file(rolled_path(path, retained)) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => return Err(error),
        _ => {}
    }
    for index in (1..retained).rev() {
        let from = rolled_path(path, index);
        if from.exists() {
            fs::rename(&from, rolled_path(path, index + 1))?;
        }
    }
    fs::rename(path, rolled_path(path, 1))
}

fn rolled_path(path: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{index}"));
    PathBuf::from(name)
}
