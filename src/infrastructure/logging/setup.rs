use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn, Subscriber};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;

const DEFAULT_FILTER: &str = "yolo_dataset_splitter=info";

/// Install stdout and file logging.
///
/// The log file goes to `logs/dataset_splitter_<timestamp>.log` under the
/// working directory. If it cannot be created, logging continues on stdout
/// only and `None` is returned.
pub fn setup_logging() -> Option<PathBuf> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match open_log_file() {
        Ok((file, log_path)) => {
            build_subscriber(filter, Some(file)).init();
            info!("Log file created at: {:?}", log_path);
            Some(log_path)
        }
        Err(e) => {
            build_subscriber(filter, None).init();
            warn!("Could not create log file, logging to stdout only: {}", e);
            None
        }
    }
}

/// Registry with the bracketed stdout layer and, when given, a file layer
fn build_subscriber(filter: EnvFilter, file: Option<fs::File>) -> impl Subscriber + Send + Sync {
    let file_layer = file.map(|file| {
        fmt::layer()
            .event_format(BracketedFormatter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
    });

    let stdout_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
}

fn open_log_file() -> std::io::Result<(fs::File, PathBuf)> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("dataset_splitter_{}.log", timestamp));

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;

    Ok((file, log_path))
}
