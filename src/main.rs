use tracing::{error, info};

mod config;
use config::SplitConfig;

mod core;
use crate::core::run_split;

mod error;
use error::SplitError;

mod infrastructure;
use infrastructure::logging::setup_logging;

fn main() -> Result<(), SplitError> {
    setup_logging();

    let config = SplitConfig::default();

    match run_split(&config) {
        Ok(report) => {
            info!(
                "Finished: {} training and {} validation images",
                report.train.images, report.val.images
            );
            Ok(())
        }
        // Fatal conditions end the run before any output exists; plain return
        Err(e) if e.is_fatal() => {
            error!("FATAL: {}. Halting.", e);
            Ok(())
        }
        Err(e) => {
            error!("Split aborted, output may be partially written: {}", e);
            Err(e)
        }
    }
}
