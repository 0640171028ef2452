//! Setup shared by the demos.

use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

/// Send logs to the file named by `PULSE_LOG`, if set.
///
/// The terminal belongs to the UI, so logs never go to stdout or stderr.
/// Filter with `RUST_LOG`, e.g. `RUST_LOG=pulse=trace`.
pub fn init_logging() {
    let Some(path) = std::env::var_os("PULSE_LOG") else {
        return;
    };
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("cannot open log file {}: {err}", path.to_string_lossy());
            return;
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pulse=debug"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(file_layer).init();
}
