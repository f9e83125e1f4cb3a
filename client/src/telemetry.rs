//! Tracing subscriber bootstrap shared by the command-line driver.

use tracing_subscriber::{EnvFilter, fmt};

/// Error returned when a global subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install the global subscriber filtered by `RUST_LOG`.
///
/// `json` selects machine-readable output; otherwise logs are human-readable
/// lines on stderr so they do not interleave with command output.
///
/// # Errors
///
/// Returns an error when a global subscriber has already been set.
pub fn init(json: bool) -> Result<(), InitError> {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}
