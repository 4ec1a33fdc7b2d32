//! Tracing subscriber setup.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global fmt subscriber filtered by `filter`.
///
/// Returns `Ok(false)` when a global subscriber is already installed, so
/// tests and embedding applications may call this more than once.
///
/// # Errors
///
/// Returns [`ParseError`] when `filter` is not a valid directive.
pub fn init(filter: &str) -> Result<bool, ParseError> {
    let env_filter = EnvFilter::try_new(filter)?;
    Ok(fmt().with_env_filter(env_filter).try_init().is_ok())
}
