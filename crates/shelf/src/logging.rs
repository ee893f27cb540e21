//! Log output setup for binaries and tests embedding the catalog.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber.
///
/// `RUST_LOG` wins when set; otherwise `fallback_level` applies. Calling this
/// more than once is harmless: later calls leave the first subscriber in place.
pub fn init(fallback_level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback_level)
            .with_context(|| format!("invalid log level: {fallback_level}"))?,
    };

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("subscriber already installed");
    }
    Ok(())
}
