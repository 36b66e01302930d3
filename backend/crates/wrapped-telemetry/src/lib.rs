//! `tracing` setup shared by the wrapped token binaries

use anyhow::anyhow;
use std::{env, io};
use tracing_subscriber::EnvFilter;

const LOG_CONFIGURATION_ENVVAR: &str = "RUST_LOG";

/// Initialize `tracing` with `default_filter`, unless `RUST_LOG` overrides it.
///
/// Logs go to stderr so stdout stays clean for reports.
pub fn init(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(
        env::var(LOG_CONFIGURATION_ENVVAR)
            .as_deref()
            .unwrap_or(default_filter),
    )
    .map_err(|err| anyhow!("invalid log filter: {err}"))?;

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::debug!("telemetry initialized");
    Ok(())
}
