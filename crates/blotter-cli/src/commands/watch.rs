use std::future::Future;
use std::path::Path;
use std::time::Duration;

use blotter_core::config::SyncSettings;

use crate::commands::common::sync_manager;
use crate::error::CliError;

/// Probe the backend on an interval and deliver on startup and reconnect,
/// until `shutdown` resolves.
pub async fn run_watch(
    settings: &SyncSettings,
    interval_secs: Option<u64>,
    db_path: &Path,
    shutdown: impl Future<Output = ()>,
) -> Result<(), CliError> {
    let interval = match interval_secs {
        Some(0) => {
            return Err(CliError::Config(
                "--interval must be greater than zero".to_string(),
            ))
        }
        Some(secs) => Duration::from_secs(secs),
        None => settings.connectivity_interval,
    };

    let manager = sync_manager(settings, db_path)?;
    let base_url = settings.api_base_url.as_deref().unwrap_or_default();
    println!(
        "Watching {base_url} every {}s; press Ctrl-C to stop",
        interval.as_secs()
    );

    let passes = manager.monitor(interval).run_until(shutdown).await;
    println!("Stopped after {passes} sync pass(es)");
    Ok(())
}
