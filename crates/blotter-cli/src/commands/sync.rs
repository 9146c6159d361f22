use std::path::Path;

use blotter_core::config::SyncSettings;

use crate::commands::common::{format_pass_outcome, sync_manager};
use crate::error::CliError;

pub async fn run_sync(settings: &SyncSettings, db_path: &Path) -> Result<(), CliError> {
    let manager = sync_manager(settings, db_path)?;
    let outcome = manager.sync_now().await?;
    let remaining = manager.processor().queue().count().await?;

    println!("{}", format_pass_outcome(&outcome, remaining));
    Ok(())
}
