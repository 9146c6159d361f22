use std::path::Path;

use blotter_core::config::SyncSettings;
use blotter_core::sync::ChangeRecorder;
use blotter_core::util::unix_millis_now;
use blotter_core::{EntityType, SyncAction};

use crate::commands::common::{
    format_immediate_delivery, format_queue_lines, open_queue, queue_item_to_list_item, read_snapshot, sync_manager,
    QueueListItem,
};
use crate::error::CliError;

pub async fn run_queue_list(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let queue = open_queue(db_path)?;
    let items = queue.list_pending().await?;
    let now = unix_millis_now();

    if as_json {
        let json_items = items
            .iter()
            .map(|item| queue_item_to_list_item(item, now))
            .collect::<Vec<QueueListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("Sync queue is empty.");
        return Ok(());
    }

    for line in format_queue_lines(&items, now) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_queue_add(
    entity: EntityType,
    action: SyncAction,
    file: Option<&Path>,
    deliver: bool,
    settings: &SyncSettings,
    db_path: &Path,
) -> Result<(), CliError> {
    let data = read_snapshot(file)?;

    let item = if deliver {
        let manager = sync_manager(settings, db_path)?;
        let recorded = manager.record_snapshot(entity, action, &data).await?;
        println!(
            "{}",
            format_immediate_delivery(recorded.item.id, recorded.delivery)
        );
        recorded.item
    } else {
        let recorder = ChangeRecorder::new(open_queue(db_path)?);
        let item = recorder.record_json(entity, action, &data).await?;
        println!("Queued #{}", item.id);
        item
    };

    tracing::debug!(item_id = item.id, %entity, %action, "Queue add finished");
    Ok(())
}

pub async fn run_queue_clear(db_path: &Path) -> Result<(), CliError> {
    let queue = open_queue(db_path)?;
    let removed = queue.clear().await?;
    println!("Removed {removed} queued item(s)");
    Ok(())
}
