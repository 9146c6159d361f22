use std::env;
use std::fmt::Write;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use blotter_core::config::SyncSettings;
use blotter_core::models::MAX_RETRIES;
use blotter_core::remote::HttpRemoteApi;
use blotter_core::services::SyncQueueService;
use blotter_core::sync::{ImmediateDelivery, ItemSettlement, PassOutcome, SyncManager};
use blotter_core::util::compact_text;
use blotter_core::SyncQueueItem;
use serde::Serialize;

use crate::config_profiles::{default_config_path, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub const DB_PATH_ENV: &str = "BLOTTER_DB_PATH";

/// The live CLI stack: HTTP delivery plus the same client as reachability probe.
pub type CliSyncManager = SyncManager<HttpRemoteApi, HttpRemoteApi>;

#[derive(Debug, Serialize)]
pub struct QueueListItem {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: String,
    pub action: String,
    pub retry_count: u32,
    pub last_error: Option<String>,
    pub created_at: i64,
    pub created_at_iso: String,
    pub relative_time: String,
}

pub fn queue_item_to_list_item(item: &SyncQueueItem, now_ms: i64) -> QueueListItem {
    QueueListItem {
        id: item.id,
        entity_type: item.entity_type.clone(),
        entity_id: item.entity_id.clone(),
        action: item.action.to_string(),
        retry_count: item.retry_count,
        last_error: item.last_error.clone(),
        created_at: item.created_at,
        created_at_iso: format_timestamp(item.created_at),
        relative_time: format_relative_time(item.created_at, now_ms),
    }
}

pub fn format_queue_lines(items: &[SyncQueueItem], now_ms: i64) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let mut line = format!(
                "#{} {} {} id={} retries={}/{} {}",
                item.id,
                item.action,
                item.entity_type,
                item.entity_id,
                item.retry_count,
                MAX_RETRIES,
                format_relative_time(item.created_at, now_ms)
            );
            if let Some(error) = &item.last_error {
                let single_line = error.split_whitespace().collect::<Vec<_>>().join(" ");
                let _ = write!(line, " last_error=\"{}\"", compact_text(&single_line));
            }
            line
        })
        .collect()
}

pub fn format_pass_outcome(outcome: &PassOutcome, remaining: usize) -> String {
    match outcome {
        PassOutcome::Completed(summary) if summary.attempted == 0 => {
            "Sync queue is empty; nothing to deliver".to_string()
        }
        PassOutcome::Completed(summary) => format!(
            "Sync pass complete: {} attempted, {} delivered, {} retried, {} dropped ({} still queued)",
            summary.attempted, summary.delivered, summary.retried, summary.dropped, remaining
        ),
        PassOutcome::AlreadyRunning => "A sync pass is already running".to_string(),
    }
}

pub fn format_immediate_delivery(item_id: i64, delivery: ImmediateDelivery) -> String {
    match delivery {
        ImmediateDelivery::Settled(ItemSettlement::Delivered) => format!("Delivered #{item_id}"),
        ImmediateDelivery::Settled(ItemSettlement::Retried) => {
            format!("Queued #{item_id} (delivery failed; will retry)")
        }
        ImmediateDelivery::Settled(ItemSettlement::Dropped) => {
            format!("Dropped #{item_id} (rejected by the remote API)")
        }
        ImmediateDelivery::Offline => format!("Queued #{item_id} (remote API unreachable)"),
        ImmediateDelivery::Deferred => format!("Queued #{item_id} (not delivered yet)"),
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else {
        format!("{}w ago", diff / week)
    }
}

/// Snapshot JSON from `file`, or from piped stdin when no file is given.
pub fn read_snapshot(file: Option<&Path>) -> Result<String, CliError> {
    let raw = match file {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => read_piped_stdin()?,
    };
    raw.as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(CliError::EmptySnapshot)
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os(DB_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("blotter")
        .join("blotter.db")
}

pub fn open_queue(db_path: &Path) -> Result<SyncQueueService, CliError> {
    Ok(SyncQueueService::open_path(db_path)?)
}

/// Settings from the environment, with the profile and the flag layered on.
pub fn resolve_settings(
    flag_api_base_url: Option<String>,
    profile: Option<&str>,
) -> Result<SyncSettings, CliError> {
    let config = CliProfilesConfig::load_from_path(&default_config_path()).map_err(CliError::Config)?;
    layer_settings(SyncSettings::from_env()?, &config, profile, flag_api_base_url)
}

/// Flag beats environment, environment beats the profile.
pub fn layer_settings(
    env_settings: SyncSettings,
    config: &CliProfilesConfig,
    profile: Option<&str>,
    flag_api_base_url: Option<String>,
) -> Result<SyncSettings, CliError> {
    let settings = if env_settings.is_configured() {
        env_settings
    } else {
        let profile_name = config.resolve_profile_name(profile);
        let profile_url = config
            .profile(&profile_name)
            .and_then(CliProfile::api_base_url);
        env_settings.with_api_base_url(profile_url)?
    };
    Ok(settings.with_api_base_url(flag_api_base_url)?)
}

pub fn sync_manager(settings: &SyncSettings, db_path: &Path) -> Result<CliSyncManager, CliError> {
    if !settings.is_configured() {
        return Err(CliError::SyncNotConfigured);
    }

    let remote = HttpRemoteApi::from_settings(settings)?;
    let queue = open_queue(db_path)?;
    Ok(SyncManager::new(queue, remote.clone(), remote))
}
