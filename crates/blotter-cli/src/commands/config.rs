use std::env;
use std::path::Path;

use blotter_core::config::{validate_base_url, SyncSettings, API_BASE_URL_ENV};
use blotter_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::commands::common::layer_settings;
use crate::config_profiles::{default_config_path, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(
    command: ConfigCommands,
    global_profile: Option<&str>,
    api_base_url: Option<String>,
) -> Result<(), CliError> {
    let path = default_config_path();
    match command {
        ConfigCommands::Init { no_activate } => {
            let profile_name = run_config_init(&path, global_profile, api_base_url, no_activate)?;
            println!(
                "Profile '{}' initialized at {}",
                profile_name,
                path.display()
            );
            if no_activate {
                println!("Active profile unchanged; pass --profile {profile_name} to use it");
            }
        }
        ConfigCommands::Show => {
            let config = CliProfilesConfig::load_from_path(&path).map_err(CliError::Config)?;
            let settings =
                layer_settings(SyncSettings::from_env()?, &config, global_profile, api_base_url)?;
            for line in render_config_show(&config, &path, &settings) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Create or update a profile's API base URL; returns the profile name.
///
/// The URL comes from the flag, then `BLOTTER_API_BASE_URL`, then whatever
/// the profile already holds.
pub fn run_config_init(
    path: &Path,
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    no_activate: bool,
) -> Result<String, CliError> {
    let mut config = CliProfilesConfig::load_from_path(path).map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_url = config
        .profile(&profile_name)
        .and_then(CliProfile::api_base_url);

    let api_base_url = normalize_text_option(api_base_url)
        .or_else(|| normalize_text_option(env::var(API_BASE_URL_ENV).ok()))
        .or(existing_url)
        .ok_or_else(|| {
            CliError::Config("api_base_url is required; pass --api-base-url <URL>".to_string())
        })?;
    let api_base_url = validate_base_url(&api_base_url, "api_base_url")?;

    config.profile_mut_or_default(&profile_name).api_base_url = Some(api_base_url);
    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    config.save_to_path(path).map_err(CliError::Config)?;
    Ok(profile_name)
}

pub fn render_config_show(
    config: &CliProfilesConfig,
    path: &Path,
    settings: &SyncSettings,
) -> Vec<String> {
    let active = config.active_profile.as_deref();
    let mut lines = vec![
        format!("Config file: {}", path.display()),
        format!("Active profile: {}", active.unwrap_or("(none)")),
    ];

    if config.profiles.is_empty() {
        lines.push("Profiles: (none)".to_string());
    } else {
        lines.push("Profiles:".to_string());
        for (name, profile) in &config.profiles {
            let marker = if Some(name.as_str()) == active { '*' } else { ' ' };
            let url = profile
                .api_base_url()
                .unwrap_or_else(|| "(no api_base_url)".to_string());
            lines.push(format!("  {marker} {name} {url}"));
        }
    }

    lines.push(format!(
        "Effective API base URL: {}",
        settings.api_base_url.as_deref().unwrap_or("(not configured)")
    ));
    lines.push(format!(
        "Request timeout: {}s",
        settings.request_timeout.as_secs()
    ));
    lines.push(format!(
        "Connectivity interval: {}s",
        settings.connectivity_interval.as_secs()
    ));
    lines
}
