//! Runtime sync configuration.
//!
//! `SyncSettings` carries the remote API location and the timing knobs used by
//! the HTTP client and the connectivity monitor. Clients layer values from
//! their own sources (CLI flags, profile files) over [`SyncSettings::from_env`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

pub const API_BASE_URL_ENV: &str = "BLOTTER_API_BASE_URL";
pub const HTTP_TIMEOUT_ENV: &str = "BLOTTER_HTTP_TIMEOUT_SECS";
pub const CONNECTIVITY_INTERVAL_ENV: &str = "BLOTTER_CONNECTIVITY_INTERVAL_SECS";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECTIVITY_INTERVAL_SECS: u64 = 15;

/// Resolved sync settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Base URL of the REST backend, e.g. `https://blotter.example.gov.ph`
    pub api_base_url: Option<String>,
    /// Per-request timeout for remote calls
    pub request_timeout: Duration,
    /// How often the connectivity monitor probes the backend
    pub connectivity_interval: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            connectivity_interval: Duration::from_secs(DEFAULT_CONNECTIVITY_INTERVAL_SECS),
        }
    }
}

impl SyncSettings {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let api_base_url = normalize_text_option(lookup(API_BASE_URL_ENV))
            .map(|url| validate_base_url(&url, API_BASE_URL_ENV))
            .transpose()?;

        let request_timeout = parse_secs(lookup(HTTP_TIMEOUT_ENV), HTTP_TIMEOUT_ENV)?
            .unwrap_or(defaults.request_timeout);
        let connectivity_interval =
            parse_secs(lookup(CONNECTIVITY_INTERVAL_ENV), CONNECTIVITY_INTERVAL_ENV)?
                .unwrap_or(defaults.connectivity_interval);

        Ok(Self {
            api_base_url,
            request_timeout,
            connectivity_interval,
        })
    }

    /// Replace the base URL when an override is present.
    pub fn with_api_base_url(mut self, url: Option<String>) -> Result<Self> {
        if let Some(url) = normalize_text_option(url) {
            self.api_base_url = Some(validate_base_url(&url, "api_base_url")?);
        }
        Ok(self)
    }

    #[must_use]
    pub const fn with_connectivity_interval(mut self, interval: Duration) -> Self {
        self.connectivity_interval = interval;
        self
    }

    /// Check if a remote API is configured
    pub const fn is_configured(&self) -> bool {
        self.api_base_url.is_some()
    }
}

/// Trim, require an http(s) scheme, and drop trailing slashes.
pub fn validate_base_url(raw: &str, field: &str) -> Result<String> {
    let value = raw.trim();
    if is_http_url(value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(format!(
            "{field} must include http:// or https://"
        )))
    }
}

fn parse_secs(raw: Option<String>, field: &str) -> Result<Option<Duration>> {
    let Some(raw) = normalize_text_option(raw) else {
        return Ok(None);
    };
    let secs = raw
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{field} must be a whole number of seconds")))?;
    if secs == 0 {
        return Err(Error::Config(format!("{field} must be greater than zero")));
    }
    Ok(Some(Duration::from_secs(secs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let settings = SyncSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, SyncSettings::default());
        assert!(!settings.is_configured());
    }

    #[test]
    fn reads_and_normalizes_values() {
        let settings = SyncSettings::from_lookup(lookup(&[
            (API_BASE_URL_ENV, " https://blotter.example.com/ "),
            (HTTP_TIMEOUT_ENV, "10"),
            (CONNECTIVITY_INTERVAL_ENV, "5"),
        ]))
        .unwrap();

        assert_eq!(
            settings.api_base_url.as_deref(),
            Some("https://blotter.example.com")
        );
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.connectivity_interval, Duration::from_secs(5));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(SyncSettings::from_lookup(lookup(&[(API_BASE_URL_ENV, "blotter.local")])).is_err());
        assert!(SyncSettings::from_lookup(lookup(&[(HTTP_TIMEOUT_ENV, "soon")])).is_err());
        assert!(SyncSettings::from_lookup(lookup(&[(CONNECTIVITY_INTERVAL_ENV, "0")])).is_err());
    }

    #[test]
    fn override_replaces_base_url_only_when_present() {
        let settings = SyncSettings::default()
            .with_api_base_url(Some("http://localhost:3000".to_string()))
            .unwrap();
        assert_eq!(settings.api_base_url.as_deref(), Some("http://localhost:3000"));

        let unchanged = settings.clone().with_api_base_url(Some("  ".to_string())).unwrap();
        assert_eq!(unchanged, settings);
    }
}
