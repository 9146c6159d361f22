//! HTTP client for the blotter REST backend.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{create_route, DeliveryError, DeliveryResult, RemoteApi};
use crate::config::SyncSettings;
use crate::error::{Error, Result};
use crate::models::{
    BlotterReport, EntityType, Evidence, Hearing, PersonHistory, Resolution, Respondent, Suspect,
    User, Witness,
};
use crate::util::{compact_text, is_http_url, normalize_text_option};

const HEALTH_CHECK_TIMEOUT_SECS: u64 = 4;

/// `RemoteApi` over the backend's JSON create endpoints.
///
/// Requests carry no idempotency key, so a retried create that actually
/// reached the server the first time produces a second remote record.
#[derive(Clone)]
pub struct HttpRemoteApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteApi {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|error| Error::Config(format!("failed to build HTTP client: {error}")))?;
        Ok(Self { base_url, client })
    }

    /// Build a client from resolved sync settings.
    pub fn from_settings(settings: &SyncSettings) -> Result<Self> {
        let base_url = settings.api_base_url.clone().ok_or_else(|| {
            Error::Config("api_base_url is required to reach the remote API".to_string())
        })?;
        Self::new(base_url, settings.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the backend answers its health endpoint with a 2xx.
    pub async fn is_reachable(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                tracing::debug!("Health check against {url} failed: {error}");
                false
            }
        }
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        entity_type: EntityType,
        body: &T,
    ) -> DeliveryResult {
        let url = format!("{}/api/{}", self.base_url, create_route(entity_type));

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(DeliveryError::from_status(
                status.as_u16(),
                parse_api_error(status, &text),
            ));
        }

        check_success_body(status, &text)
    }
}

impl RemoteApi for HttpRemoteApi {
    async fn register_user(&self, user: &User) -> DeliveryResult {
        self.post_json(EntityType::User, user).await
    }

    async fn create_report(&self, report: &BlotterReport) -> DeliveryResult {
        self.post_json(EntityType::Report, report).await
    }

    async fn create_respondent(&self, respondent: &Respondent) -> DeliveryResult {
        self.post_json(EntityType::Respondent, respondent).await
    }

    async fn create_suspect(&self, suspect: &Suspect) -> DeliveryResult {
        self.post_json(EntityType::Suspect, suspect).await
    }

    async fn create_witness(&self, witness: &Witness) -> DeliveryResult {
        self.post_json(EntityType::Witness, witness).await
    }

    async fn create_evidence(&self, evidence: &Evidence) -> DeliveryResult {
        self.post_json(EntityType::Evidence, evidence).await
    }

    async fn create_hearing(&self, hearing: &Hearing) -> DeliveryResult {
        self.post_json(EntityType::Hearing, hearing).await
    }

    async fn create_resolution(&self, resolution: &Resolution) -> DeliveryResult {
        self.post_json(EntityType::Resolution, resolution).await
    }

    async fn create_person_history(&self, history: &PersonHistory) -> DeliveryResult {
        self.post_json(EntityType::PersonHistory, history).await
    }
}

/// Backend response envelope. Every field is optional; bare bodies count as success.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    success: Option<bool>,
    message: Option<String>,
    error: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiEnvelope>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return message.trim().to_string();
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed
    }
}

fn check_success_body(status: StatusCode, body: &str) -> DeliveryResult {
    let Ok(envelope) = serde_json::from_str::<ApiEnvelope>(body) else {
        return Ok(());
    };

    if envelope.success == Some(false) {
        let message = envelope
            .message
            .or(envelope.error)
            .map_or_else(|| "request was not accepted".to_string(), |m| m.trim().to_string());
        return Err(DeliveryError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    Ok(())
}

fn normalize_base_url(raw: String) -> Result<String> {
    let base_url = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::Config("api_base_url must not be empty".to_string()))?;
    if is_http_url(&base_url) {
        Ok(base_url.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(
            "api_base_url must include http:// or https://".to_string(),
        ))
    }
}
