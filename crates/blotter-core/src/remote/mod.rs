//! Remote API delivery contract.
//!
//! The sync processor only knows this trait: one create call per entity type,
//! each answering success or a classified [`DeliveryError`].

mod http;

use std::future::Future;

use thiserror::Error;

use crate::models::{
    BlotterReport, EntityType, Evidence, Hearing, PersonHistory, Resolution, Respondent, Suspect,
    User, Witness,
};

pub use http::HttpRemoteApi;

/// Whether another attempt at the same delivery could succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Counted against the item's retry budget; dropped once it runs out
    Retryable,
    /// The backend refused the payload; retrying cannot help
    Permanent,
}

/// Why a single queue item could not be delivered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Remote request failed: {0}")]
    Transport(String),
    #[error("Remote server error: {message} ({status})")]
    Server { status: u16, message: String },
    #[error("Remote rejected payload: {message} ({status})")]
    Rejected { status: u16, message: String },
    #[error("Invalid queued snapshot: {0}")]
    Decode(String),
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),
}

impl DeliveryError {
    pub const fn retry_class(&self) -> RetryClass {
        match self {
            Self::Rejected { .. } => RetryClass::Permanent,
            Self::Transport(_)
            | Self::Server { .. }
            | Self::Decode(_)
            | Self::UnknownEntityType(_) => RetryClass::Retryable,
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            408 | 429 | 500..=599 => Self::Server { status, message },
            _ => Self::Rejected { status, message },
        }
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return Self::from_status(status.as_u16(), error.to_string());
        }
        Self::Transport(error.to_string())
    }
}

pub type DeliveryResult = Result<(), DeliveryError>;

/// Create endpoints of the remote backend, one per entity type.
pub trait RemoteApi: Send + Sync {
    fn register_user(&self, user: &User) -> impl Future<Output = DeliveryResult> + Send;

    fn create_report(&self, report: &BlotterReport)
        -> impl Future<Output = DeliveryResult> + Send;

    fn create_respondent(
        &self,
        respondent: &Respondent,
    ) -> impl Future<Output = DeliveryResult> + Send;

    fn create_suspect(&self, suspect: &Suspect) -> impl Future<Output = DeliveryResult> + Send;

    fn create_witness(&self, witness: &Witness) -> impl Future<Output = DeliveryResult> + Send;

    fn create_evidence(&self, evidence: &Evidence)
        -> impl Future<Output = DeliveryResult> + Send;

    fn create_hearing(&self, hearing: &Hearing) -> impl Future<Output = DeliveryResult> + Send;

    fn create_resolution(
        &self,
        resolution: &Resolution,
    ) -> impl Future<Output = DeliveryResult> + Send;

    fn create_person_history(
        &self,
        history: &PersonHistory,
    ) -> impl Future<Output = DeliveryResult> + Send;
}

/// Backend route for an entity type's create call, relative to `/api`.
pub const fn create_route(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::User => "users/register",
        EntityType::Report => "reports",
        EntityType::Respondent => "respondents",
        EntityType::Suspect => "suspects",
        EntityType::Witness => "witnesses",
        EntityType::Evidence => "evidence",
        EntityType::Hearing => "hearings",
        EntityType::Resolution => "resolutions",
        EntityType::PersonHistory => "person-history",
    }
}
