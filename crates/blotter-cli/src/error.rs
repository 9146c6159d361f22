use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] blotter_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No record snapshot provided; pass --file or pipe JSON on stdin")]
    EmptySnapshot,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Remote API is not configured. Run `blotter config init --api-base-url <URL>` or set BLOTTER_API_BASE_URL."
    )]
    SyncNotConfigured,
}
