//! Application-level error type for startup and CLI paths.
//!
//! Webhook handlers never surface these to the provider; they log and
//! acknowledge instead.

use thiserror::Error;

use crate::core::{ClipSourceError, EventLogError, LaunchError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ClipSource(#[from] ClipSourceError),

    #[error(transparent)]
    EventLog(#[from] EventLogError),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

pub type AppResult<T> = Result<T, AppError>;
