//! Sync engine error types.
//!
//! Per-entry sync failures are not errors; they are reported through
//! `SyncOutcome`. This enum covers engine setup problems only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Config file error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
