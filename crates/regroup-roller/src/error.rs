//! Roller error types.

use regroup_core::{ConfigError, ProviderError};
use thiserror::Error;

/// Result type alias for pass operations.
pub type RollerResult<T> = Result<T, RollerError>;

/// Fatal failures of a pass, all raised before anything is terminated.
#[derive(Debug, Error)]
pub enum RollerError {
    /// The group carries no launch configuration to judge staleness against.
    #[error("group {0} has no active launch configuration")]
    NoActiveConfig(String),

    #[error("settings error: {0}")]
    Settings(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
