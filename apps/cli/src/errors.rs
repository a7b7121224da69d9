use thiserror::Error;

use crate::completion::CompletionError;
use crate::store::StoreError;

/// Application-level error type. Every failure is local to the triggering
/// command: the process stays usable and the in-memory snapshot is never
/// patched after a failed write.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),
}
