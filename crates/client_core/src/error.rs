//! Failure taxonomy for record operations.

use shared::domain::{DiseaseId, DraftField};
use thiserror::Error;

/// A required draft field was blank. Detected locally; never sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("please fill in the {field}")]
pub struct ValidationError {
    pub field: DraftField,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("disease {0} not found")]
    NotFound(DiseaseId),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Malformed(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The collaborator acknowledged the change but the follow-up reload
    /// failed; the local collection still holds the pre-change snapshot.
    #[error("change was saved but reloading the list failed: {0}")]
    Resync(TransportError),
}

impl ClientError {
    /// Whether the collaborator accepted the mutation before the failure.
    pub fn mutation_acknowledged(&self) -> bool {
        matches!(self, ClientError::Resync(_))
    }
}
