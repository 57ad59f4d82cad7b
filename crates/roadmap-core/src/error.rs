//! Error types for the gateway and store layers

use crate::domain::{RoadmapId, SubtopicPath};
use crate::validation::ValidationError;

/// Failure of a single call against the hosted store
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// Store answered with a non-success status
    #[error("store returned {status}: {message}")]
    Http { status: u16, message: String },

    /// Request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// Response arrived but could not be understood
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Store refused the request without reaching the network
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::MalformedResponse(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// Result of a gateway call
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Every way a roadmap operation can fail, as surfaced to the view
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Name is required")]
    EmptyTitle,

    #[error("roadmap {0} not found")]
    NotFound(RoadmapId),

    /// Create still in flight; there is no stored row to write to yet
    #[error("This roadmap is still being saved. Try again in a moment.")]
    NotYetSaved(RoadmapId),

    #[error("no subtopic at topic {} / subtopic {} in roadmap {id}", .path.topic, .path.sub)]
    PathOutOfRange { id: RoadmapId, path: SubtopicPath },

    /// Raw JSON rejected before any state change
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Remote write failed after the local change was applied
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl StoreError {
    /// Network failures happen after an optimistic change; everything else
    /// is rejected before local state is touched
    pub fn is_network(&self) -> bool {
        matches!(self, StoreError::Gateway(_))
    }
}

/// Result of a store operation
pub type StoreResult<T> = Result<T, StoreError>;
