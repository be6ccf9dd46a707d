//! Error types for document operations.
//!
//! Input-contract violations (malformed activity codes, paths into scalar
//! values, documents without a venue) surface here and are propagated to the
//! caller unchanged. Degenerate-but-valid data never produces an error.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by document transformations and scorecard rendering.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid activity code: {code:?}")]
    InvalidActivityCode { code: String },

    #[error("Path segment {segment:?} does not address a container")]
    NotAContainer { segment: String },

    #[error("Competition {competition_id} has no venue")]
    NoVenue { competition_id: String },

    #[error("Malformed {namespace} extension data: {source}")]
    Extension {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No expected competitors given for round {round_id}")]
    MissingExpectedCompetitors { round_id: String },

    #[error("Failed to fetch image {url}: {reason}")]
    ImageFetch { url: String, reason: String },

    #[error("Rendering {file_name} failed: {reason}")]
    Render { file_name: String, reason: String },
}

impl Error {
    pub(crate) fn invalid_code(code: impl Into<String>) -> Self {
        Self::InvalidActivityCode { code: code.into() }
    }

    pub(crate) fn not_a_container(segment: impl Into<String>) -> Self {
        Self::NotAContainer {
            segment: segment.into(),
        }
    }
}
