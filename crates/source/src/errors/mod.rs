//! Error types and failure classification for the power data source crate.
//!
//! This module provides:
//! - [`SourceError`]: The error enum for every remote read operation
//! - [`FailureKind`]: Classification into transport, protocol and logical failures

mod kind;

pub use kind::FailureKind;

use thiserror::Error;

use crate::provider::SourceOperation;

/// Errors that can occur while calling a remote read operation.
///
/// Each variant carries the [`SourceOperation`] that produced it so the
/// aggregator can log failures with the operation's identity.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The connection could not be established or broke mid-request.
    #[error("Transport error: {operation} - {message}")]
    Transport {
        /// The operation that failed
        operation: SourceOperation,
        /// Underlying client error
        message: String,
    },

    /// The request did not complete within its time budget.
    #[error("Timeout: {operation}")]
    Timeout {
        /// The operation that timed out
        operation: SourceOperation,
    },

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status}: {operation}")]
    HttpStatus {
        /// The operation that failed
        operation: SourceOperation,
        /// HTTP status code returned by the server
        status: u16,
    },

    /// The response body was not a valid envelope for this operation.
    #[error("Malformed response: {operation} - {message}")]
    Decode {
        /// The operation whose response could not be decoded
        operation: SourceOperation,
        /// Parser error message
        message: String,
    },

    /// The envelope reported `flag=false`.
    #[error("Rejected by server: {operation}{}", message_suffix(.message))]
    Rejected {
        /// The operation that was rejected
        operation: SourceOperation,
        /// Optional server message from the envelope
        message: Option<String>,
    },

    /// The envelope reported success but carried no usable payload.
    #[error("Empty payload: {operation}")]
    EmptyPayload {
        /// The operation with an empty payload
        operation: SourceOperation,
    },
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" - {}", m))
        .unwrap_or_default()
}

impl SourceError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use powerwatch_source::errors::{FailureKind, SourceError};
    /// use powerwatch_source::SourceOperation;
    ///
    /// let error = SourceError::Timeout { operation: SourceOperation::Fees };
    /// assert_eq!(error.kind(), FailureKind::Transport);
    ///
    /// let error = SourceError::Rejected { operation: SourceOperation::Fees, message: None };
    /// assert_eq!(error.kind(), FailureKind::Logical);
    /// ```
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => FailureKind::Transport,
            Self::HttpStatus { .. } | Self::Decode { .. } => FailureKind::Protocol,
            Self::Rejected { .. } | Self::EmptyPayload { .. } => FailureKind::Logical,
        }
    }

    /// The operation this error belongs to.
    pub fn operation(&self) -> SourceOperation {
        match self {
            Self::Transport { operation, .. }
            | Self::Timeout { operation }
            | Self::HttpStatus { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Rejected { operation, .. }
            | Self::EmptyPayload { operation } => *operation,
        }
    }

    /// Maps a reqwest error onto the transport/protocol taxonomy.
    pub(crate) fn from_reqwest(operation: SourceOperation, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { operation }
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                operation,
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::Decode {
                operation,
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                operation,
                message: err.to_string(),
            }
        }
    }
}
