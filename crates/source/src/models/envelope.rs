use serde::{Deserialize, Serialize};

use crate::errors::SourceError;
use crate::provider::SourceOperation;

/// Response wrapper returned by every platform endpoint.
///
/// `flag=false` is a logical failure even when the HTTP exchange itself
/// succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub flag: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            flag: true,
            data: Some(data),
            msg: None,
        }
    }

    pub fn failure(msg: Option<String>) -> Self {
        Self {
            flag: false,
            data: None,
            msg,
        }
    }

    pub fn is_success(&self) -> bool {
        self.flag
    }

    /// Unwraps the payload, turning `flag=false` and a missing payload into
    /// logical failures attributed to `operation`.
    pub fn into_payload(self, operation: SourceOperation) -> Result<T, SourceError> {
        if !self.flag {
            return Err(SourceError::Rejected {
                operation,
                message: self.msg,
            });
        }
        self.data
            .ok_or(SourceError::EmptyPayload { operation })
    }
}
