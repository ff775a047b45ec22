//! Per-cycle diagnostics.

use chrono::NaiveDateTime;
use serde::Serialize;

use powerwatch_source::{FailureKind, SourceError, SourceOperation};

/// How one operation ended in a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationStatus {
    Succeeded { fields: usize },
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub operation: SourceOperation,
    #[serde(flatten)]
    pub status: OperationStatus,
}

impl OperationReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, OperationStatus::Succeeded { .. })
    }
}

/// Outcome of every polled operation in one cycle, in poll order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub started_at: NaiveDateTime,
    pub operations: Vec<OperationReport>,
}

impl CycleReport {
    pub fn new(started_at: NaiveDateTime) -> Self {
        Self {
            started_at,
            operations: Vec::with_capacity(SourceOperation::POLLED.len()),
        }
    }

    pub fn record_success(&mut self, operation: SourceOperation, fields: usize) {
        self.operations.push(OperationReport {
            operation,
            status: OperationStatus::Succeeded { fields },
        });
    }

    pub fn record_failure(&mut self, error: &SourceError) {
        self.operations.push(OperationReport {
            operation: error.operation(),
            status: OperationStatus::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
        });
    }

    pub fn any_succeeded(&self) -> bool {
        self.operations.iter().any(OperationReport::is_success)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &OperationReport> {
        self.operations.iter().filter(|r| r.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &OperationReport> {
        self.operations.iter().filter(|r| !r.is_success())
    }

    /// Failure messages joined for logs and error display.
    pub fn failure_summary(&self) -> String {
        self.failed()
            .filter_map(|r| match &r.status {
                OperationStatus::Failed { message, .. } => Some(message.as_str()),
                OperationStatus::Succeeded { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
