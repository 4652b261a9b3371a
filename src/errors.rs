use thiserror::Error;
use uuid::Uuid;

use crate::domain::{FieldErrors, RecordKind};
use crate::engine::workflow::{Intent, WorkflowState};

/// Failures raised by a record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} record not found: {id}")]
    NotFound { kind: RecordKind, id: Uuid },
}

/// Failures surfaced to the presentation layer by a workflow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    NotFound(#[from] StoreError),
    #[error("Cannot {intent} while {state}")]
    InvalidTransition { state: WorkflowState, intent: Intent },
}

impl WorkflowError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            WorkflowError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Configuration file failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        CliError::Workflow(WorkflowError::NotFound(err))
    }
}
