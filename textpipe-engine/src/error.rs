//! Error types for the pipeline model and the import/export boundary
//!
//! Executors have no error type: malformed step configuration is recovered inside the
//! operation. Errors only exist where a caller has to react, when a pipeline is not ready to
//! be saved or applied, and when an untrusted export file is rejected.

use crate::pipeline::validation::PipelineAction;
use thiserror::Error;

/// A pipeline is not ready for the requested action
///
/// The `Display` output is the user facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a pipeline name")]
    MissingName,

    #[error("Add at least one step before {}", .0.verb())]
    NoSteps(PipelineAction),

    #[error("Step id '{0}' is used more than once")]
    DuplicateStepId(String),
}

/// Errors raised at the persistence boundary
///
/// Import never reports field level detail: everything that parses as JSON but does not
/// match the envelope schema is `InvalidFormat`.
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("Invalid JSON format")]
    InvalidJson,

    #[error("Invalid configuration format")]
    InvalidFormat,

    #[error("Could not serialize pipelines: {0}")]
    Serialize(#[from] serde_json::Error),
}
