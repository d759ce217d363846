//! Typed error hierarchy for the goopspec engine.
//!
//! `StoreError` covers every failure the external state store can surface.
//! Nothing in this crate lets a `StoreError` abort the host's action: the
//! engine logs and degrades to "no enforcement effect" instead.

use thiserror::Error;

use crate::workflow::WorkflowPhase;

/// Errors from the external state store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("State store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Transition {from} → {to} is not in the phase table")]
    InvalidTransition {
        from: WorkflowPhase,
        to: WorkflowPhase,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
