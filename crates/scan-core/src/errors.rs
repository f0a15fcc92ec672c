//! Errores específicos del core de escaneo.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::ArtifactKind;

/// Entrada inválida al construir un `ArtifactReference`.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum SubmissionError {
    #[error("please provide input to analyze ({kind} is empty)")]
    EmptyInput { kind: ArtifactKind },
    #[error("unknown artifact kind: {0}")]
    UnknownKind(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum ScanError {
    #[error("submission rejected: {0}")]
    Submission(#[from] SubmissionError),
    #[error("engine {engine} unavailable: {reason}")]
    EngineUnavailable { engine: String, reason: String },
    #[error("stale result discarded for session {session_id}")]
    StaleResultDiscarded { session_id: Uuid },
    #[error("no active scan session")]
    NoActiveSession,
    #[error("invalid engine registry: {0}")]
    InvalidRegistry(String),
    #[error("invalid verdict: {0}")]
    InvalidVerdict(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("internal: {0}")]
    Internal(String),
}
