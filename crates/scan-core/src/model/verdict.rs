//! Veredicto de un motor sobre un artifact.
//!
//! Invariante: `signature` sólo existe para `malicious` (obligatoria) o
//! `suspicious` (opcional). Los constructores la garantizan; `new` es la vía
//! validada para backends que entregan campos sueltos.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::GENERIC_SIGNATURE;
use crate::errors::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Clean,
    Malicious,
    Suspicious,
    /// El motor no pudo evaluar el artifact.
    Undetected,
}

impl VerdictStatus {
    pub const ALL: [VerdictStatus; 4] = [VerdictStatus::Malicious,
                                         VerdictStatus::Suspicious,
                                         VerdictStatus::Clean,
                                         VerdictStatus::Undetected];

    pub fn label(&self) -> &'static str {
        match self {
            VerdictStatus::Clean => "clean",
            VerdictStatus::Malicious => "malicious",
            VerdictStatus::Suspicious => "suspicious",
            VerdictStatus::Undetected => "undetected",
        }
    }

    pub fn allows_signature(&self) -> bool {
        matches!(self, VerdictStatus::Malicious | VerdictStatus::Suspicious)
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineVerdict {
    engine: String,
    status: VerdictStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
}

impl EngineVerdict {
    /// Construcción validada.
    pub fn new(engine: impl Into<String>,
               status: VerdictStatus,
               signature: Option<String>)
               -> Result<Self, ScanError> {
        let engine = engine.into();
        let signature = signature.filter(|s| !s.trim().is_empty());
        match (status, &signature) {
            (VerdictStatus::Malicious, None) => {
                Err(ScanError::InvalidVerdict(format!("{engine}: malicious verdict without signature")))
            }
            (VerdictStatus::Clean | VerdictStatus::Undetected, Some(sig)) => {
                Err(ScanError::InvalidVerdict(format!("{engine}: {status} verdict cannot carry signature {sig}")))
            }
            _ => Ok(Self { engine, status, signature }),
        }
    }

    pub fn clean(engine: impl Into<String>) -> Self {
        Self { engine: engine.into(),
               status: VerdictStatus::Clean,
               signature: None }
    }

    /// Una firma en blanco se reemplaza por `GENERIC_SIGNATURE`.
    pub fn malicious(engine: impl Into<String>, signature: impl Into<String>) -> Self {
        let signature = signature.into();
        let trimmed = signature.trim();
        let signature = if trimmed.is_empty() { GENERIC_SIGNATURE } else { trimmed }.to_string();
        Self { engine: engine.into(),
               status: VerdictStatus::Malicious,
               signature: Some(signature) }
    }

    /// Revalida el invariante de firma (veredictos de backends externos).
    pub fn validated(self) -> Result<Self, ScanError> {
        Self::new(self.engine, self.status, self.signature)
    }

    pub fn suspicious(engine: impl Into<String>, signature: Option<String>) -> Self {
        Self { engine: engine.into(),
               status: VerdictStatus::Suspicious,
               signature: signature.filter(|s| !s.trim().is_empty()) }
    }

    pub fn undetected(engine: impl Into<String>) -> Self {
        Self { engine: engine.into(),
               status: VerdictStatus::Undetected,
               signature: None }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn status(&self) -> VerdictStatus {
        self.status
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }
}
