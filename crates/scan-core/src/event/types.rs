//! Tipos de evento de una sesión de escaneo.
//!
//! El controlador emite un evento por cada transición a un `EventStore`
//! append-only; `SessionRepository` reconstruye el estado por replay.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregator::AggregatedSummary;
use crate::errors::ScanError;
use crate::model::ArtifactKind;

/// Origen de un resultado descartado por obsoleto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaleSource {
    ProgressTick,
    Verdicts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanEventKind {
    /// Primer evento de toda sesión.
    SessionStarted {
        kind: ArtifactKind,
        identifier: String,
        engine_count: usize,
    },
    ProgressAdvanced { progress: u8 },
    /// El tracker llegó a 100 (señal única).
    ProgressCompleted,
    /// Un motor no pudo evaluar y quedó como `undetected`.
    EngineUnavailable { error: ScanError },
    VerdictsDelivered {
        verdict_count: usize,
        summary: AggregatedSummary,
    },
    /// Barrera liberada: progreso completo y veredictos entregados.
    SessionCompleted { summary: AggregatedSummary },
    /// Sesión abandonada antes de completar (cancelación o reemplazo).
    SessionCancelled { progress: u8 },
    /// Resultado tardío para una sesión que ya no es la actual.
    StaleResultDiscarded { source: StaleSource },
}

impl ScanEventKind {
    /// Etiqueta compacta, útil en trazas y tests.
    pub fn code(&self) -> &'static str {
        match self {
            ScanEventKind::SessionStarted { .. } => "S",
            ScanEventKind::ProgressAdvanced { .. } => "P",
            ScanEventKind::ProgressCompleted => "D",
            ScanEventKind::EngineUnavailable { .. } => "U",
            ScanEventKind::VerdictsDelivered { .. } => "V",
            ScanEventKind::SessionCompleted { .. } => "C",
            ScanEventKind::SessionCancelled { .. } => "X",
            ScanEventKind::StaleResultDiscarded { .. } => "Z",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub seq: u64, // orden de append dentro de la sesión
    pub session_id: Uuid,
    pub kind: ScanEventKind,
    pub ts: DateTime<Utc>,
}
