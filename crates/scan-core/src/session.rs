//! Sesión de escaneo y barrera de completado.
//!
//! La sesión pertenece al controlador; tracker y simulador sólo reportan
//! hacia arriba. `phase == Complete` si y sólo si `progress == 100` y los
//! veredictos están completos (uno por motor del registro).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregator::{aggregate, AggregatedSummary};
use crate::constants::PROGRESS_CEILING;
use crate::errors::ScanError;
use crate::model::{ArtifactKind, ArtifactReference, EngineVerdict};

pub type SessionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPhase {
    Idle,
    Scanning,
    Complete,
}

/// Barrera de dos banderas: se libera una sola vez, cuando llegaron ambas
/// señales, en cualquier orden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionBarrier {
    progress_done: bool,
    verdicts_done: bool,
    released: bool,
}

impl CompletionBarrier {
    /// Devuelve `true` sólo en la llegada que libera la barrera.
    pub fn arrive_progress(&mut self) -> bool {
        self.progress_done = true;
        self.try_release()
    }

    pub fn arrive_verdicts(&mut self) -> bool {
        self.verdicts_done = true;
        self.try_release()
    }

    fn try_release(&mut self) -> bool {
        if self.progress_done && self.verdicts_done && !self.released {
            self.released = true;
            true
        } else {
            false
        }
    }

    pub fn progress_done(&self) -> bool {
        self.progress_done
    }

    pub fn verdicts_done(&self) -> bool {
        self.verdicts_done
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

#[derive(Debug, Clone)]
pub struct ScanSession {
    id: SessionId,
    artifact: ArtifactReference,
    progress: u8,
    phase: ScanPhase,
    verdicts: Vec<EngineVerdict>,
    expected_verdicts: usize,
    barrier: CompletionBarrier,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl ScanSession {
    pub(crate) fn start(artifact: ArtifactReference, expected_verdicts: usize) -> Self {
        Self { id: Uuid::new_v4(),
               artifact,
               progress: 0,
               phase: ScanPhase::Scanning,
               verdicts: Vec::new(),
               expected_verdicts,
               barrier: CompletionBarrier::default(),
               started_at: Utc::now(),
               completed_at: None }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn artifact(&self) -> &ArtifactReference {
        &self.artifact
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn verdicts(&self) -> &[EngineVerdict] {
        &self.verdicts
    }

    pub fn expected_verdicts(&self) -> usize {
        self.expected_verdicts
    }

    pub fn barrier(&self) -> CompletionBarrier {
        self.barrier
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn summary(&self) -> AggregatedSummary {
        aggregate(&self.verdicts)
    }

    /// Aplica un valor de progreso. Nunca retrocede ni supera el techo.
    /// Devuelve `true` si esta llamada completó la sesión.
    pub(crate) fn apply_progress(&mut self, progress: u8) -> bool {
        if self.phase == ScanPhase::Complete {
            return false;
        }
        self.progress = self.progress.max(progress.min(PROGRESS_CEILING));
        if self.progress == PROGRESS_CEILING && !self.barrier.progress_done() {
            let released = self.barrier.arrive_progress();
            return self.finish_if(released);
        }
        false
    }

    /// Aplica la secuencia de veredictos (una sola vez por sesión).
    /// Devuelve `true` si esta llamada completó la sesión.
    pub(crate) fn apply_verdicts(&mut self, verdicts: Vec<EngineVerdict>) -> Result<bool, ScanError> {
        if self.barrier.verdicts_done() {
            return Err(ScanError::Internal(format!("session {} already has verdicts", self.id)));
        }
        if verdicts.len() != self.expected_verdicts {
            return Err(ScanError::Internal(format!("session {} expected {} verdicts, got {}",
                                                   self.id,
                                                   self.expected_verdicts,
                                                   verdicts.len())));
        }
        self.verdicts = verdicts;
        let released = self.barrier.arrive_verdicts();
        Ok(self.finish_if(released))
    }

    fn finish_if(&mut self, released: bool) -> bool {
        if released {
            self.phase = ScanPhase::Complete;
            self.completed_at = Some(Utc::now());
        }
        released
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let scanning_engine_count = if self.verdicts.is_empty() { self.expected_verdicts } else { self.verdicts.len() };
        SessionSnapshot { session_id: Some(self.id),
                          artifact: self.artifact.identifier().to_string(),
                          kind: Some(self.artifact.kind()),
                          phase: self.phase,
                          progress: self.progress,
                          verdicts: self.verdicts.clone(),
                          summary: self.summary(),
                          scanning_engine_count }
    }
}

/// Vista de presentación del estado actual del flujo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Option<SessionId>,
    /// Identificador del artifact; vacío si no hay sesión.
    pub artifact: String,
    pub kind: Option<ArtifactKind>,
    pub phase: ScanPhase,
    pub progress: u8,
    pub verdicts: Vec<EngineVerdict>,
    pub summary: AggregatedSummary,
    /// Motores mostrados durante el escaneo ("Scanning with N engines").
    pub scanning_engine_count: usize,
}

impl SessionSnapshot {
    pub fn idle(engine_count: usize) -> Self {
        Self { session_id: None,
               artifact: String::new(),
               kind: None,
               phase: ScanPhase::Idle,
               progress: 0,
               verdicts: Vec::new(),
               summary: AggregatedSummary::default(),
               scanning_engine_count: engine_count }
    }
}
