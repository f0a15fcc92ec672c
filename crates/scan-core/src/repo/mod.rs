//! Reconstrucción de sesiones por replay de eventos.
//!
//! Replay lineal: consume los eventos en orden y actualiza un
//! `SessionRecord`. No guarda veredictos completos, sólo conteos.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::aggregator::AggregatedSummary;
use crate::event::{ScanEvent, ScanEventKind};
use crate::model::ArtifactKind;
use crate::session::ScanPhase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub kind: Option<ArtifactKind>,
    pub identifier: String,
    pub engine_count: usize,
    pub phase: ScanPhase,
    pub progress: u8,
    pub progress_done: bool,
    pub verdict_count: Option<usize>,
    pub summary: Option<AggregatedSummary>,
    pub unavailable_engines: usize,
    pub cancelled: bool,
    pub stale_discards: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Trait para reconstruir (`replay`) el estado de una sesión a partir de eventos.
pub trait SessionRepository {
    fn load(&self, session_id: Uuid, events: &[ScanEvent]) -> SessionRecord;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InMemorySessionRepository;

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn load(&self, session_id: Uuid, events: &[ScanEvent]) -> SessionRecord {
        let mut rec = SessionRecord { session_id,
                                      kind: None,
                                      identifier: String::new(),
                                      engine_count: 0,
                                      phase: ScanPhase::Idle,
                                      progress: 0,
                                      progress_done: false,
                                      verdict_count: None,
                                      summary: None,
                                      unavailable_engines: 0,
                                      cancelled: false,
                                      stale_discards: 0,
                                      started_at: None,
                                      finished_at: None };
        for ev in events.iter().filter(|e| e.session_id == session_id) {
            match &ev.kind {
                ScanEventKind::SessionStarted { kind,
                                                identifier,
                                                engine_count, } => {
                    rec.kind = Some(*kind);
                    rec.identifier = identifier.clone();
                    rec.engine_count = *engine_count;
                    rec.phase = ScanPhase::Scanning;
                    rec.started_at = Some(ev.ts);
                }
                ScanEventKind::ProgressAdvanced { progress } => rec.progress = rec.progress.max(*progress),
                ScanEventKind::ProgressCompleted => rec.progress_done = true,
                ScanEventKind::EngineUnavailable { .. } => rec.unavailable_engines += 1,
                ScanEventKind::VerdictsDelivered { verdict_count, summary } => {
                    rec.verdict_count = Some(*verdict_count);
                    rec.summary = Some(*summary);
                }
                ScanEventKind::SessionCompleted { summary } => {
                    rec.phase = ScanPhase::Complete;
                    rec.summary = Some(*summary);
                    rec.finished_at = Some(ev.ts);
                }
                ScanEventKind::SessionCancelled { .. } => {
                    rec.phase = ScanPhase::Idle;
                    rec.cancelled = true;
                    rec.finished_at = Some(ev.ts);
                }
                ScanEventKind::StaleResultDiscarded { .. } => rec.stale_discards += 1,
            }
        }
        rec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventStore, InMemoryEventStore, StaleSource};

    #[test]
    fn replay_of_completed_session() {
        let mut store = InMemoryEventStore::default();
        let id = Uuid::new_v4();
        let summary = AggregatedSummary { clean_count: 14,
                                          suspicious_count: 1,
                                          ..Default::default() };
        store.append_kind(id,
                          ScanEventKind::SessionStarted { kind: ArtifactKind::Hash,
                                                          identifier: "abc".into(),
                                                          engine_count: 15 });
        for p in (10..=100).step_by(10) {
            store.append_kind(id, ScanEventKind::ProgressAdvanced { progress: p });
        }
        store.append_kind(id, ScanEventKind::ProgressCompleted);
        store.append_kind(id, ScanEventKind::VerdictsDelivered { verdict_count: 15, summary });
        store.append_kind(id, ScanEventKind::SessionCompleted { summary });

        let rec = InMemorySessionRepository::new().load(id, &store.list(id));
        assert_eq!(rec.phase, ScanPhase::Complete);
        assert_eq!(rec.progress, 100);
        assert!(rec.progress_done);
        assert_eq!(rec.verdict_count, Some(15));
        assert_eq!(rec.summary.map(|s| s.total()), Some(15));
        assert_eq!(rec.identifier, "abc");
    }

    #[test]
    fn replay_of_cancelled_session_counts_stale_results() {
        let mut store = InMemoryEventStore::default();
        let id = Uuid::new_v4();
        store.append_kind(id,
                          ScanEventKind::SessionStarted { kind: ArtifactKind::Url,
                                                          identifier: "aHR0cA==".into(),
                                                          engine_count: 15 });
        store.append_kind(id, ScanEventKind::ProgressAdvanced { progress: 10 });
        store.append_kind(id, ScanEventKind::SessionCancelled { progress: 10 });
        store.append_kind(id, ScanEventKind::StaleResultDiscarded { source: StaleSource::Verdicts });

        let rec = InMemorySessionRepository::new().load(id, &store.list(id));
        assert_eq!(rec.phase, ScanPhase::Idle);
        assert!(rec.cancelled);
        assert_eq!(rec.stale_discards, 1);
        assert_eq!(rec.verdict_count, None);
    }
}
