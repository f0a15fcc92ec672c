//! Core WorkflowController implementation

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::aggregator::{aggregate, AggregatedSummary};
use crate::errors::ScanError;
use crate::event::{EventStore, InMemoryEventStore, ScanEvent, ScanEventKind, StaleSource};
use crate::model::{ArtifactKind, ArtifactReference, EngineVerdict, RouteParams};
use crate::registry::EngineRegistry;
use crate::schedule::{TickScheduler, TokioTickScheduler};
use crate::session::{ScanPhase, ScanSession, SessionId, SessionSnapshot};
use crate::simulator::{ScanSimulator, SimulationReport};
use crate::tracker::{ProgressTick, ProgressTracker, TrackerHandle};

use super::ControllerBuilder;

/// Mensajes que tracker y simulador envían hacia el controlador.
#[derive(Debug)]
pub(crate) enum ScanMessage {
    Tick { session_id: SessionId, tick: ProgressTick },
    Verdicts { session_id: SessionId, report: SimulationReport },
}

impl ScanMessage {
    fn session_id(&self) -> SessionId {
        match self {
            ScanMessage::Tick { session_id, .. } | ScanMessage::Verdicts { session_id, .. } => *session_id,
        }
    }

    fn source(&self) -> StaleSource {
        match self {
            ScanMessage::Tick { .. } => StaleSource::ProgressTick,
            ScanMessage::Verdicts { .. } => StaleSource::Verdicts,
        }
    }
}

#[derive(Debug)]
struct ActiveScan {
    session: ScanSession,
    tracker: TrackerHandle,
    simulation: JoinHandle<()>,
}

/// Dueño exclusivo de la `ScanSession` actual.
///
/// `submit` debe llamarse dentro de un runtime de Tokio (el simulador corre
/// como tarea).
///
/// El log de eventos retiene la sesión actual y la inmediatamente anterior;
/// las más viejas se eliminan del store al reemplazarse. Al soltar el
/// controlador se cancela el tracker y se aborta el simulador en curso.
#[derive(Debug)]
pub struct WorkflowController<S = TokioTickScheduler, E = InMemoryEventStore>
    where S: TickScheduler,
          E: EventStore
{
    registry: EngineRegistry,
    simulator: Arc<ScanSimulator>,
    tracker: ProgressTracker<S>,
    event_store: E,
    current: Option<ActiveScan>,
    previous: Option<SessionId>,
    tx: UnboundedSender<ScanMessage>,
    rx: UnboundedReceiver<ScanMessage>,
}

impl WorkflowController<TokioTickScheduler, InMemoryEventStore> {
    /// Crea un builder con planificador Tokio y store en memoria.
    #[inline]
    pub fn builder() -> ControllerBuilder<TokioTickScheduler> {
        ControllerBuilder::new()
    }
}

impl<S, E> WorkflowController<S, E>
    where S: TickScheduler,
          E: EventStore
{
    pub(crate) fn from_parts(registry: EngineRegistry,
                             simulator: ScanSimulator,
                             tracker: ProgressTracker<S>,
                             event_store: E)
                             -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { registry,
               simulator: Arc::new(simulator),
               tracker,
               event_store,
               current: None,
               previous: None,
               tx,
               rx }
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Envía una entrada cruda. Si la construcción del artifact falla, el
    /// controlador no cambia de estado.
    pub fn submit(&mut self, kind: ArtifactKind, raw: Option<&str>) -> Result<RouteParams, ScanError> {
        debug!("submit:start kind={kind}");
        match ArtifactReference::submit(kind, raw) {
            Ok(artifact) => Ok(self.start_session(artifact)),
            Err(err) => {
                warn!("submit:rejected kind={kind} error={err}");
                Err(err.into())
            }
        }
    }

    /// Abre una sesión nueva para un artifact ya construido, reemplazando la
    /// actual (si seguía escaneando, se cancela).
    pub fn start_session(&mut self, artifact: ArtifactReference) -> RouteParams {
        self.abandon_current();

        let session = ScanSession::start(artifact.clone(), self.registry.len());
        let session_id = session.id();
        self.event_store.append_kind(session_id,
                                     ScanEventKind::SessionStarted { kind: artifact.kind(),
                                                                     identifier: artifact.identifier().to_string(),
                                                                     engine_count: self.registry.len() });

        let tick_tx = self.tx.clone();
        let tracker = self.tracker.start(move |tick| {
                                       // el receptor vive mientras viva el controlador
                                       let _ = tick_tx.send(ScanMessage::Tick { session_id, tick });
                                   });

        let simulator = Arc::clone(&self.simulator);
        let engines = self.registry.engines().to_vec();
        let verdict_tx = self.tx.clone();
        let target = artifact.clone();
        let simulation = tokio::spawn(async move {
            let report = simulator.simulate_detailed(&target, &engines).await;
            let _ = verdict_tx.send(ScanMessage::Verdicts { session_id, report });
        });

        info!("session:started session={session_id} artifact={artifact} engines={}",
              self.registry.len());
        self.current = Some(ActiveScan { session,
                                        tracker,
                                        simulation });
        RouteParams::from(&artifact)
    }

    /// Sale del flujo: cancela el tracker y vuelve a `Idle`. Devuelve `true`
    /// si se interrumpió un escaneo en curso.
    pub fn cancel(&mut self) -> bool {
        self.abandon_current()
    }

    fn abandon_current(&mut self) -> bool {
        let Some(active) = self.current.take() else {
            return false;
        };
        active.tracker.cancel();
        self.retire(active.session.id());
        if active.session.phase() != ScanPhase::Scanning {
            return false;
        }
        let session_id = active.session.id();
        let progress = active.session.progress();
        self.event_store.append_kind(session_id, ScanEventKind::SessionCancelled { progress });
        info!("session:cancelled session={session_id} progress={progress}");
        true
    }

    /// La sesión saliente pasa a ser la anterior; la anterior previa se
    /// elimina del store.
    fn retire(&mut self, session_id: SessionId) {
        if let Some(older) = self.previous.replace(session_id) {
            let removed = self.event_store.remove(older);
            debug!("events:pruned session={older} removed={removed}");
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.current.as_ref().map_or(ScanPhase::Idle, |a| a.session.phase())
    }

    pub fn progress(&self) -> u8 {
        self.current.as_ref().map_or(0, |a| a.session.progress())
    }

    pub fn verdicts(&self) -> &[EngineVerdict] {
        self.current.as_ref().map(|a| a.session.verdicts()).unwrap_or(&[])
    }

    pub fn summary(&self) -> AggregatedSummary {
        aggregate(self.verdicts())
    }

    pub fn session(&self) -> Option<&ScanSession> {
        self.current.as_ref().map(|a| &a.session)
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session().map(ScanSession::id)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session()
            .map(ScanSession::snapshot)
            .unwrap_or_else(|| SessionSnapshot::idle(self.registry.len()))
    }

    /// Eventos registrados para una sesión (actual o pasada).
    pub fn events_for(&self, session_id: Uuid) -> Vec<ScanEvent> {
        self.event_store.list(session_id)
    }

    /// Aplica los mensajes ya recibidos sin esperar. Devuelve cuántos se
    /// aplicaron a la sesión actual (los obsoletos no cuentan).
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            match self.apply(message) {
                Ok(_) => applied += 1,
                Err(ScanError::StaleResultDiscarded { .. }) => {}
                Err(err) => warn!("apply:error {err}"),
            }
        }
        applied
    }

    /// Espera al siguiente resultado de la sesión actual y lo aplica.
    pub async fn next_update(&mut self) -> Result<SessionSnapshot, ScanError> {
        loop {
            if self.phase() != ScanPhase::Scanning {
                return Err(ScanError::NoActiveSession);
            }
            let message = self.rx
                              .recv()
                              .await
                              .ok_or_else(|| ScanError::Internal("scan channel closed".into()))?;
            match self.apply(message) {
                Ok(_) => return Ok(self.snapshot()),
                Err(ScanError::StaleResultDiscarded { .. }) => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Espera hasta que la sesión actual complete.
    pub async fn run_to_completion(&mut self) -> Result<SessionSnapshot, ScanError> {
        match self.phase() {
            ScanPhase::Idle => return Err(ScanError::NoActiveSession),
            ScanPhase::Complete => return Ok(self.snapshot()),
            ScanPhase::Scanning => {}
        }
        loop {
            let snapshot = self.next_update().await?;
            if snapshot.phase == ScanPhase::Complete {
                return Ok(snapshot);
            }
        }
    }

    /// Aplica un mensaje. `Ok(true)` si completó la sesión;
    /// `Err(StaleResultDiscarded)` si no pertenece a la sesión actual.
    fn apply(&mut self, message: ScanMessage) -> Result<bool, ScanError> {
        let session_id = message.session_id();
        let Some(active) = self.current.as_mut().filter(|a| a.session.id() == session_id) else {
            let source = message.source();
            debug!("stale:discard session={session_id} source={source:?}");
            if self.event_store.contains(session_id) {
                self.event_store.append_kind(session_id, ScanEventKind::StaleResultDiscarded { source });
            }
            return Err(ScanError::StaleResultDiscarded { session_id });
        };

        let completed = match message {
            ScanMessage::Tick { tick, .. } => {
                debug!("tick session={session_id} progress={}", tick.progress);
                self.event_store.append_kind(session_id,
                                             ScanEventKind::ProgressAdvanced { progress: tick.progress });
                let completed = active.session.apply_progress(tick.progress);
                if tick.completed {
                    self.event_store.append_kind(session_id, ScanEventKind::ProgressCompleted);
                }
                completed
            }
            ScanMessage::Verdicts { report, .. } => {
                for error in report.unavailable {
                    self.event_store.append_kind(session_id, ScanEventKind::EngineUnavailable { error });
                }
                let summary = aggregate(&report.verdicts);
                let verdict_count = report.verdicts.len();
                let completed = active.session.apply_verdicts(report.verdicts)?;
                debug!("verdicts session={session_id} count={verdict_count}");
                self.event_store.append_kind(session_id,
                                             ScanEventKind::VerdictsDelivered { verdict_count, summary });
                completed
            }
        };

        if completed {
            let summary = active.session.summary();
            self.event_store.append_kind(session_id, ScanEventKind::SessionCompleted { summary });
            info!("session:completed session={session_id} malicious={} suspicious={} clean={} undetected={}",
                  summary.malicious_count,
                  summary.suspicious_count,
                  summary.clean_count,
                  summary.undetected_count);
        }
        Ok(completed)
    }
}

impl<S, E> Drop for WorkflowController<S, E>
    where S: TickScheduler,
          E: EventStore
{
    fn drop(&mut self) {
        if let Some(active) = self.current.as_ref() {
            active.simulation.abort();
        }
        self.abandon_current();
    }
}
