//! scan-core: flujo de escaneo multi-motor (envío, progreso, veredictos, resumen)
pub mod aggregator;
pub mod constants;
pub mod controller;
pub mod errors;
pub mod event;
pub mod model;
pub mod provider;
pub mod registry;
pub mod repo;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod simulator;
pub mod tracker;

pub use aggregator::{aggregate, AggregatedSummary, ThreatLevel};
pub use controller::{ControllerBuilder, WorkflowController};
pub use errors::{ScanError, SubmissionError};
pub use event::{EventStore, InMemoryEventStore, ScanEvent, ScanEventKind, StaleSource};
pub use model::{ArtifactKind, ArtifactReference, EngineVerdict, RouteParams, VerdictStatus};
pub use provider::{HeuristicVerdictProvider, MarkerPredicate, ThreatPredicate, Thresholds, VerdictProvider};
pub use registry::{EngineRegistry, DEFAULT_ENGINES};
pub use repo::{InMemorySessionRepository, SessionRecord, SessionRepository};
pub use schedule::{ManualTickScheduler, ScheduleHandle, TickControl, TickScheduler, TokioTickScheduler};
pub use session::{CompletionBarrier, ScanPhase, ScanSession, SessionId, SessionSnapshot};
pub use settings::ScanSettings;
pub use simulator::{ScanSimulator, SimulationReport};
pub use tracker::{Cadence, ProgressTick, ProgressTracker, TrackerHandle};
