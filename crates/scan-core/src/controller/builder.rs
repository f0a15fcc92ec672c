use std::sync::Arc;

use crate::event::{EventStore, InMemoryEventStore};
use crate::provider::{HeuristicVerdictProvider, VerdictProvider};
use crate::registry::EngineRegistry;
use crate::schedule::{TickScheduler, TokioTickScheduler};
use crate::settings::ScanSettings;
use crate::simulator::ScanSimulator;
use crate::tracker::ProgressTracker;

use super::WorkflowController;

/// Ensambla un `WorkflowController`. Sin proveedor explícito se usa el
/// heurístico con los marcadores (y la semilla, si hay) de los settings.
pub struct ControllerBuilder<S: TickScheduler> {
    scheduler: S,
    registry: EngineRegistry,
    provider: Option<Arc<dyn VerdictProvider>>,
    settings: ScanSettings,
}

impl ControllerBuilder<TokioTickScheduler> {
    pub fn new() -> Self {
        Self { scheduler: TokioTickScheduler,
               registry: EngineRegistry::default(),
               provider: None,
               settings: ScanSettings::default() }
    }
}

impl Default for ControllerBuilder<TokioTickScheduler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TickScheduler> ControllerBuilder<S> {
    pub fn scheduler<T: TickScheduler>(self, scheduler: T) -> ControllerBuilder<T> {
        ControllerBuilder { scheduler,
                            registry: self.registry,
                            provider: self.provider,
                            settings: self.settings }
    }

    pub fn registry(mut self, registry: EngineRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn provider(mut self, provider: Arc<dyn VerdictProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn settings(mut self, settings: ScanSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> WorkflowController<S, InMemoryEventStore> {
        self.build_with_store(InMemoryEventStore::default())
    }

    pub fn build_with_store<E: EventStore>(self, store: E) -> WorkflowController<S, E> {
        let settings = self.settings;
        let provider = self.provider.unwrap_or_else(|| {
                                        let heuristic =
                                            HeuristicVerdictProvider::with_markers(settings.known_bad_markers.clone());
                                        let heuristic = match settings.seed {
                                            Some(seed) => heuristic.seeded(seed),
                                            None => heuristic,
                                        };
                                        Arc::new(heuristic) as Arc<dyn VerdictProvider>
                                    });
        let simulator = ScanSimulator::new(provider, settings.latency);
        let tracker = ProgressTracker::new(self.scheduler, settings.cadence);
        WorkflowController::from_parts(self.registry, simulator, tracker, store)
    }
}

impl<S: TickScheduler> std::fmt::Debug for ControllerBuilder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerBuilder")
         .field("registry", &self.registry)
         .field("settings", &self.settings)
         .finish_non_exhaustive()
    }
}
