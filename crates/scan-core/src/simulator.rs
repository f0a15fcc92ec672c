//! Simulador de escaneo multi-motor.
//!
//! Espera la latencia configurada y luego pide un veredicto por motor al
//! `VerdictProvider`, en el orden del registro. Un motor que falla (o que
//! devuelve un veredicto a nombre de otro motor) queda como `undetected`; el
//! escaneo nunca falla completo.
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::errors::ScanError;
use crate::model::{ArtifactReference, EngineVerdict};
use crate::provider::VerdictProvider;

/// Resultado de una simulación: veredictos (uno por motor, en orden) y los
/// motores que no pudieron evaluar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    pub verdicts: Vec<EngineVerdict>,
    pub unavailable: Vec<ScanError>,
}

#[derive(Clone)]
pub struct ScanSimulator {
    provider: Arc<dyn VerdictProvider>,
    latency: Duration,
}

impl std::fmt::Debug for ScanSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSimulator").field("latency", &self.latency).finish_non_exhaustive()
    }
}

impl ScanSimulator {
    pub fn new(provider: Arc<dyn VerdictProvider>, latency: Duration) -> Self {
        Self { provider, latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub async fn simulate(&self, artifact: &ArtifactReference, engines: &[String]) -> Vec<EngineVerdict> {
        self.simulate_detailed(artifact, engines).await.verdicts
    }

    pub async fn simulate_detailed(&self, artifact: &ArtifactReference, engines: &[String]) -> SimulationReport {
        debug!("simulate:start artifact={} engines={} latency_ms={}",
               artifact,
               engines.len(),
               self.latency.as_millis());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut verdicts = Vec::with_capacity(engines.len());
        let mut unavailable = Vec::new();
        for engine in engines {
            let verdict = match self.provider.evaluate(artifact, engine).await {
                Ok(v) if v.engine() == engine => match v.validated() {
                    Ok(v) => v,
                    Err(err) => {
                        warn!("simulate:invalid_verdict engine={engine} error={err}");
                        unavailable.push(ScanError::EngineUnavailable { engine: engine.clone(),
                                                                        reason: err.to_string() });
                        EngineVerdict::undetected(engine.as_str())
                    }
                },
                Ok(v) => {
                    let reason = format!("verdict attributed to {}", v.engine());
                    warn!("simulate:engine_mismatch engine={engine} got={}", v.engine());
                    unavailable.push(ScanError::EngineUnavailable { engine: engine.clone(),
                                                                    reason });
                    EngineVerdict::undetected(engine.as_str())
                }
                Err(err) => {
                    warn!("simulate:engine_unavailable engine={engine} error={err}");
                    let reason = match err {
                        ScanError::EngineUnavailable { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    unavailable.push(ScanError::EngineUnavailable { engine: engine.clone(),
                                                                    reason });
                    EngineVerdict::undetected(engine.as_str())
                }
            };
            verdicts.push(verdict);
        }

        debug!("simulate:done artifact={} verdicts={} unavailable={}",
               artifact,
               verdicts.len(),
               unavailable.len());
        SimulationReport { verdicts, unavailable }
    }
}
