//! Parámetros del flujo de escaneo (cadencia, latencia, heurística).
use std::time::Duration;

use crate::constants::{KNOWN_BAD_MARKERS, SIMULATED_LATENCY_MS};
use crate::tracker::Cadence;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    pub cadence: Cadence,
    /// Latencia simulada antes de que el simulador resuelva.
    pub latency: Duration,
    /// Subcadenas que marcan un artifact como conocido-malo.
    pub known_bad_markers: Vec<String>,
    /// Semilla opcional del proveedor heurístico.
    pub seed: Option<u64>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self { cadence: Cadence::default(),
               latency: Duration::from_millis(SIMULATED_LATENCY_MS),
               known_bad_markers: KNOWN_BAD_MARKERS.iter().map(|m| m.to_string()).collect(),
               seed: None }
    }
}
