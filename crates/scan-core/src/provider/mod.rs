//! Proveedores de veredictos.
//!
//! `VerdictProvider` es la costura entre el flujo y la detección real: el
//! simulador, el tracker y el agregador no conocen la implementación. El
//! proveedor heurístico (aleatorio + subcadenas) es un sustituto de demo.

mod heuristic;

use async_trait::async_trait;

use crate::errors::ScanError;
use crate::model::{ArtifactReference, EngineVerdict};

pub use heuristic::{HeuristicVerdictProvider, Thresholds};

/// Evalúa un artifact con un motor concreto.
///
/// Un `Err` significa que el motor no pudo evaluar; el simulador lo degrada a
/// `undetected` sin abortar el escaneo.
#[async_trait]
pub trait VerdictProvider: Send + Sync {
    async fn evaluate(&self, artifact: &ArtifactReference, engine: &str) -> Result<EngineVerdict, ScanError>;
}

/// Predicado intercambiable "¿es un artifact conocido-malo?".
pub trait ThreatPredicate: Send + Sync {
    fn is_known_bad(&self, artifact: &ArtifactReference) -> bool;
}

impl<F> ThreatPredicate for F where F: Fn(&ArtifactReference) -> bool + Send + Sync
{
    fn is_known_bad(&self, artifact: &ArtifactReference) -> bool {
        self(artifact)
    }
}

/// Predicado por subcadenas del identificador.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPredicate {
    markers: Vec<String>,
}

impl MarkerPredicate {
    pub fn new<I, S>(markers: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self { markers: markers.into_iter().map(Into::into).collect() }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl Default for MarkerPredicate {
    fn default() -> Self {
        Self::new(crate::constants::KNOWN_BAD_MARKERS.iter().copied())
    }
}

impl ThreatPredicate for MarkerPredicate {
    fn is_known_bad(&self, artifact: &ArtifactReference) -> bool {
        artifact.contains_any(&self.markers)
    }
}
