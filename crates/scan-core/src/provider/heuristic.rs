use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{MarkerPredicate, ThreatPredicate, VerdictProvider};
use crate::constants::{BENIGN_SUSPICIOUS_THRESHOLD, GENERIC_SIGNATURE, MALICIOUS_THRESHOLD};
use crate::errors::ScanError;
use crate::model::{ArtifactReference, EngineVerdict};

/// Umbrales sobre la muestra `r ∈ [0,1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Conocido-malo: `r > malicious` => malicious, si no suspicious.
    pub malicious: f64,
    /// Benigno: `r > benign_suspicious` => suspicious, si no clean.
    pub benign_suspicious: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { malicious: MALICIOUS_THRESHOLD,
               benign_suspicious: BENIGN_SUSPICIOUS_THRESHOLD }
    }
}

/// Proveedor sintético: una muestra aleatoria independiente por motor y un
/// predicado que decide la rama.
#[derive(Debug)]
pub struct HeuristicVerdictProvider<P = MarkerPredicate> {
    predicate: P,
    thresholds: Thresholds,
    signature: String,
    rng: Mutex<StdRng>,
}

impl HeuristicVerdictProvider<MarkerPredicate> {
    pub fn new() -> Self {
        Self::with_predicate(MarkerPredicate::default())
    }

    pub fn with_markers<I, S>(markers: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self::with_predicate(MarkerPredicate::new(markers))
    }
}

impl Default for HeuristicVerdictProvider<MarkerPredicate> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ThreatPredicate> HeuristicVerdictProvider<P> {
    pub fn with_predicate(predicate: P) -> Self {
        Self { predicate,
               thresholds: Thresholds::default(),
               signature: GENERIC_SIGNATURE.to_string(),
               rng: Mutex::new(StdRng::from_os_rng()) }
    }

    /// Fija la semilla para obtener secuencias de veredictos repetibles.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Firma de los veredictos `malicious`; no puede quedar en blanco.
    pub fn signature(mut self, signature: impl Into<String>) -> Result<Self, ScanError> {
        let signature = signature.into();
        if signature.trim().is_empty() {
            return Err(ScanError::InvalidSettings("malicious signature must not be blank".into()));
        }
        self.signature = signature.trim().to_string();
        Ok(self)
    }

    /// Clasificación determinista dada la rama y la muestra.
    pub fn classify(&self, engine: &str, known_bad: bool, sample: f64) -> EngineVerdict {
        if known_bad {
            if sample > self.thresholds.malicious {
                EngineVerdict::malicious(engine, self.signature.clone())
            } else {
                EngineVerdict::suspicious(engine, None)
            }
        } else if sample > self.thresholds.benign_suspicious {
            EngineVerdict::suspicious(engine, None)
        } else {
            EngineVerdict::clean(engine)
        }
    }

    fn sample(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random::<f64>()
    }
}

#[async_trait]
impl<P: ThreatPredicate> VerdictProvider for HeuristicVerdictProvider<P> {
    async fn evaluate(&self, artifact: &ArtifactReference, engine: &str) -> Result<EngineVerdict, ScanError> {
        let known_bad = self.predicate.is_known_bad(artifact);
        let sample = self.sample();
        Ok(self.classify(engine, known_bad, sample))
    }
}
