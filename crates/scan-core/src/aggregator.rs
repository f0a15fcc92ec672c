//! Agregación de veredictos en conteos por clasificación.
//!
//! `aggregate` es pura y total: la suma de los cuatro conteos es siempre
//! igual a la longitud de la entrada (también para la secuencia vacía).
use serde::{Deserialize, Serialize};

use crate::model::{EngineVerdict, VerdictStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedSummary {
    pub malicious_count: usize,
    pub suspicious_count: usize,
    pub clean_count: usize,
    pub undetected_count: usize,
}

/// Nivel de amenaza derivado del resumen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Unknown,
    Clean,
    Suspicious,
    Malicious,
}

impl AggregatedSummary {
    pub fn total(&self) -> usize {
        self.malicious_count + self.suspicious_count + self.clean_count + self.undetected_count
    }

    pub fn count(&self, status: VerdictStatus) -> usize {
        match status {
            VerdictStatus::Malicious => self.malicious_count,
            VerdictStatus::Suspicious => self.suspicious_count,
            VerdictStatus::Clean => self.clean_count,
            VerdictStatus::Undetected => self.undetected_count,
        }
    }

    pub fn threat_level(&self) -> ThreatLevel {
        if self.malicious_count > 0 {
            ThreatLevel::Malicious
        } else if self.suspicious_count > 0 {
            ThreatLevel::Suspicious
        } else if self.clean_count > 0 {
            ThreatLevel::Clean
        } else {
            ThreatLevel::Unknown
        }
    }
}

pub fn aggregate(verdicts: &[EngineVerdict]) -> AggregatedSummary {
    verdicts.iter().fold(AggregatedSummary::default(), |mut acc, v| {
        match v.status() {
            VerdictStatus::Malicious => acc.malicious_count += 1,
            VerdictStatus::Suspicious => acc.suspicious_count += 1,
            VerdictStatus::Clean => acc.clean_count += 1,
            VerdictStatus::Undetected => acc.undetected_count += 1,
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict_for(i: usize) -> EngineVerdict {
        let engine = format!("engine-{i}");
        match i % 4 {
            0 => EngineVerdict::clean(engine),
            1 => EngineVerdict::malicious(engine, "Sig"),
            2 => EngineVerdict::suspicious(engine, None),
            _ => EngineVerdict::undetected(engine),
        }
    }

    #[test]
    fn empty_input_yields_zero_counts() {
        let summary = aggregate(&[]);
        assert_eq!(summary, AggregatedSummary::default());
        assert_eq!(summary.threat_level(), ThreatLevel::Unknown);
    }

    #[test]
    fn counts_always_sum_to_input_length() {
        for n in [0usize, 1, 2, 3, 4, 7, 15, 64] {
            let verdicts: Vec<_> = (0..n).map(verdict_for).collect();
            let summary = aggregate(&verdicts);
            assert_eq!(summary.total(), n, "n={n}");
            let by_status: usize = VerdictStatus::ALL.iter().map(|s| summary.count(*s)).sum();
            assert_eq!(by_status, n);
        }
    }

    #[test]
    fn undetected_only_is_not_clean() {
        let summary = aggregate(&[EngineVerdict::undetected("A"), EngineVerdict::undetected("B")]);
        assert_eq!(summary.undetected_count, 2);
        assert_eq!(summary.threat_level(), ThreatLevel::Unknown);
    }

    #[test]
    fn malicious_dominates_threat_level() {
        let summary = aggregate(&[EngineVerdict::clean("A"),
                                  EngineVerdict::suspicious("B", None),
                                  EngineVerdict::malicious("C", "Sig")]);
        assert_eq!(summary.threat_level(), ThreatLevel::Malicious);
        assert_eq!((summary.clean_count, summary.suspicious_count, summary.malicious_count), (1, 1, 1));
    }
}
