//! Registro ordenado de motores de escaneo.
//!
//! El orden es estable: la secuencia de veredictos y cualquier UI posicional
//! dependen de él. Sólo lectura tras construirse.
use std::collections::HashSet;

use crate::errors::ScanError;

/// Motores por defecto, en el orden en que se consultan.
pub const DEFAULT_ENGINES: [&str; 15] = ["ClamAV",
                                         "BitDefender",
                                         "Kaspersky",
                                         "McAfee",
                                         "Norton",
                                         "Avast",
                                         "AVG",
                                         "Sophos",
                                         "TrendMicro",
                                         "F-Secure",
                                         "ESET",
                                         "Malwarebytes",
                                         "Windows Defender",
                                         "Panda",
                                         "Comodo"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRegistry {
    engines: Vec<String>,
}

impl EngineRegistry {
    /// Registro a partir de una lista de nombres. Rechaza nombres vacíos y
    /// duplicados; una lista vacía es válida.
    pub fn new<I, S>(names: I) -> Result<Self, ScanError>
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        let mut seen = HashSet::new();
        let mut engines = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(ScanError::InvalidRegistry("blank engine name".into()));
            }
            if !seen.insert(name.clone()) {
                return Err(ScanError::InvalidRegistry(format!("duplicate engine {name}")));
            }
            engines.push(name);
        }
        Ok(Self { engines })
    }

    pub fn engines(&self) -> &[String] {
        &self.engines
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn position(&self, engine: &str) -> Option<usize> {
        self.engines.iter().position(|e| e == engine)
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self { engines: DEFAULT_ENGINES.iter().map(|e| e.to_string()).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_fifteen_ordered_engines() {
        let registry = EngineRegistry::default();
        assert_eq!(registry.len(), 15);
        assert_eq!(registry.engines()[0], "ClamAV");
        assert_eq!(registry.engines()[14], "Comodo");
        assert_eq!(registry.position("Windows Defender"), Some(12));
    }

    #[test]
    fn rejects_blank_and_duplicate_names() {
        assert!(matches!(EngineRegistry::new(["ClamAV", " "]), Err(ScanError::InvalidRegistry(_))));
        assert!(matches!(EngineRegistry::new(["ESET", "ESET"]), Err(ScanError::InvalidRegistry(_))));
        assert!(EngineRegistry::new(Vec::<String>::new()).unwrap().is_empty());
    }
}
