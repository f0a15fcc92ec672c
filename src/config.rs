//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) una sola vez y las traduce a
//! `ScanSettings` del core.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use scan_core::{Cadence, ScanSettings};

use crate::errors::CoreError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const TICK_INTERVAL_VAR: &str = "PHOENIX_TICK_INTERVAL_MS";
pub const TICK_STEP_VAR: &str = "PHOENIX_TICK_STEP";
pub const LATENCY_VAR: &str = "PHOENIX_SCAN_LATENCY_MS";
pub const MARKERS_VAR: &str = "PHOENIX_KNOWN_BAD_MARKERS";
pub const SEED_VAR: &str = "PHOENIX_RNG_SEED";

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub scan: ScanSettings,
}

impl AppConfig {
    /// Lee la configuración del entorno (previa carga de `.env`).
    pub fn from_env() -> Result<Self, CoreError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = ScanSettings::default();

        let interval = parse_var::<u64, _>(&lookup, TICK_INTERVAL_VAR)?.map(Duration::from_millis)
                                                                      .unwrap_or(defaults.cadence.interval());
        let step = parse_var::<u8, _>(&lookup, TICK_STEP_VAR)?.unwrap_or(defaults.cadence.step());
        let cadence = Cadence::new(interval, step).map_err(|e| CoreError::Config(e.to_string()))?;

        let latency = parse_var::<u64, _>(&lookup, LATENCY_VAR)?.map(Duration::from_millis)
                                                                .unwrap_or(defaults.latency);
        let known_bad_markers = match lookup(MARKERS_VAR) {
            Some(raw) => raw.split(',')
                            .map(str::trim)
                            .filter(|m| !m.is_empty())
                            .map(str::to_string)
                            .collect(),
            None => defaults.known_bad_markers,
        };
        let seed = parse_var::<u64, _>(&lookup, SEED_VAR)?;

        Ok(Self { scan: ScanSettings { cadence,
                                       latency,
                                       known_bad_markers,
                                       seed } })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, CoreError>
    where T: FromStr,
          F: Fn(&str) -> Option<String>
{
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(raw) => raw.parse::<T>()
                        .map(Some)
                        .map_err(|_| CoreError::Config(format!("{key} inválido: {raw}"))),
        None => Ok(None),
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.scan, ScanSettings::default());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup(&[(TICK_INTERVAL_VAR, "50"),
                                                  (TICK_STEP_VAR, "25"),
                                                  (LATENCY_VAR, "0"),
                                                  (MARKERS_VAR, " trojan, ,worm "),
                                                  (SEED_VAR, "42")])).unwrap();
        assert_eq!(cfg.scan.cadence.interval(), Duration::from_millis(50));
        assert_eq!(cfg.scan.cadence.step(), 25);
        assert_eq!(cfg.scan.latency, Duration::ZERO);
        assert_eq!(cfg.scan.known_bad_markers, vec!["trojan", "worm"]);
        assert_eq!(cfg.scan.seed, Some(42));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = AppConfig::from_lookup(lookup(&[(TICK_STEP_VAR, "abc")])).unwrap_err();
        assert!(matches!(err, CoreError::Config(ref m) if m.contains(TICK_STEP_VAR)));
        let err = AppConfig::from_lookup(lookup(&[(TICK_STEP_VAR, "0")])).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
        let err = AppConfig::from_lookup(lookup(&[(TICK_INTERVAL_VAR, "0")])).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
