//! Phoenix Scan
//!
//! Capa de aplicación sobre `scan-core`:
//! - `config` traduce el entorno (.env) a `ScanSettings`.
//! - `errors` agrupa errores de núcleo y dominio.
//! - `logging` instala el subscriber de trazas de los binarios.

pub mod config;
pub mod errors;
pub mod logging;

pub use config::AppConfig;

use scan_core::{ControllerBuilder, TickScheduler};

/// Builder del controlador con los settings de `config` ya aplicados.
pub fn controller_builder(config: &AppConfig) -> ControllerBuilder<scan_core::TokioTickScheduler> {
    ControllerBuilder::new().settings(config.scan.clone())
}

/// Igual que `controller_builder` pero con un planificador propio.
pub fn controller_builder_with<S: TickScheduler>(config: &AppConfig, scheduler: S) -> ControllerBuilder<S> {
    controller_builder(config).scheduler(scheduler)
}

#[cfg(test)]
mod tests {
    use super::errors::{core_error::CoreError, domain_error::DomainError};
    use super::*;
    use scan_core::{ArtifactKind, ManualTickScheduler, ScanPhase};
    use std::time::Duration;

    #[test]
    fn core_error_tests() {
        let c = CoreError::Config("fallo".into()).to_string();
        assert_eq!(c, "Error de configuración: fallo");
    }

    #[test]
    fn domain_error_tests() {
        let d = DomainError::Validation("x".into()).to_string();
        assert_eq!(d, "Validación fallida: x");
    }

    #[tokio::test]
    async fn builder_applies_configured_cadence() {
        let config = AppConfig::from_lookup(|key| match key {
                         config::TICK_STEP_VAR => Some("50".into()),
                         config::LATENCY_VAR => Some("0".into()),
                         config::SEED_VAR => Some("7".into()),
                         _ => None,
                     }).unwrap();
        let scheduler = ManualTickScheduler::new();
        let mut controller = controller_builder_with(&config, scheduler.clone()).build();
        controller.submit(ArtifactKind::Hash, Some("cafebabe")).unwrap();
        controller.next_update().await.unwrap();

        scheduler.advance(Duration::from_millis(600));
        controller.process_pending();
        assert_eq!(controller.progress(), 100);
        assert_eq!(controller.phase(), ScanPhase::Complete);
    }
}
