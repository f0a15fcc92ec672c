//! Inicialización de trazas para los binarios.
//!
//! Las librerías emiten por la fachada `log`; el subscriber instala el puente
//! `tracing-log`, así que esos registros salen por el mismo `fmt` layer.
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

/// Instala el subscriber global (filtro de `RUST_LOG`, `info` por defecto).
/// Devuelve `false` si ya había uno instalado.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry().with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
                                  .with(tracing_subscriber::fmt::layer().with_target(false))
                                  .try_init()
                                  .is_ok()
}
