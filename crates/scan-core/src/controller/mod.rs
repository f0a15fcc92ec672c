//! Controlador del flujo: `Idle -> Scanning -> Complete`.
//!
//! Arranca tracker y simulador en paralelo para cada envío, recibe sus
//! resultados por un canal y los aplica a la sesión actual sólo si el
//! `session_id` coincide (los resultados obsoletos se descartan).

pub mod builder;
pub mod core;

pub use builder::ControllerBuilder;
pub use core::WorkflowController;
