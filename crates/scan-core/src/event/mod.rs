//! Definiciones de eventos de sesión y trait EventStore.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{ScanEvent, ScanEventKind, StaleSource};
