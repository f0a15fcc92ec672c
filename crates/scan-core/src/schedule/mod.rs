//! Planificador de callbacks periódicos, inyectable.
//!
//! El tracker de progreso no depende de un temporizador concreto: recibe un
//! `TickScheduler`. `TokioTickScheduler` usa `tokio::time::interval`;
//! `ManualTickScheduler` avanza un reloj virtual explícito (tests).
//!
//! Garantía de cancelación: `ScheduleHandle::cancel` suelta el callback bajo
//! el mismo lock con el que se dispara, así que ningún tick se ejecuta una vez
//! que `cancel` retorna.

mod manual;
mod tokio_scheduler;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub use manual::ManualTickScheduler;
pub use tokio_scheduler::TokioTickScheduler;

/// Respuesta del callback: seguir o detener la repetición.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

pub type TickFn = Box<dyn FnMut() -> TickControl + Send + 'static>;

pub trait TickScheduler: Send + Sync {
    /// Programa `tick` cada `interval`; el primer disparo ocurre tras un
    /// intervalo completo.
    fn schedule_repeating(&self, interval: Duration, tick: TickFn) -> ScheduleHandle;
}

impl<T: TickScheduler + ?Sized> TickScheduler for Arc<T> {
    fn schedule_repeating(&self, interval: Duration, tick: TickFn) -> ScheduleHandle {
        (**self).schedule_repeating(interval, tick)
    }
}

/// Handle compartido de una programación periódica.
#[derive(Clone)]
pub struct ScheduleHandle {
    slot: Arc<Mutex<Option<TickFn>>>,
}

impl ScheduleHandle {
    pub(crate) fn new(tick: TickFn) -> Self {
        Self { slot: Arc::new(Mutex::new(Some(tick))) }
    }

    fn lock(&self) -> MutexGuard<'_, Option<TickFn>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancela la programación. Idempotente.
    pub fn cancel(&self) {
        self.lock().take();
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Dispara el callback si sigue activo. `None` si ya estaba cancelado o
    /// detenido.
    pub(crate) fn fire(&self) -> Option<TickControl> {
        let mut slot = self.lock();
        let tick = slot.as_mut()?;
        let control = tick();
        if control == TickControl::Stop {
            slot.take();
        }
        Some(control)
    }
}

impl fmt::Debug for ScheduleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleHandle").field("active", &self.is_active()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_releases_the_callback() {
        let handle = ScheduleHandle::new(Box::new(|| TickControl::Stop));
        assert_eq!(handle.fire(), Some(TickControl::Stop));
        assert!(!handle.is_active());
        assert_eq!(handle.fire(), None);
    }

    #[test]
    fn cancelled_handle_never_fires() {
        let handle = ScheduleHandle::new(Box::new(|| TickControl::Continue));
        handle.cancel();
        handle.cancel();
        assert_eq!(handle.fire(), None);
    }
}
