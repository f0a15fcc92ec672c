//! Tracker de progreso.
//!
//! Avanza un porcentaje de 0 a 100 con una cadencia fija, independiente de si
//! los veredictos llegaron. Invariantes:
//! - el progreso es monótono no decreciente y nunca supera 100;
//! - `completed == true` se emite exactamente una vez (al llegar a 100) y
//!   luego la programación se detiene sola;
//! - tras `TrackerHandle::cancel` no se dispara ningún tick más.
use std::time::Duration;

use crate::constants::{PROGRESS_CEILING, TICK_INTERVAL_MS, TICK_STEP};
use crate::errors::ScanError;
use crate::schedule::{ScheduleHandle, TickControl, TickScheduler};

/// Cadencia del tracker: cada `interval` suma `step` puntos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    interval: Duration,
    step: u8,
}

impl Cadence {
    pub fn new(interval: Duration, step: u8) -> Result<Self, ScanError> {
        if interval.is_zero() {
            return Err(ScanError::InvalidSettings("tick interval must be positive".into()));
        }
        if step == 0 || step > PROGRESS_CEILING {
            return Err(ScanError::InvalidSettings(format!("tick step must be within 1..={PROGRESS_CEILING}, got {step}")));
        }
        Ok(Self { interval, step })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// Ticks necesarios para llegar al techo.
    pub fn ticks_to_complete(&self) -> u32 {
        u32::from(PROGRESS_CEILING).div_ceil(u32::from(self.step))
    }

    /// Tiempo hasta la señal de completado.
    pub fn time_to_complete(&self) -> Duration {
        self.interval * self.ticks_to_complete()
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self { interval: Duration::from_millis(TICK_INTERVAL_MS),
               step: TICK_STEP }
    }
}

/// Observación entregada en cada tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTick {
    pub progress: u8,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct ProgressTracker<S: TickScheduler> {
    scheduler: S,
    cadence: Cadence,
}

impl<S: TickScheduler> ProgressTracker<S> {
    pub fn new(scheduler: S, cadence: Cadence) -> Self {
        Self { scheduler, cadence }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Arranca una instancia de seguimiento. Cada instancia lleva su propio
    /// contador desde 0.
    pub fn start<F>(&self, mut on_tick: F) -> TrackerHandle
        where F: FnMut(ProgressTick) + Send + 'static
    {
        let step = self.cadence.step;
        let mut progress: u8 = 0;
        let schedule = self.scheduler.schedule_repeating(self.cadence.interval,
                                                         Box::new(move || {
                                                             progress = progress.saturating_add(step).min(PROGRESS_CEILING);
                                                             let completed = progress == PROGRESS_CEILING;
                                                             on_tick(ProgressTick { progress, completed });
                                                             if completed {
                                                                 TickControl::Stop
                                                             } else {
                                                                 TickControl::Continue
                                                             }
                                                         }));
        TrackerHandle { schedule }
    }
}

/// Handle de cancelación de una instancia del tracker.
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    schedule: ScheduleHandle,
}

impl TrackerHandle {
    pub fn cancel(&self) {
        self.schedule.cancel();
    }

    /// `false` tras completar o cancelar.
    pub fn is_running(&self) -> bool {
        self.schedule.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualTickScheduler;
    use std::sync::{Arc, Mutex};

    fn recording_tracker(cadence: Cadence) -> (ManualTickScheduler, TrackerHandle, Arc<Mutex<Vec<ProgressTick>>>) {
        let scheduler = ManualTickScheduler::new();
        let tracker = ProgressTracker::new(scheduler.clone(), cadence);
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = ticks.clone();
        let handle = tracker.start(move |tick| sink.lock().unwrap().push(tick));
        (scheduler, handle, ticks)
    }

    #[test]
    fn reaches_ceiling_after_ten_reference_ticks() {
        let (scheduler, handle, ticks) = recording_tracker(Cadence::default());
        scheduler.advance(Duration::from_millis(2_999));
        assert_eq!(ticks.lock().unwrap().len(), 9);
        assert!(handle.is_running());

        scheduler.advance(Duration::from_millis(1));
        let ticks = ticks.lock().unwrap();
        assert_eq!(ticks.len(), 10);
        assert_eq!(ticks.last(), Some(&ProgressTick { progress: 100, completed: true }));
        assert!(!handle.is_running());
    }

    #[test]
    fn progress_is_monotonic_bounded_and_completes_once() {
        let cadence = Cadence::new(Duration::from_millis(50), 30).unwrap();
        assert_eq!(cadence.ticks_to_complete(), 4);
        let (scheduler, _handle, ticks) = recording_tracker(cadence);
        scheduler.advance(Duration::from_secs(60));

        let ticks = ticks.lock().unwrap();
        let values: Vec<u8> = ticks.iter().map(|t| t.progress).collect();
        assert_eq!(values, vec![30, 60, 90, 100]);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ticks.iter().filter(|t| t.completed).count(), 1);
    }

    #[test]
    fn cancel_stops_ticks_at_any_point() {
        for cancel_after in 0..=10u64 {
            let (scheduler, handle, ticks) = recording_tracker(Cadence::default());
            scheduler.advance(Duration::from_millis(300 * cancel_after));
            handle.cancel();
            let seen = ticks.lock().unwrap().len();
            scheduler.advance(Duration::from_secs(30));
            assert_eq!(ticks.lock().unwrap().len(), seen, "cancel_after={cancel_after}");
        }
    }

    #[test]
    fn cadence_rejects_degenerate_values() {
        assert!(Cadence::new(Duration::ZERO, 10).is_err());
        assert!(Cadence::new(Duration::from_millis(10), 0).is_err());
        assert!(Cadence::new(Duration::from_millis(10), 101).is_err());
        assert_eq!(Cadence::default().time_to_complete(), Duration::from_millis(3_000));
    }
}
