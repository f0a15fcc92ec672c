use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{ScheduleHandle, TickFn, TickScheduler};

/// Planificador con reloj virtual: nada se dispara hasta `advance`.
#[derive(Debug, Clone, Default)]
pub struct ManualTickScheduler {
    clock: Arc<Mutex<VirtualClock>>,
}

#[derive(Debug, Default)]
struct VirtualClock {
    now: Duration,
    timers: Vec<VirtualTimer>,
}

#[derive(Debug)]
struct VirtualTimer {
    handle: ScheduleHandle,
    interval: Duration,
    next_due: Duration,
}

impl ManualTickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VirtualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn now(&self) -> Duration {
        self.lock().now
    }

    pub fn active_timers(&self) -> usize {
        self.lock().timers.iter().filter(|t| t.handle.is_active()).count()
    }

    /// Avanza el reloj virtual `by`, disparando en orden temporal cada tick
    /// vencido (empates por orden de registro). Devuelve cuántos callbacks se
    /// ejecutaron.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;
        loop {
            let due = {
                let mut clock = self.lock();
                clock.timers.retain(|t| t.handle.is_active());
                let next = clock.timers
                                .iter()
                                .enumerate()
                                .filter(|(_, t)| t.next_due <= target)
                                .min_by_key(|(i, t)| (t.next_due, *i))
                                .map(|(i, _)| i);
                let Some(index) = next else {
                    clock.now = target;
                    break;
                };
                let timer = &mut clock.timers[index];
                let due_at = timer.next_due;
                timer.next_due = due_at + timer.interval;
                let handle = timer.handle.clone();
                clock.now = due_at;
                handle
            };
            // el callback corre sin el lock del reloj
            if due.fire().is_some() {
                fired += 1;
            }
        }
        fired
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule_repeating(&self, interval: Duration, tick: TickFn) -> ScheduleHandle {
        let handle = ScheduleHandle::new(tick);
        let mut clock = self.lock();
        let interval = interval.max(Duration::from_millis(1));
        let next_due = clock.now + interval;
        clock.timers.push(VirtualTimer { handle: handle.clone(),
                                         interval,
                                         next_due });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::TickControl;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn advance_fires_due_ticks_in_order() {
        let scheduler = ManualTickScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let fast_log = log.clone();
        let slow_log = log.clone();
        scheduler.schedule_repeating(Duration::from_millis(100),
                                     Box::new(move || {
                                         fast_log.lock().unwrap().push("fast");
                                         TickControl::Continue
                                     }));
        scheduler.schedule_repeating(Duration::from_millis(250),
                                     Box::new(move || {
                                         slow_log.lock().unwrap().push("slow");
                                         TickControl::Continue
                                     }));

        assert_eq!(scheduler.advance(Duration::from_millis(99)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(201)), 4);
        assert_eq!(*log.lock().unwrap(), vec!["fast", "fast", "slow", "fast"]);
        assert_eq!(scheduler.now(), Duration::from_millis(300));
    }

    #[test]
    fn stopped_and_cancelled_timers_are_dropped() {
        let scheduler = ManualTickScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let handle = scheduler.schedule_repeating(Duration::from_millis(10),
                                                  Box::new(move || {
                                                      c.fetch_add(1, Ordering::SeqCst);
                                                      TickControl::Continue
                                                  }));
        scheduler.advance(Duration::from_millis(30));
        handle.cancel();
        assert_eq!(scheduler.advance(Duration::from_secs(1)), 0);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.active_timers(), 0);
    }
}
