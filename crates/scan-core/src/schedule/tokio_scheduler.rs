use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{ScheduleHandle, TickControl, TickFn, TickScheduler};

/// Planificador sobre el runtime de Tokio. Debe usarse dentro de un runtime
/// (usa `tokio::spawn`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTickScheduler;

impl TickScheduler for TokioTickScheduler {
    fn schedule_repeating(&self, interval: Duration, tick: TickFn) -> ScheduleHandle {
        let period = interval.max(Duration::from_millis(1));
        let handle = ScheduleHandle::new(tick);
        let task_handle = handle.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match task_handle.fire() {
                    Some(TickControl::Continue) => continue,
                    Some(TickControl::Stop) | None => break,
                }
            }
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn fires_on_cadence_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let handle = TokioTickScheduler.schedule_repeating(Duration::from_millis(300),
                                                           Box::new(move || {
                                                               if seen.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                                                                   TickControl::Stop
                                                               } else {
                                                                   TickControl::Continue
                                                               }
                                                           }));
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_after_cancel() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let handle = TokioTickScheduler.schedule_repeating(Duration::from_millis(300),
                                                           Box::new(move || {
                                                               seen.fetch_add(1, Ordering::SeqCst);
                                                               TickControl::Continue
                                                           }));
        tokio::time::sleep(Duration::from_millis(950)).await;
        handle.cancel();
        let at_cancel = count.load(Ordering::SeqCst);
        assert_eq!(at_cancel, 3);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_cancel);
    }
}
