use std::time::{Duration, Instant};

/// Admission control for the periodic capture tick.
///
/// Ticks never overlap: a tick is admitted only when no other tick is in
/// flight and its scheduled instant is not older than the moment the
/// previous tick finished. Timer events that queued up behind a slow tick
/// are dropped instead of being replayed back to back.
pub struct TickScheduler {
    interval: Duration,
    in_flight: bool,
    last_finished: Option<Instant>,
    next_deadline: Option<Instant>,
    skipped: u64,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            in_flight: false,
            last_finished: None,
            next_deadline: None,
            skipped: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Ticks rejected or deadlines passed over since the last reset.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Forgets all timing history; used when capture starts or stops.
    pub fn reset(&mut self) {
        self.in_flight = false;
        self.last_finished = None;
        self.next_deadline = None;
        self.skipped = 0;
    }

    /// Tries to start the tick scheduled at `scheduled`.
    ///
    /// Every `true` must be paired with a [`TickScheduler::finish`].
    pub fn try_begin(&mut self, scheduled: Instant) -> bool {
        if self.in_flight {
            self.skipped += 1;
            log::debug!("Tick rejected: previous tick still running");
            return false;
        }
        if self.last_finished.is_some_and(|done| scheduled < done) {
            self.skipped += 1;
            log::debug!("Tick rejected: scheduled before the previous tick finished");
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn finish(&mut self, at: Instant) {
        self.in_flight = false;
        self.last_finished = Some(at);
    }

    /// Next instant a blocking loop should wake up at.
    ///
    /// Advances by one interval per call; deadlines that already lie in the
    /// past when computed are skipped rather than run late.
    pub fn next_deadline(&mut self, now: Instant) -> Instant {
        let next = match self.next_deadline {
            None => now,
            Some(previous) => {
                let mut next = previous + self.interval;
                while next < now {
                    next += self.interval;
                    self.skipped += 1;
                }
                next
            }
        };
        self.next_deadline = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(33);

    #[test]
    fn test_first_tick_is_admitted() {
        let mut scheduler = TickScheduler::new(INTERVAL);
        assert!(scheduler.try_begin(Instant::now()));
        assert!(scheduler.is_in_flight());
    }

    #[test]
    fn test_reentrant_tick_is_rejected() {
        let mut scheduler = TickScheduler::new(INTERVAL);
        let t0 = Instant::now();
        assert!(scheduler.try_begin(t0));
        assert!(!scheduler.try_begin(t0 + INTERVAL));
        assert_eq!(scheduler.skipped(), 1);
    }

    #[test]
    fn test_tick_queued_behind_slow_tick_is_rejected() {
        let mut scheduler = TickScheduler::new(INTERVAL);
        let t0 = Instant::now();
        assert!(scheduler.try_begin(t0));
        // The tick took 100ms; the timer fired at +33ms and +66ms meanwhile.
        scheduler.finish(t0 + Duration::from_millis(100));
        assert!(!scheduler.try_begin(t0 + INTERVAL));
        assert!(!scheduler.try_begin(t0 + INTERVAL * 2));
        assert!(scheduler.try_begin(t0 + INTERVAL * 4));
        assert_eq!(scheduler.skipped(), 2);
    }

    #[test]
    fn test_on_time_ticks_are_all_admitted() {
        let mut scheduler = TickScheduler::new(INTERVAL);
        let t0 = Instant::now();
        for i in 0..5 {
            let at = t0 + INTERVAL * i;
            assert!(scheduler.try_begin(at));
            scheduler.finish(at + Duration::from_millis(5));
        }
        assert_eq!(scheduler.skipped(), 0);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut scheduler = TickScheduler::new(INTERVAL);
        let t0 = Instant::now();
        assert!(scheduler.try_begin(t0));
        scheduler.reset();
        assert!(!scheduler.is_in_flight());
        assert!(scheduler.try_begin(t0));
    }

    #[test]
    fn test_next_deadline_advances_by_interval() {
        let mut scheduler = TickScheduler::new(INTERVAL);
        let t0 = Instant::now();
        assert_eq!(scheduler.next_deadline(t0), t0);
        assert_eq!(scheduler.next_deadline(t0 + Duration::from_millis(10)), t0 + INTERVAL);
        assert_eq!(scheduler.next_deadline(t0 + INTERVAL), t0 + INTERVAL * 2);
    }

    #[test]
    fn test_next_deadline_skips_missed_deadlines() {
        let mut scheduler = TickScheduler::new(INTERVAL);
        let t0 = Instant::now();
        scheduler.next_deadline(t0);
        // The loop overran by ~3.5 intervals.
        let late = t0 + Duration::from_millis(115);
        assert_eq!(scheduler.next_deadline(late), t0 + INTERVAL * 4);
        assert_eq!(scheduler.skipped(), 3);
    }
}
