//! Time-ordered turn queue.

use std::{cmp::Reverse, collections::BinaryHeap};

use crate::prelude::*;

/// Game clock and the queue of units waiting for their next turn.
///
/// Units waking up at the same tick act in the order they were scheduled.
#[derive(Clone, Default, Debug)]
pub struct Scheduler {
    now: Instant,
    seq: u64,
    queue: BinaryHeap<Reverse<(Instant, u64, UnitId)>>,
    queued: HashSet<UnitId>,
    current: Option<UnitId>,
}

impl Scheduler {
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Unit whose turn it currently is.
    pub fn current(&self) -> Option<UnitId> {
        self.current
    }

    pub fn is_scheduled(&self, unit: UnitId) -> bool {
        self.queued.contains(&unit)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue a unit to act `delay` ticks from now.
    pub fn schedule(&mut self, unit: UnitId, delay: i64) -> Result<()> {
        if delay < 0 {
            log::warn!("schedule: negative delay {delay} for {unit}");
            return Err(Error::InvalidArgument("negative delay"));
        }
        if self.queued.contains(&unit) {
            log::warn!("schedule: {unit} is already queued");
            return Err(Error::InvalidArgument("unit already scheduled"));
        }

        if self.current == Some(unit) {
            self.current = None;
        }
        self.queued.insert(unit);
        self.queue.push(Reverse((self.now + delay, self.seq, unit)));
        self.seq += 1;
        Ok(())
    }

    /// Take the next unit off the queue and advance the clock to its wake
    /// time.
    pub fn pop_next(&mut self) -> Option<UnitId> {
        let Reverse((wake, _, unit)) = self.queue.pop()?;
        self.queued.remove(&unit);
        self.now = self.now.max(wake);
        self.current = Some(unit);
        Some(unit)
    }

    /// Drop a unit from the scheduler entirely.
    pub fn release(&mut self, unit: UnitId) {
        if self.current == Some(unit) {
            self.current = None;
        }
        if self.queued.remove(&unit) {
            self.queue.retain(|Reverse((_, _, u))| *u != unit);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pops_in_wake_order() {
        let (a, b) = (UnitId(0), UnitId(1));
        let mut s = Scheduler::default();
        s.schedule(a, 100).unwrap();
        s.schedule(b, 50).unwrap();

        assert_eq!(s.pop_next(), Some(b));
        assert_eq!(s.now(), Instant::from_ticks(50));
        assert_eq!(s.current(), Some(b));

        assert_eq!(s.pop_next(), Some(a));
        assert_eq!(s.now(), Instant::from_ticks(100));
        assert_eq!(s.current(), Some(a));

        assert_eq!(s.pop_next(), None);
        assert_eq!(s.now(), Instant::from_ticks(100));
    }

    #[test]
    fn ties_are_fifo() {
        let mut s = Scheduler::default();
        for i in [3, 1, 2] {
            s.schedule(UnitId(i), 10).unwrap();
        }
        let order: Vec<_> = std::iter::from_fn(|| s.pop_next()).collect();
        assert_eq!(order, vec![UnitId(3), UnitId(1), UnitId(2)]);
    }

    #[test]
    fn bad_schedules() {
        let mut s = Scheduler::default();
        assert!(s.schedule(UnitId(0), -1).is_err());
        s.schedule(UnitId(0), 0).unwrap();
        assert!(s.schedule(UnitId(0), 5).is_err());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn delays_are_relative_to_now() {
        let mut s = Scheduler::default();
        s.schedule(UnitId(0), 700).unwrap();
        assert_eq!(s.pop_next(), Some(UnitId(0)));
        s.schedule(UnitId(0), 700).unwrap();
        assert_eq!(s.current(), None);
        s.schedule(UnitId(1), 500).unwrap();
        assert_eq!(s.pop_next(), Some(UnitId(1)));
        assert_eq!(s.now(), Instant::from_ticks(1200));
        assert_eq!(s.pop_next(), Some(UnitId(0)));
        assert_eq!(s.now(), Instant::from_ticks(1400));
    }

    #[test]
    fn released_units_never_return() {
        let mut s = Scheduler::default();
        s.schedule(UnitId(0), 10).unwrap();
        s.schedule(UnitId(1), 20).unwrap();
        s.release(UnitId(0));
        assert!(!s.is_scheduled(UnitId(0)));
        assert_eq!(s.pop_next(), Some(UnitId(1)));
        assert_eq!(s.pop_next(), None);
    }
}
