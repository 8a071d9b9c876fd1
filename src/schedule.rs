use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<A> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    action: A,
}

/// Timer queue on a virtual clock; actions only come due inside `advance`.
#[derive(Debug)]
pub struct Scheduler<A> {
    now: Duration,
    timers: Vec<Timer<A>>,
    next_id: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            timers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<A: Clone> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_once(&mut self, delay: Duration, action: A) -> TimerId {
        self.insert(delay, None, action)
    }

    pub fn schedule_every(&mut self, interval: Duration, action: A) -> TimerId {
        let interval = interval.max(MIN_PERIOD);
        self.insert(interval, Some(interval), action)
    }

    /// Returns `false` when the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|timer| timer.id == id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Moves the clock forward and returns the actions that came due, in due order.
    /// A repeating timer fires at most once per call, missed periods are dropped.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<A> {
        self.now += elapsed;
        let now = self.now;

        let mut fired: Vec<(Duration, TimerId, A)> = Vec::new();
        self.timers.retain_mut(|timer| {
            if timer.due > now {
                return true;
            }
            fired.push((timer.due, timer.id, timer.action.clone()));
            match timer.period {
                Some(period) => {
                    let behind = (now - timer.due).as_nanos() % period.as_nanos();
                    // behind < period, so the next due is strictly after now
                    timer.due = now + period - Duration::from_nanos(behind as u64);
                    true
                }
                None => false,
            }
        });

        fired.sort_by_key(|(due, id, _)| (*due, id.0));
        fired.into_iter().map(|(_, _, action)| action).collect()
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            period,
            action,
        });
        id
    }
}
