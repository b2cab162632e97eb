use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Monotonic time source. `now` is measured from an arbitrary fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

/// Source of cancellable periodic ticks.
///
/// Ticks are pulled rather than pushed: the owner calls [`Scheduler::take_due`]
/// whenever it gets a chance to run and receives the number of ticks that
/// elapsed since the previous call.
pub trait Scheduler {
    fn start(&mut self, interval: Duration) -> TickHandle;
    /// Returns false if the handle was not active.
    fn cancel(&mut self, handle: TickHandle) -> bool;
    fn take_due(&mut self, handle: TickHandle) -> u64;
    /// Time until the next tick of `handle` fires, if it is active.
    fn next_due_in(&self, handle: TickHandle) -> Option<Duration>;
    fn active(&self) -> usize;
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    anchor: Duration,
    interval: Duration,
    fired: u64,
}

impl Timer {
    fn total_at(&self, now: Duration) -> u64 {
        let elapsed = now.saturating_sub(self.anchor).as_nanos();
        (elapsed / self.interval.as_nanos().max(1)) as u64
    }
}

/// [`Scheduler`] that derives tick counts from a [`Clock`].
#[derive(Debug)]
pub struct ClockScheduler<C: Clock> {
    clock: C,
    next_id: u64,
    timers: HashMap<TickHandle, Timer>,
}

impl<C: Clock> ClockScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            timers: HashMap::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> Scheduler for ClockScheduler<C> {
    fn start(&mut self, interval: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.timers.insert(
            handle,
            Timer {
                anchor: self.clock.now(),
                interval,
                fired: 0,
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TickHandle) -> bool {
        self.timers.remove(&handle).is_some()
    }

    fn take_due(&mut self, handle: TickHandle) -> u64 {
        let now = self.clock.now();
        let Some(timer) = self.timers.get_mut(&handle) else {
            return 0;
        };
        let total = timer.total_at(now);
        let due = total.saturating_sub(timer.fired);
        timer.fired = total;
        due
    }

    fn next_due_in(&self, handle: TickHandle) -> Option<Duration> {
        let timer = self.timers.get(&handle)?;
        let n = u32::try_from(timer.fired + 1).unwrap_or(u32::MAX);
        let next = timer.anchor.saturating_add(timer.interval.saturating_mul(n));
        Some(next.saturating_sub(self.clock.now()))
    }

    fn active(&self) -> usize {
        self.timers.len()
    }
}

/// Lets several controllers share one scheduler.
impl<S: Scheduler> Scheduler for Rc<RefCell<S>> {
    fn start(&mut self, interval: Duration) -> TickHandle {
        self.borrow_mut().start(interval)
    }

    fn cancel(&mut self, handle: TickHandle) -> bool {
        self.borrow_mut().cancel(handle)
    }

    fn take_due(&mut self, handle: TickHandle) -> u64 {
        self.borrow_mut().take_due(handle)
    }

    fn next_due_in(&self, handle: TickHandle) -> Option<Duration> {
        self.borrow().next_due_in(handle)
    }

    fn active(&self) -> usize {
        self.borrow().active()
    }
}
