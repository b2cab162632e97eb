use playback::{Clock, ClockScheduler, ScrollController};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Wall clock anchored at construction.
#[derive(Debug, Clone)]
pub(crate) struct SystemClock {
    pub(crate) anchor_instant: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            anchor_instant: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.anchor_instant.elapsed()
    }
}

/// One scheduler per app; the inline player and the overlay both tick from it.
pub(crate) type SharedScheduler = Rc<RefCell<ClockScheduler<SystemClock>>>;
pub(crate) type Scroller = ScrollController<SharedScheduler>;

pub(crate) fn shared_scheduler() -> SharedScheduler {
    Rc::new(RefCell::new(ClockScheduler::new(SystemClock::default())))
}
