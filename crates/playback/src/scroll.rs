use crate::{PlaybackError, Scheduler, TickHandle};
use std::time::Duration;

/// Offset change applied by step-forward / step-backward.
pub const STEP_DELTA: f32 = 50.0;
/// Offset added per tick.
pub const TICK_STEP: f32 = 1.0;
/// Seconds per tick at speed 1. Speed `s` ticks every `TICK_BASE_SECS / s`.
pub const TICK_BASE_SECS: f64 = 0.25;
/// Animation applied to tick-driven offset changes.
pub const TICK_ANIMATION: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollAnimation {
    Linear(Duration),
    Eased,
}

/// New offset for the attached view, with the animation it should use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollUpdate {
    pub offset: f32,
    pub animation: ScrollAnimation,
}

/// Tick interval for a scroll speed.
pub fn tick_interval(speed: f32) -> Result<Duration, PlaybackError> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(PlaybackError::InvalidSpeed(speed));
    }
    let nanos = (TICK_BASE_SECS * 1e9 / speed as f64).round().max(1.0);
    Ok(Duration::from_nanos(nanos as u64))
}

/// Auto-scroll playback state for one view.
///
/// Holds at most one tick handle. The handle is taken at play-start and
/// released on stop, on drag-start, or when the controller is dropped.
#[derive(Debug)]
pub struct ScrollController<S: Scheduler> {
    scheduler: S,
    state: PlayState,
    offset: f32,
    speed: f32,
    interval: Duration,
    step_delta: f32,
    dragging: bool,
    handle: Option<TickHandle>,
}

impl<S: Scheduler> ScrollController<S> {
    pub fn new(scheduler: S, speed: f32) -> Result<Self, PlaybackError> {
        let interval = tick_interval(speed)?;
        Ok(Self {
            scheduler,
            state: PlayState::Stopped,
            offset: 0.0,
            speed,
            interval,
            step_delta: STEP_DELTA,
            dragging: false,
            handle: None,
        })
    }

    pub fn with_step_delta(mut self, step_delta: f32) -> Self {
        self.step_delta = step_delta.abs();
        self
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether a tick handle is currently installed.
    pub fn is_ticking(&self) -> bool {
        self.handle.is_some()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Time until the next tick, for scheduling a repaint.
    pub fn next_tick_in(&self) -> Option<Duration> {
        self.handle.and_then(|h| self.scheduler.next_due_in(h))
    }

    pub fn play(&mut self) {
        self.state = PlayState::Playing;
        if !self.dragging {
            self.arm();
        }
    }

    pub fn stop(&mut self) {
        if self.state == PlayState::Stopped {
            return;
        }
        self.state = PlayState::Stopped;
        self.disarm();
    }

    pub fn toggle_play(&mut self) -> PlayState {
        match self.state {
            PlayState::Stopped => self.play(),
            PlayState::Playing => self.stop(),
        }
        self.state
    }

    /// Manual drag on the content started. Ticking pauses; the playing flag stays.
    pub fn begin_drag(&mut self) {
        if self.dragging {
            return;
        }
        self.dragging = true;
        self.disarm();
    }

    /// Manual drag released. Ticking resumes if playback was on.
    pub fn end_drag(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        if self.is_playing() {
            self.arm();
        }
    }

    /// Move the content by a manual drag delta. Ignored unless a drag is active.
    pub fn drag_scroll(&mut self, delta: f32) {
        if self.dragging {
            self.offset = (self.offset + delta).max(0.0);
        }
    }

    /// Adopt an offset the view arrived at on its own (wheel, native drag).
    pub fn sync_offset(&mut self, observed: f32) {
        self.offset = observed.max(0.0);
    }

    /// Pull the offset back to the end of the content. Returns true if it
    /// had run past `max_offset`.
    pub fn clamp_to_end(&mut self, max_offset: f32) -> bool {
        let max_offset = max_offset.max(0.0);
        if self.offset <= max_offset {
            return false;
        }
        self.offset = max_offset;
        true
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), PlaybackError> {
        self.interval = tick_interval(speed)?;
        self.speed = speed;
        if self.handle.is_some() {
            self.arm();
        }
        Ok(())
    }

    pub fn reset(&mut self) -> ScrollUpdate {
        self.offset = 0.0;
        self.manual_update()
    }

    pub fn step_forward(&mut self) -> ScrollUpdate {
        self.offset += self.step_delta;
        self.manual_update()
    }

    pub fn step_backward(&mut self) -> ScrollUpdate {
        self.offset = (self.offset - self.step_delta).max(0.0);
        self.manual_update()
    }

    /// Apply every tick that fired since the last poll.
    pub fn poll(&mut self) -> Option<ScrollUpdate> {
        let handle = self.handle?;
        let due = self.scheduler.take_due(handle);
        if due == 0 {
            return None;
        }
        self.offset += due as f32 * TICK_STEP;
        Some(ScrollUpdate {
            offset: self.offset,
            animation: ScrollAnimation::Linear(TICK_ANIMATION),
        })
    }

    fn manual_update(&self) -> ScrollUpdate {
        ScrollUpdate {
            offset: self.offset,
            animation: ScrollAnimation::Eased,
        }
    }

    fn arm(&mut self) {
        self.disarm();
        self.handle = Some(self.scheduler.start(self.interval));
        tracing::debug!(speed = self.speed, interval = ?self.interval, "scroll ticking");
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl<S: Scheduler> Drop for ScrollController<S> {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClockScheduler, ManualClock};

    fn controller(speed: f32) -> (ManualClock, ScrollController<ClockScheduler<ManualClock>>) {
        let clock = ManualClock::new();
        let ctrl = ScrollController::new(ClockScheduler::new(clock.clone()), speed).unwrap();
        (clock, ctrl)
    }

    #[test]
    fn test_tick_interval_policy() {
        assert_eq!(tick_interval(10.0).unwrap(), Duration::from_millis(25));
        assert_eq!(tick_interval(1.0).unwrap(), Duration::from_millis(250));
        assert_eq!(tick_interval(100.0).unwrap(), Duration::from_micros(2500));
        assert_eq!(tick_interval(0.0), Err(PlaybackError::InvalidSpeed(0.0)));
        assert!(tick_interval(-3.0).is_err());
        assert!(tick_interval(f32::NAN).is_err());
    }

    #[test]
    fn test_toggle_play_starts_and_stops() {
        let (clock, mut ctrl) = controller(10.0);
        assert_eq!(ctrl.toggle_play(), PlayState::Playing);
        assert!(ctrl.is_ticking());

        clock.advance(Duration::from_millis(75));
        let update = ctrl.poll().unwrap();
        assert_eq!(update.offset, 3.0);
        assert_eq!(update.animation, ScrollAnimation::Linear(TICK_ANIMATION));

        assert_eq!(ctrl.toggle_play(), PlayState::Stopped);
        assert!(!ctrl.is_ticking());
        clock.advance(Duration::from_secs(1));
        assert_eq!(ctrl.poll(), None);
        assert_eq!(ctrl.offset(), 3.0);
    }

    #[test]
    fn test_play_twice_keeps_one_tick_source() {
        let (_clock, mut ctrl) = controller(10.0);
        ctrl.play();
        ctrl.play();
        assert_eq!(ctrl.scheduler().active(), 1);
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let (_clock, mut ctrl) = controller(10.0);
        ctrl.step_forward();
        ctrl.stop();
        assert_eq!(ctrl.state(), PlayState::Stopped);
        assert_eq!(ctrl.offset(), STEP_DELTA);
        assert_eq!(ctrl.scheduler().active(), 0);
    }

    #[test]
    fn test_manual_controls() {
        let (_clock, mut ctrl) = controller(10.0);
        assert_eq!(ctrl.step_forward().offset, 50.0);
        assert_eq!(ctrl.step_forward().offset, 100.0);
        assert_eq!(ctrl.step_backward().offset, 50.0);
        assert_eq!(ctrl.step_backward().offset, 0.0);
        assert_eq!(ctrl.step_backward().offset, 0.0);

        ctrl.sync_offset(30.0);
        let update = ctrl.step_backward();
        assert_eq!(update.offset, 0.0);
        assert_eq!(update.animation, ScrollAnimation::Eased);

        ctrl.step_forward();
        assert_eq!(ctrl.reset().offset, 0.0);
    }

    #[test]
    fn test_custom_step_delta() {
        let clock = ManualClock::new();
        let mut ctrl = ScrollController::new(ClockScheduler::new(clock), 10.0)
            .unwrap()
            .with_step_delta(120.0);
        assert_eq!(ctrl.step_forward().offset, 120.0);
    }

    #[test]
    fn test_drag_suspends_and_resumes() {
        let (clock, mut ctrl) = controller(10.0);
        ctrl.play();
        clock.advance(Duration::from_millis(50));
        ctrl.poll();
        assert_eq!(ctrl.offset(), 2.0);

        ctrl.begin_drag();
        assert!(ctrl.is_playing());
        assert!(!ctrl.is_ticking());
        clock.advance(Duration::from_millis(500));
        assert_eq!(ctrl.poll(), None);
        ctrl.sync_offset(40.0);

        ctrl.end_drag();
        assert!(ctrl.is_ticking());
        clock.advance(Duration::from_millis(25));
        assert_eq!(ctrl.poll().unwrap().offset, 41.0);
    }

    #[test]
    fn test_drag_while_stopped_does_not_start() {
        let (_clock, mut ctrl) = controller(10.0);
        ctrl.begin_drag();
        ctrl.end_drag();
        assert!(!ctrl.is_ticking());
        assert_eq!(ctrl.scheduler().active(), 0);
    }

    #[test]
    fn test_play_during_drag_waits_for_release() {
        let (_clock, mut ctrl) = controller(10.0);
        ctrl.begin_drag();
        ctrl.play();
        assert!(!ctrl.is_ticking());
        ctrl.end_drag();
        assert!(ctrl.is_ticking());
        assert_eq!(ctrl.scheduler().active(), 1);
    }

    #[test]
    fn test_set_speed_rearms_while_playing() {
        let (clock, mut ctrl) = controller(10.0);
        ctrl.play();
        ctrl.set_speed(1.0).unwrap();
        assert_eq!(ctrl.scheduler().active(), 1);
        assert_eq!(ctrl.interval(), Duration::from_millis(250));

        clock.advance(Duration::from_millis(249));
        assert_eq!(ctrl.poll(), None);
        clock.advance(Duration::from_millis(1));
        assert_eq!(ctrl.poll().unwrap().offset, 1.0);

        assert!(ctrl.set_speed(0.0).is_err());
        assert_eq!(ctrl.speed(), 1.0);
    }

    #[test]
    fn test_set_speed_while_stopped_does_not_start() {
        let (_clock, mut ctrl) = controller(10.0);
        ctrl.set_speed(50.0).unwrap();
        assert!(!ctrl.is_ticking());
        assert_eq!(ctrl.interval(), Duration::from_millis(5));
    }

    #[test]
    fn test_drag_scroll_only_while_dragging() {
        let (_clock, mut ctrl) = controller(10.0);
        ctrl.drag_scroll(30.0);
        assert_eq!(ctrl.offset(), 0.0);

        ctrl.begin_drag();
        ctrl.drag_scroll(30.0);
        ctrl.drag_scroll(-45.0);
        assert_eq!(ctrl.offset(), 0.0);
        ctrl.drag_scroll(12.5);
        assert_eq!(ctrl.offset(), 12.5);
    }

    #[test]
    fn test_clamp_to_end_while_ticking() {
        let (clock, mut ctrl) = controller(10.0);
        ctrl.play();
        for _ in 0..400 {
            clock.advance(Duration::from_millis(25));
            ctrl.poll();
            ctrl.clamp_to_end(120.0);
        }
        assert_eq!(ctrl.offset(), 120.0);
        assert!(ctrl.is_ticking());

        // Stepping back from the end is visible immediately
        assert_eq!(ctrl.step_backward().offset, 70.0);
        assert!(!ctrl.clamp_to_end(120.0));
        assert!(ctrl.clamp_to_end(-3.0));
        assert_eq!(ctrl.offset(), 0.0);
    }

    #[test]
    fn test_sync_offset_clamps() {
        let (_clock, mut ctrl) = controller(10.0);
        ctrl.sync_offset(-12.0);
        assert_eq!(ctrl.offset(), 0.0);
    }

    #[test]
    fn test_next_tick_in() {
        let (clock, mut ctrl) = controller(10.0);
        assert_eq!(ctrl.next_tick_in(), None);
        ctrl.play();
        clock.advance(Duration::from_millis(10));
        assert_eq!(ctrl.next_tick_in(), Some(Duration::from_millis(15)));
    }
}
