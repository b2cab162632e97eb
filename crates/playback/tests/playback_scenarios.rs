use playback::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn shared_scheduler() -> (ManualClock, Rc<RefCell<ClockScheduler<ManualClock>>>) {
    let clock = ManualClock::new();
    let sched = Rc::new(RefCell::new(ClockScheduler::new(clock.clone())));
    (clock, sched)
}

#[test]
fn test_offset_advances_one_unit_per_tick_at_default_speed() {
    let (clock, sched) = shared_scheduler();
    // Defaults of a freshly created script: font 30, speed 10
    let mut ctrl = ScrollController::new(sched, 10.0).unwrap();
    assert_eq!(ctrl.interval(), Duration::from_millis(25));

    ctrl.toggle_play();
    for n in 1..=40u32 {
        clock.advance(ctrl.interval());
        let update = ctrl.poll().expect("tick due");
        assert_eq!(update.offset, n as f32);
    }
    assert_eq!(ctrl.offset(), 40.0);
}

#[test]
fn test_offset_never_negative_for_any_event_sequence() {
    let (clock, sched) = shared_scheduler();
    let mut ctrl = ScrollController::new(sched, 37.0).unwrap();
    ctrl.play();

    // Deterministic pseudo-random event stream
    let mut seed: u32 = 0x2545_f491;
    for _ in 0..5_000 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        match (seed >> 16) % 5 {
            0 => {
                clock.advance(Duration::from_millis(((seed >> 8) % 40) as u64));
                ctrl.poll();
            }
            1 => {
                ctrl.step_forward();
            }
            2 | 3 => {
                ctrl.step_backward();
            }
            _ => {
                ctrl.reset();
            }
        }
        assert!(ctrl.offset() >= 0.0);
    }
}

#[test]
fn test_controllers_sharing_a_scheduler() {
    let (clock, sched) = shared_scheduler();
    let mut inline = ScrollController::new(sched.clone(), 10.0).unwrap();
    let mut overlay = ScrollController::new(sched.clone(), 20.0).unwrap();

    inline.play();
    overlay.play();
    overlay.play();
    assert_eq!(sched.borrow().active(), 2);

    clock.advance(Duration::from_millis(100));
    assert_eq!(inline.poll().unwrap().offset, 4.0);
    assert_eq!(overlay.poll().unwrap().offset, 8.0);

    overlay.stop();
    assert_eq!(sched.borrow().active(), 1);
}

#[test]
fn test_dropping_a_playing_controller_releases_its_tick_source() {
    let (_clock, sched) = shared_scheduler();
    {
        let mut ctrl = ScrollController::new(sched.clone(), 10.0).unwrap();
        ctrl.play();
        assert_eq!(sched.borrow().active(), 1);
    }
    assert_eq!(sched.borrow().active(), 0);
}

#[test]
fn test_overlay_gesture_session() {
    let container = Extent::new(1280.0, 800.0);
    let mut frame = WindowFrame::centered_in(container);
    assert_eq!(frame.position, Point::new(640.0, 400.0));

    frame.drag_changed(Point::new(640.0, 300.0));
    frame.drag_changed(Point::new(600.0, 320.0));
    frame.drag_ended();
    assert_eq!(frame.position, Point::new(600.0, 420.0));

    frame.magnify(1.5, container);
    assert_eq!(frame.size, Extent::new(450.0, 300.0));

    frame.toggle_lock();
    frame.drag_changed(Point::new(0.0, 0.0));
    frame.drag_changed(Point::new(100.0, 100.0));
    frame.magnify(3.0, container);
    assert_eq!(frame.position, Point::new(600.0, 420.0));
    assert_eq!(frame.size, Extent::new(450.0, 300.0));
}

#[test]
fn test_frame_serialization_skips_drag_reference() {
    let mut frame = WindowFrame::centered_in(Extent::new(400.0, 400.0));
    frame.drag_changed(Point::new(5.0, 5.0));
    let json = serde_json::to_string(&frame).unwrap();
    assert!(!json.contains("last_drag"));

    let back: WindowFrame = serde_json::from_str(&json).unwrap();
    assert_eq!(back.position, frame.position);
    assert_eq!(back.last_drag(), None);
}

#[test]
fn test_drag_during_playback_then_run_to_the_end() {
    let (clock, sched) = shared_scheduler();
    let mut ctrl = ScrollController::new(sched, 10.0).unwrap();
    let end = 60.0;
    ctrl.play();

    for _ in 0..20 {
        clock.advance(ctrl.interval());
        ctrl.poll();
    }
    assert_eq!(ctrl.offset(), 20.0);

    // Pointer moves up 15 then down 40: content follows, no ticks land
    ctrl.begin_drag();
    ctrl.drag_scroll(15.0);
    clock.advance(Duration::from_secs(1));
    assert!(ctrl.poll().is_none());
    ctrl.drag_scroll(-40.0);
    assert_eq!(ctrl.offset(), 0.0);
    ctrl.end_drag();
    assert!(ctrl.is_ticking());

    // Playback keeps going but the offset stays pinned to the last line
    for _ in 0..200 {
        clock.advance(ctrl.interval());
        ctrl.poll();
        ctrl.clamp_to_end(end);
        assert!(ctrl.offset() <= end);
    }
    assert_eq!(ctrl.offset(), end);
    assert!(ctrl.is_playing());
}
