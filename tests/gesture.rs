use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pull_to_refresh::animation::Phase;
use pull_to_refresh::surface::{FrameScheduler, IndicatorSink, ScrollContainer};
use pull_to_refresh::{
    EventOutcome, FrameStatus, GestureController, IgnoreReason, IndicatorFrame,
    PullToRefreshOptions, RefreshCallback, RefreshCoordinator, RefreshState, Release, Surfaces,
    TouchPoint,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Default)]
struct Container {
    scroll_top: Cell<f64>,
    locked: Cell<bool>,
}

impl ScrollContainer for Container {
    fn scroll_top(&self) -> f64 {
        self.scroll_top.get()
    }
    fn set_scroll_locked(&self, locked: bool) {
        self.locked.set(locked);
    }
}

#[derive(Default)]
struct Sink {
    frames: RefCell<Vec<IndicatorFrame>>,
    cleared: Cell<usize>,
}

impl IndicatorSink for Sink {
    fn publish(&self, frame: IndicatorFrame) {
        self.frames.borrow_mut().push(frame);
    }
    fn clear(&self) {
        self.cleared.set(self.cleared.get() + 1);
    }
}

#[derive(Default)]
struct Scheduler {
    requests: Cell<usize>,
}

impl FrameScheduler for Scheduler {
    fn request_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

/// A refresh callback that keeps the handle so the test can finish it later.
#[derive(Default)]
struct DeferredRefresh {
    calls: Cell<usize>,
    handle: RefCell<Option<RefreshState>>,
}

impl DeferredRefresh {
    fn callback(self: &Rc<Self>) -> RefreshCallback {
        let this = self.clone();
        Rc::new(move |state: RefreshState| {
            this.calls.set(this.calls.get() + 1);
            *this.handle.borrow_mut() = Some(state);
        })
    }

    fn finish(&self) {
        let state = self.handle.borrow_mut().take().expect("refresh was started");
        state.set(false);
    }
}

struct Fixture {
    controller: GestureController,
    container: Rc<Container>,
    sink: Rc<Sink>,
    scheduler: Rc<Scheduler>,
    refresh: Rc<DeferredRefresh>,
    transitions: Rc<RefCell<Vec<bool>>>,
    _watch: pull_to_refresh::Subscription,
    now: f64,
}

impl Fixture {
    fn new() -> Self {
        let container = Rc::new(Container::default());
        let sink = Rc::new(Sink::default());
        let scheduler = Rc::new(Scheduler::default());
        let refresh = Rc::new(DeferredRefresh::default());
        let state = RefreshState::new();
        let transitions = Rc::new(RefCell::new(Vec::new()));
        let watch = {
            let transitions = transitions.clone();
            state.subscribe(move |v| transitions.borrow_mut().push(v))
        };
        let surfaces = Surfaces {
            container: container.clone(),
            indicator: sink.clone(),
            scheduler: scheduler.clone(),
        };
        let options = PullToRefreshOptions::default().with_threshold(100.0);
        let controller = GestureController::new(
            &options,
            surfaces,
            RefreshCoordinator::new(state, refresh.callback()),
        )
        .expect("valid options");
        Self {
            controller,
            container,
            sink,
            scheduler,
            refresh,
            transitions,
            _watch: watch,
            now: 0.0,
        }
    }

    fn start(&mut self, id: i32, y: f64) -> EventOutcome {
        self.controller.on_touch_start(&[TouchPoint::new(id, y)])
    }

    fn drag(&mut self, id: i32, y: f64) -> EventOutcome {
        self.controller.on_touch_move(&[TouchPoint::new(id, y)])
    }

    fn end(&mut self, id: i32, y: f64) -> EventOutcome {
        self.controller.on_touch_end(&[TouchPoint::new(id, y)])
    }

    fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.controller.tick(self.now);
            self.now += FRAME_MS;
        }
    }

    fn until_still(&mut self) -> FrameStatus {
        for _ in 0..600 {
            let status = self.controller.tick(self.now);
            self.now += FRAME_MS;
            if status != FrameStatus::Animating {
                return status;
            }
        }
        panic!("animation never stopped");
    }

    fn targets(&self) -> (f64, f64) {
        let driver = self.controller.driver();
        (driver.offset().target(), driver.angle().target())
    }
}

#[test]
fn short_pull_is_not_armed() {
    let mut f = Fixture::new();
    assert_eq!(f.start(1, 100.0), EventOutcome::Started);
    let outcome = f.drag(1, 150.0);
    let EventOutcome::Dragged(state) = outcome else {
        panic!("expected a drag, got {outcome:?}");
    };
    assert_eq!(state.distance, 50.0);
    assert!(!state.should_refresh);
    assert_eq!(f.targets(), (25.0, 50.0));
}

#[test]
fn long_pull_is_armed_and_clamped() {
    let mut f = Fixture::new();
    f.start(1, 100.0);
    f.drag(1, 150.0);
    let EventOutcome::Dragged(state) = f.drag(1, 250.0) else {
        panic!("expected a drag");
    };
    assert!(state.should_refresh);
    assert_eq!(f.targets(), (50.0, 100.0));

    f.drag(1, 600.0);
    assert_eq!(f.targets(), (50.0, 100.0));
}

#[test]
fn armed_release_refreshes_then_settles_when_cleared() {
    let mut f = Fixture::new();
    f.start(1, 100.0);
    f.drag(1, 250.0);
    f.frames(5);

    assert_eq!(f.end(1, 250.0), EventOutcome::Released(Release::Refresh));
    assert!(!f.controller.tracker().is_active());
    assert!(f.controller.refresh_state().get());
    assert_eq!(f.refresh.calls.get(), 1);
    assert_eq!(*f.transitions.borrow(), vec![true]);

    f.frames(30);
    assert_eq!(f.controller.driver().phase(), Phase::Spinning);
    let spinning = f.controller.frame().angle;
    f.frames(10);
    assert!((f.controller.frame().angle - (spinning + 50.0)).abs() < 1e-9);
    assert!(f.controller.frame().offset > 0.0);

    f.refresh.finish();
    assert_eq!(*f.transitions.borrow(), vec![true, false]);
    assert_eq!(f.until_still(), FrameStatus::AtRest);
    assert_eq!(f.controller.frame(), IndicatorFrame::default());
    assert_eq!(f.controller.driver().phase(), Phase::Idle);
    assert_eq!(f.sink.cleared.get(), 1);
    assert_eq!(f.refresh.calls.get(), 1);
    // The coordinator dropped its listener; only the test's own remains.
    assert_eq!(f.controller.refresh_state().subscriber_count(), 1);
}

#[test]
fn move_while_scrolled_changes_nothing() {
    let mut f = Fixture::new();
    f.start(1, 100.0);
    f.drag(1, 180.0);
    let before = (f.controller.drag().state(), f.targets());

    f.container.scroll_top.set(10.0);
    assert_eq!(f.drag(1, 400.0), EventOutcome::Ignored(IgnoreReason::NotAtTop));
    assert_eq!((f.controller.drag().state(), f.targets()), before);
    // The session survives the scrolled move.
    assert!(f.controller.tracker().is_active());
}

#[test]
fn cancel_resolves_like_end() {
    let mut f = Fixture::new();
    f.start(4, 100.0);
    f.drag(4, 140.0);
    let outcome = f.controller.on_touch_cancel(&[TouchPoint::new(4, 140.0)]);
    assert_eq!(outcome, EventOutcome::Released(Release::Settle));
    assert!(!f.controller.tracker().is_active());
    assert!(!f.container.locked.get());
    assert_eq!(f.refresh.calls.get(), 0);
    assert!(f.transitions.borrow().is_empty());
    assert_eq!(f.until_still(), FrameStatus::AtRest);
    assert_eq!(f.controller.frame(), IndicatorFrame::default());
}

#[test]
fn unarmed_release_never_refreshes() {
    let mut f = Fixture::new();
    f.start(1, 0.0);
    f.drag(1, 150.0);
    f.drag(1, 40.0);
    assert_eq!(f.end(1, 40.0), EventOutcome::Released(Release::Settle));
    assert!(!f.controller.refresh_state().get());
    assert_eq!(f.refresh.calls.get(), 0);
}

#[test]
fn only_one_touch_is_tracked() {
    let mut f = Fixture::new();
    f.start(1, 100.0);
    assert_eq!(
        f.start(2, 100.0),
        EventOutcome::Ignored(IgnoreReason::SessionActive)
    );
    assert_eq!(f.drag(2, 400.0), EventOutcome::Ignored(IgnoreReason::UnknownTouch));
    assert_eq!(f.end(2, 400.0), EventOutcome::Ignored(IgnoreReason::UnknownTouch));
    assert!(f.controller.tracker().is_active());
    assert!(!f.controller.drag().should_refresh());

    let touches = [TouchPoint::new(2, 400.0), TouchPoint::new(1, 260.0)];
    assert!(matches!(
        f.controller.on_touch_move(&touches),
        EventOutcome::Dragged(state) if state.should_refresh
    ));
}

#[test]
fn upward_swipe_keeps_scrolling_unlocked() {
    let mut f = Fixture::new();
    f.start(1, 300.0);
    assert_eq!(f.drag(1, 200.0), EventOutcome::Ignored(IgnoreReason::UpwardSwipe));
    assert!(!f.container.locked.get());
    assert_eq!(f.targets(), (0.0, 0.0));
}

#[test]
fn new_pull_is_rejected_while_refreshing() {
    let mut f = Fixture::new();
    f.start(1, 0.0);
    f.drag(1, 200.0);
    f.end(1, 200.0);
    assert_eq!(
        f.start(2, 0.0),
        EventOutcome::Ignored(IgnoreReason::RefreshInProgress)
    );

    f.refresh.finish();
    f.until_still();
    assert_eq!(f.start(2, 0.0), EventOutcome::Started);
    assert!(!f.controller.drag().should_refresh());
}

#[test]
fn immediate_completion_settles_without_spinning_forever() {
    let container = Rc::new(Container::default());
    let sink = Rc::new(Sink::default());
    let scheduler = Rc::new(Scheduler::default());
    let surfaces = Surfaces {
        container: container.clone(),
        indicator: sink.clone(),
        scheduler: scheduler.clone(),
    };
    let mut controller = GestureController::new(
        &PullToRefreshOptions::default(),
        surfaces,
        RefreshCoordinator::new(RefreshState::new(), pull_to_refresh::refresh::finish_immediately()),
    )
    .expect("valid options");

    let mut now = 0.0;
    controller.on_touch_start(&[TouchPoint::new(0, 0.0)]);
    controller.on_touch_move(&[TouchPoint::new(0, 250.0)]);
    for _ in 0..5 {
        controller.tick(now);
        now += FRAME_MS;
    }
    assert_eq!(
        controller.on_touch_end(&[TouchPoint::new(0, 250.0)]),
        EventOutcome::Released(Release::Refresh)
    );
    assert!(!controller.refresh_state().get());
    let published_before_release = sink.frames.borrow().len();

    let mut status = FrameStatus::Animating;
    for _ in 0..600 {
        status = controller.tick(now);
        now += FRAME_MS;
        if status != FrameStatus::Animating {
            break;
        }
    }
    assert_eq!(status, FrameStatus::AtRest);
    assert_eq!(controller.frame(), IndicatorFrame::default());
    assert!(scheduler.requests.get() > 0);
    let frames = sink.frames.borrow();
    assert!(frames.len() > published_before_release);
    assert!(frames[published_before_release..].iter().any(|f| f.offset > 0.0));
    assert_eq!(sink.cleared.get(), 1);
}

#[test]
fn every_animating_tick_publishes_and_reschedules() {
    let mut f = Fixture::new();
    f.start(1, 0.0);
    f.drag(1, 80.0);
    let requests = f.scheduler.requests.get();
    let status = f.controller.tick(0.0);
    assert_eq!(status, FrameStatus::Animating);
    assert_eq!(f.sink.frames.borrow().len(), 1);
    assert_eq!(f.scheduler.requests.get(), requests + 1);
}
