//! Browser binding: element lookup, touch listeners and the animation-frame loop.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, HtmlElement, TouchEvent, TouchList, Window};

use crate::animation::IndicatorFrame;
use crate::controller::{EventOutcome, GestureController, Surfaces};
use crate::error::{PullToRefreshError, Result};
use crate::options::PullToRefreshOptions;
use crate::refresh::{RefreshCallback, RefreshCoordinator, RefreshState};
use crate::state::TouchPoint;
use crate::surface::{FrameScheduler, IndicatorSink, ScrollContainer};

const OVERFLOW_Y: &str = "overflow-y";

type TouchHandler = fn(&mut GestureController, &[TouchPoint]) -> EventOutcome;

fn find_element(document: &Document, id: &str) -> Result<HtmlElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| PullToRefreshError::ElementNotFound { id: id.to_string() })?
        .dyn_into::<HtmlElement>()
        .map_err(|_| PullToRefreshError::NotAnHtmlElement { id: id.to_string() })
}

fn touch_points(list: &TouchList) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| TouchPoint::new(t.identifier(), t.screen_y() as f64))
        .collect()
}

/// The scroll container element.
pub struct ScrollArea {
    element: HtmlElement,
    // overflow-y as it was before the pull locked it
    saved_overflow: RefCell<Option<String>>,
}

impl ScrollArea {
    pub fn new(element: HtmlElement) -> Self {
        Self {
            element,
            saved_overflow: RefCell::new(None),
        }
    }
}

impl ScrollContainer for ScrollArea {
    fn scroll_top(&self) -> f64 {
        self.element.scroll_top() as f64
    }

    fn set_scroll_locked(&self, locked: bool) {
        let style = self.element.style();
        let mut saved = self.saved_overflow.borrow_mut();
        if locked {
            if saved.is_none() {
                *saved = Some(style.get_property_value(OVERFLOW_Y).unwrap_or_default());
                let _ = style.set_property(OVERFLOW_Y, "hidden");
            }
        } else if let Some(previous) = saved.take() {
            if previous.is_empty() {
                let _ = style.remove_property(OVERFLOW_Y);
            } else {
                let _ = style.set_property(OVERFLOW_Y, &previous);
            }
        }
    }
}

/// Publishes the indicator as `--offset` (px) and `--angle` (deg) custom properties.
pub struct CssIndicator {
    element: HtmlElement,
}

impl CssIndicator {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl IndicatorSink for CssIndicator {
    fn publish(&self, frame: IndicatorFrame) {
        let style = self.element.style();
        let _ = style.set_property("--offset", &format!("{}px", frame.offset));
        let _ = style.set_property("--angle", &format!("{}deg", frame.angle));
    }

    fn clear(&self) {
        let style = self.element.style();
        let _ = style.remove_property("--offset");
        let _ = style.remove_property("--angle");
    }
}

/// `requestAnimationFrame` driven tick loop with at most one pending frame.
pub struct AnimationFrameLoop {
    window: Window,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    pending: Cell<Option<i32>>,
}

impl AnimationFrameLoop {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: RefCell::new(None),
            pending: Cell::new(None),
        }
    }

    fn install(self: &Rc<Self>, controller: Weak<RefCell<GestureController>>) {
        let frame_loop = Rc::downgrade(self);
        let closure = Closure::wrap(Box::new(move |now_ms: f64| {
            let (Some(frame_loop), Some(controller)) = (frame_loop.upgrade(), controller.upgrade())
            else {
                return;
            };
            frame_loop.pending.set(None);
            controller.borrow_mut().tick(now_ms);
        }) as Box<dyn FnMut(f64)>);
        *self.callback.borrow_mut() = Some(closure);
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

impl FrameScheduler for AnimationFrameLoop {
    fn request_frame(&self) {
        if self.pending.get().is_some() {
            return;
        }
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => self.pending.set(Some(id)),
            Err(err) => warn!(?err, "requestAnimationFrame failed"),
        }
    }
}

impl Drop for AnimationFrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A pull-to-refresh gesture wired to two page elements.
///
/// Dropping it removes the touch listeners, stops the frame loop, restores
/// scrolling and clears the indicator. A refresh still running on the shared
/// state is picked up by the next mount over that state.
pub struct PullToRefresh {
    controller: Rc<RefCell<GestureController>>,
    frame_loop: Rc<AnimationFrameLoop>,
    scroll_area: HtmlElement,
    listeners: Vec<(&'static str, Closure<dyn FnMut(TouchEvent)>)>,
}

impl PullToRefresh {
    pub fn mount(options: &PullToRefreshOptions, on_refresh: RefreshCallback) -> Result<Self> {
        Self::mount_with_state(options, RefreshState::new(), on_refresh)
    }

    /// Like [`Self::mount`], reporting refreshes through an existing `state`.
    pub fn mount_with_state(
        options: &PullToRefreshOptions,
        state: RefreshState,
        on_refresh: RefreshCallback,
    ) -> Result<Self> {
        options.validate()?;
        let window = web_sys::window().ok_or(PullToRefreshError::NoWindow)?;
        let document = window.document().ok_or(PullToRefreshError::NoDocument)?;
        let scroll_area = find_element(&document, &options.scroll_area_id)?;
        let indicator = find_element(&document, &options.pull_to_refresh_id)?;

        let frame_loop = Rc::new(AnimationFrameLoop::new(window));
        let surfaces = Surfaces {
            container: Rc::new(ScrollArea::new(scroll_area.clone())),
            indicator: Rc::new(CssIndicator::new(indicator)),
            scheduler: frame_loop.clone(),
        };
        let coordinator = RefreshCoordinator::new(state, on_refresh);
        let controller = Rc::new(RefCell::new(GestureController::new(
            options,
            surfaces,
            coordinator,
        )?));
        frame_loop.install(Rc::downgrade(&controller));

        let mut mounted = Self {
            controller,
            frame_loop,
            scroll_area,
            listeners: Vec::new(),
        };
        mounted.listen("touchstart", GestureController::on_touch_start)?;
        mounted.listen("touchmove", GestureController::on_touch_move)?;
        mounted.listen("touchend", GestureController::on_touch_end)?;
        mounted.listen("touchcancel", GestureController::on_touch_cancel)?;
        debug!(
            scroll_area = %options.scroll_area_id,
            indicator = %options.pull_to_refresh_id,
            threshold = options.threshold_distance,
            "pull-to-refresh mounted"
        );
        Ok(mounted)
    }

    pub fn refreshing(&self) -> RefreshState {
        self.controller.borrow().refresh_state()
    }

    fn listen(&mut self, event: &'static str, handler: TouchHandler) -> Result<()> {
        let controller = Rc::downgrade(&self.controller);
        let closure = Closure::wrap(Box::new(move |e: TouchEvent| {
            let Some(controller) = controller.upgrade() else {
                return;
            };
            let touches = touch_points(&e.changed_touches());
            handler(&mut controller.borrow_mut(), &touches);
        }) as Box<dyn FnMut(TouchEvent)>);
        self.scroll_area
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push((event, closure));
        Ok(())
    }
}

impl Drop for PullToRefresh {
    fn drop(&mut self) {
        for (event, closure) in self.listeners.drain(..) {
            let _ = self
                .scroll_area
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        self.frame_loop.cancel();
        if let Ok(mut controller) = self.controller.try_borrow_mut() {
            controller.detach();
        }
        debug!("pull-to-refresh unmounted");
    }
}
