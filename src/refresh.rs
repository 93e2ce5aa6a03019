//! Refresh state and the coordinator that runs the caller's refresh.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::surface::FrameScheduler;

type Listener = Rc<dyn Fn(bool)>;

struct Inner {
    value: bool,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Observable "is refreshing" flag shared between the gesture and the caller.
///
/// Clones share the same cell. Listeners run after the cell is released, so
/// they may read, set or unsubscribe from inside a notification.
#[derive(Clone)]
pub struct RefreshState {
    inner: Rc<RefCell<Inner>>,
}

impl RefreshState {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value: false,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> bool {
        self.inner.borrow().value
    }

    /// Stores `value` and notifies listeners if it changed.
    pub fn set(&self, value: bool) {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        for listener in listeners {
            listener(value);
        }
    }

    /// Calls `listener` on every change until the returned guard is dropped.
    pub fn subscribe(&self, listener: impl Fn(bool) + 'static) -> Subscription {
        let listener: Listener = Rc::new(listener);
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, listener));
        Subscription {
            state: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for RefreshState {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for RefreshState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("RefreshState")
            .field("value", &inner.value)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

/// Keeps a [`RefreshState`] listener registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    state: Weak<RefCell<Inner>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.state.upgrade() {
            inner.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Caller-supplied refresh work. It receives the shared state and must
/// eventually set it to `false`.
pub type RefreshCallback = Rc<dyn Fn(RefreshState)>;

/// The default refresh: nothing to do, so it finishes at once.
pub fn finish_immediately() -> RefreshCallback {
    Rc::new(|refreshing: RefreshState| refreshing.set(false))
}

/// Starts refreshes and watches for their completion.
pub struct RefreshCoordinator {
    state: RefreshState,
    callback: RefreshCallback,
    subscription: Option<Subscription>,
    completed: Rc<Cell<bool>>,
}

impl RefreshCoordinator {
    pub fn new(state: RefreshState, callback: RefreshCallback) -> Self {
        Self {
            state,
            callback,
            subscription: None,
            completed: Rc::new(Cell::new(false)),
        }
    }

    pub fn state(&self) -> &RefreshState {
        &self.state
    }

    /// True from the start of a refresh until its completion has been consumed.
    pub fn is_active(&self) -> bool {
        self.state.get() || self.subscription.is_some()
    }

    /// Marks the state refreshing and hands it to the callback.
    ///
    /// Completion wakes `scheduler`; it is picked up by [`Self::take_completion`]
    /// on the next frame.
    pub fn begin(&mut self, scheduler: Rc<dyn FrameScheduler>) {
        // Subscribe first: the callback may finish synchronously.
        self.watch(scheduler);
        debug!("refresh started");
        self.state.set(true);
        (self.callback)(self.state.clone());
    }

    /// Takes over a refresh that is already running on the shared state,
    /// without invoking the callback again. Returns `false` if none is running.
    pub fn adopt(&mut self, scheduler: Rc<dyn FrameScheduler>) -> bool {
        if !self.state.get() || self.subscription.is_some() {
            return false;
        }
        self.watch(scheduler);
        debug!("watching a refresh started elsewhere");
        true
    }

    fn watch(&mut self, scheduler: Rc<dyn FrameScheduler>) {
        self.completed.set(false);
        let completed = self.completed.clone();
        self.subscription = Some(self.state.subscribe(move |refreshing| {
            if !refreshing {
                completed.set(true);
                scheduler.request_frame();
            }
        }));
    }

    /// Returns `true` once per finished refresh and drops the subscription.
    pub fn take_completion(&mut self) -> bool {
        if self.subscription.is_none() || !self.completed.get() {
            return false;
        }
        self.subscription = None;
        self.completed.set(false);
        debug!("refresh finished");
        true
    }
}

impl fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("state", &self.state)
            .field("subscribed", &self.subscription.is_some())
            .field("completed", &self.completed.get())
            .finish()
    }
}
