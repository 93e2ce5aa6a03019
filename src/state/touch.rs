// Single-touch tracking for the pull gesture.

/// One touch contact as seen by the gesture, independent of the platform event type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub identifier: i32,
    pub screen_y: f64,
}

impl TouchPoint {
    pub fn new(identifier: i32, screen_y: f64) -> Self {
        Self {
            identifier,
            screen_y,
        }
    }
}

/// The in-flight touch session. At most one touch is tracked at a time.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct TouchTracker {
    pub touch_id: Option<i32>,
    pub start_y: f64,
}

impl TouchTracker {
    pub fn is_active(&self) -> bool {
        self.touch_id.is_some()
    }

    /// Starts tracking `touch` unless another touch is already active.
    pub fn begin(&mut self, touch: &TouchPoint, scroll_top: f64) -> bool {
        if self.is_active() {
            return false;
        }
        self.touch_id = Some(touch.identifier);
        self.start_y = touch.screen_y + scroll_top;
        true
    }

    /// The entry in `touches` that belongs to the tracked touch, if any.
    pub fn find<'a>(&self, touches: &'a [TouchPoint]) -> Option<&'a TouchPoint> {
        let id = self.touch_id?;
        touches.iter().find(|t| t.identifier == id)
    }

    /// Ends the session if `touches` contains the tracked touch.
    pub fn release(&mut self, touches: &[TouchPoint]) -> bool {
        if self.find(touches).is_none() {
            return false;
        }
        self.touch_id = None;
        true
    }
}
