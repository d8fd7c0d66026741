//! Hides the header while the reader scrolls down and brings it back on any
//! upward scroll.

/// Scroll offset below which the header always stays visible.
pub const REVEAL_ZONE: f64 = 100.0;

#[derive(Clone, Debug, Default)]
pub struct SmartHeader {
    last_y: f64,
}

impl SmartHeader {
    pub fn new(initial_y: f64) -> SmartHeader {
        SmartHeader { last_y: initial_y }
    }

    /// Records a scroll to `y` and returns whether the header should be
    /// hidden.
    pub fn on_scroll(&mut self, y: f64) -> bool {
        let hidden = y > self.last_y && y > REVEAL_ZONE;
        self.last_y = y;
        hidden
    }
}
