//! Pointer Drag Tracking
//!
//! Turns absolute pointer positions into drag deltas for the swipe fallback.
//! Decoupled from winit and the DOM: callers forward press/move/release with
//! plain coordinates.

/// Tracks one drag gesture at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerDrag {
    /// Last seen position while a drag is in progress
    last: Option<(f32, f32)>,
}

impl PointerDrag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag at `(x, y)`.
    pub fn press(&mut self, x: f32, y: f32) {
        self.last = Some((x, y));
    }

    /// Pointer moved to `(x, y)`. Returns the delta since the previous
    /// position while a drag is active.
    pub fn move_to(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (lx, ly) = self.last?;
        self.last = Some((x, y));
        Some((x - lx, y - ly))
    }

    /// End the drag (pointer up or cancel).
    pub fn release(&mut self) {
        self.last = None;
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}
