// SPDX-License-Identifier: MIT OR Apache-2.0
//! Normalized gesture events.
//!
//! Host adapters translate whatever their toolkit reports (trackpad scroll,
//! touch pinch, mouse drags) into [`GestureEvent`]s. The transform math in
//! [`crate::viewport`] only ever sees these.

use egui::{Pos2, Vec2};

/// One incremental gesture update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Screen-space translation since the previous update
    Pan {
        /// Movement in screen units
        delta: Vec2,
    },
    /// Scale change since the previous update, anchored at a focal point
    Pinch {
        /// Anchor in canvas coordinates
        focal: Pos2,
        /// Incremental factor, 1.0 means no change
        scale: f32,
    },
}

impl GestureEvent {
    /// Whether applying this event would change nothing
    pub fn is_noop(&self) -> bool {
        match *self {
            Self::Pan { delta } => delta == Vec2::ZERO,
            Self::Pinch { scale, .. } => scale == 1.0,
        }
    }
}

/// A per-platform producer of gesture events
pub trait GestureSource {
    /// Append the events observed since the last call
    fn collect_gestures(&mut self, out: &mut Vec<GestureEvent>);
}

impl GestureSource for Vec<GestureEvent> {
    fn collect_gestures(&mut self, out: &mut Vec<GestureEvent>) {
        out.append(self);
    }
}

/// Latches a modifier predicate for the lifetime of one drag.
///
/// The predicate is sampled once when the drag starts; releasing the modifier
/// mid-drag does not turn a pan into an edit, and pressing it mid-drag does not
/// turn an edit into a pan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierPanGate {
    active: bool,
}

impl ModifierPanGate {
    /// A drag started; `predicate` is the modifier state right now
    pub fn begin(&mut self, predicate: bool) -> bool {
        self.active = predicate;
        self.active
    }

    /// The current drag pans the viewport
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The drag ended
    pub fn end(&mut self) {
        self.active = false;
    }

    /// Route a drag delta: a pan event when the gate is open, otherwise `None`
    pub fn filter(&self, delta: Vec2) -> Option<GestureEvent> {
        self.active.then_some(GestureEvent::Pan { delta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{ViewportController, ViewportState};
    use egui::{pos2, vec2};

    #[test]
    fn test_gate_latches_at_start() {
        let mut gate = ModifierPanGate::default();
        assert!(!gate.is_active());

        assert!(gate.begin(true));
        assert_eq!(gate.filter(vec2(3.0, 4.0)), Some(GestureEvent::Pan { delta: vec2(3.0, 4.0) }));
        gate.end();
        assert!(gate.filter(vec2(3.0, 4.0)).is_none());

        assert!(!gate.begin(false));
        assert!(gate.filter(vec2(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_vec_source_drains() {
        let mut source = vec![
            GestureEvent::Pan { delta: vec2(1.0, 0.0) },
            GestureEvent::Pinch { focal: pos2(5.0, 5.0), scale: 1.1 },
        ];
        let mut events = Vec::new();
        source.collect_gestures(&mut events);
        assert_eq!(events.len(), 2);
        assert!(source.is_empty());
    }

    #[test]
    fn test_dropped_update_leaves_state_consistent() {
        let controller = ViewportController::default();
        let updates = [
            GestureEvent::Pan { delta: vec2(4.0, 0.0) },
            GestureEvent::Pan { delta: vec2(6.0, 2.0) },
            GestureEvent::Pan { delta: vec2(-1.0, 1.0) },
        ];

        let all = controller.apply_all(ViewportState::default(), &updates).unwrap();
        let dropped = controller
            .apply_all(ViewportState::default(), [&updates[0], &updates[2]])
            .unwrap();

        // Missing the middle update only loses that update's motion
        assert_eq!(all.pan - dropped.pan, vec2(6.0, 2.0));
        assert_eq!(dropped.zoom, all.zoom);
    }

    #[test]
    fn test_noop_detection() {
        assert!(GestureEvent::Pan { delta: Vec2::ZERO }.is_noop());
        assert!(GestureEvent::Pinch { focal: Pos2::ZERO, scale: 1.0 }.is_noop());
        assert!(!GestureEvent::Pinch { focal: Pos2::ZERO, scale: 1.2 }.is_noop());
    }
}
