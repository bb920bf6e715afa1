//! Capability interfaces connecting drawing sessions to the external map viewer.
//!
//! The map viewer owns the scene, the camera and the terrain picking. Sessions never reach
//! into it directly; they receive resolved [`PickEvent`]s from it and issue requests
//! through the [`MapViewer`] trait. Interaction modes form a stack with token discipline:
//! a session pops exactly the token it pushed, and only while that token is still on top,
//! so that externally driven changes (the user opening another tool) cannot be clobbered.

use serde::{Deserialize, Serialize};

use vespucci_types::GroundPoint;

use crate::draw::{PointId, ShapeId};

/// Mouse cursor requested over the map viewport.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorStyle {
    /// The viewer's default cursor.
    #[default]
    Default,
    /// Crosshair cursor shown while picking positions.
    Crosshair,
    /// Pointer cursor shown while selecting existing shapes.
    Pointer,
}

/// Interaction mode pushed onto the viewer's interaction stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    /// Free map navigation.
    Navigate,
    /// Picks feed a drawing session.
    DrawPick,
    /// Picks select shapes for deletion.
    DeletePick,
}

/// Token identifying one pushed interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionToken(u64);

/// Stack of interaction modes with pop-only-if-top token discipline.
///
/// Host viewers embed this to implement the stack part of [`MapViewer`]; it is also used
/// directly by the test double.
#[derive(Debug, Default)]
pub struct InteractionStack {
    entries: Vec<(InteractionToken, InteractionMode)>,
    next_token: u64,
}

impl InteractionStack {
    /// Pushes a mode and returns the token required to pop it again.
    pub fn push(&mut self, mode: InteractionMode) -> InteractionToken {
        self.next_token += 1;
        let token = InteractionToken(self.next_token);
        self.entries.push((token, mode));
        token
    }

    /// Pops the entry identified by the token, but only if it is still on top of the
    /// stack. Returns whether anything was popped.
    ///
    /// Popping a token that is not on top is a no-op, not an error: an externally driven
    /// state change may legitimately have replaced the top entry already.
    pub fn pop(&mut self, token: InteractionToken) -> bool {
        match self.entries.last() {
            Some((top, _)) if *top == token => {
                self.entries.pop();
                true
            }
            _ => {
                log::debug!("ignoring pop of interaction token {token:?}: not on top of stack");
                false
            }
        }
    }

    /// Mode currently on top of the stack.
    pub fn top(&self) -> Option<InteractionMode> {
        self.entries.last().map(|(_, mode)| *mode)
    }

    /// Number of entries on the stack.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

/// Reference to something the pick ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureRef {
    /// A committed shape.
    Shape(ShapeId),
    /// A point of the working list of the active drawing session.
    WorkingPoint(PointId),
}

/// A user interaction resolved by the map viewer into a ground position.
///
/// `ground_position` is `None` when the pick ray did not hit the rendered terrain; such
/// events are silently ignored by sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickEvent {
    /// Ground position under the cursor, if the pick could be resolved.
    pub ground_position: Option<GroundPoint>,
    /// Features under the cursor, frontmost first.
    pub hit_features: Vec<FeatureRef>,
}

impl PickEvent {
    /// Pick resolved to a ground position with nothing under the cursor.
    pub fn at(position: GroundPoint) -> Self {
        Self {
            ground_position: Some(position),
            hit_features: Vec::new(),
        }
    }

    /// Pick resolved to a ground position with the given features under the cursor.
    pub fn with_hits(position: GroundPoint, hit_features: Vec<FeatureRef>) -> Self {
        Self {
            ground_position: Some(position),
            hit_features,
        }
    }

    /// Pick that missed the rendered terrain.
    pub fn miss() -> Self {
        Self {
            ground_position: None,
            hit_features: Vec::new(),
        }
    }
}

/// Capabilities a drawing session requires from the hosting map viewer.
pub trait MapViewer {
    /// Pushes an interaction mode onto the viewer's stack.
    fn push_interaction_mode(&mut self, mode: InteractionMode) -> InteractionToken;

    /// Pops the interaction mode identified by the token if it is still on top.
    fn pop_interaction_mode(&mut self, token: InteractionToken) -> bool;

    /// Requests a cursor style over the map viewport.
    fn set_cursor_style(&mut self, cursor: CursorStyle);

    /// Asks the viewer to redraw as soon as convenient.
    fn request_repaint(&mut self);

    /// Amount of drag movement in the gesture that produced the current pick.
    ///
    /// Sessions use this to tell a click from the release at the end of a point drag.
    fn drag_gesture_count(&self) -> u32;

    /// Resets the drag movement counter after a gesture has been consumed.
    fn reset_drag_gesture_count(&mut self);
}

pub mod testing {
    //! Test doubles for code driving drawing sessions.

    use super::*;

    /// A [`MapViewer`] that records the requests made of it. Useful in tests of session
    /// logic, both here and in host applications.
    #[derive(Debug, Default)]
    pub struct RecordingViewer {
        stack: InteractionStack,
        cursor: CursorStyle,
        repaint_requests: u32,
        drag_count: u32,
    }

    impl RecordingViewer {
        /// Simulates drag movement reported by the gesture recognizer.
        pub fn set_drag_gesture_count(&mut self, count: u32) {
            self.drag_count = count;
        }

        /// The cursor style last requested.
        pub fn cursor(&self) -> CursorStyle {
            self.cursor
        }

        /// Number of repaint requests received.
        pub fn repaint_requests(&self) -> u32 {
            self.repaint_requests
        }

        /// Current interaction stack depth.
        pub fn stack_depth(&self) -> usize {
            self.stack.depth()
        }

        /// Mode on top of the interaction stack.
        pub fn top_mode(&self) -> Option<InteractionMode> {
            self.stack.top()
        }

        /// Pushes a mode as if another tool had taken over the viewer.
        pub fn push_external_mode(&mut self, mode: InteractionMode) -> InteractionToken {
            self.stack.push(mode)
        }
    }

    impl MapViewer for RecordingViewer {
        fn push_interaction_mode(&mut self, mode: InteractionMode) -> InteractionToken {
            self.stack.push(mode)
        }

        fn pop_interaction_mode(&mut self, token: InteractionToken) -> bool {
            self.stack.pop(token)
        }

        fn set_cursor_style(&mut self, cursor: CursorStyle) {
            self.cursor = cursor;
        }

        fn request_repaint(&mut self) {
            self.repaint_requests += 1;
        }

        fn drag_gesture_count(&self) -> u32 {
            self.drag_count
        }

        fn reset_drag_gesture_count(&mut self) {
            self.drag_count = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_requires_top_of_stack() {
        let mut stack = InteractionStack::default();
        let first = stack.push(InteractionMode::DrawPick);
        let second = stack.push(InteractionMode::DeletePick);

        // First is buried, popping it must not disturb the stack.
        assert!(!stack.pop(first));
        assert_eq!(stack.depth(), 2);

        assert!(stack.pop(second));
        assert!(stack.pop(first));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn pop_of_stale_token_is_a_no_op() {
        let mut stack = InteractionStack::default();
        let token = stack.push(InteractionMode::DrawPick);
        assert!(stack.pop(token));
        assert!(!stack.pop(token));
    }

    #[test]
    fn tokens_are_unique() {
        let mut stack = InteractionStack::default();
        let first = stack.push(InteractionMode::DrawPick);
        assert!(stack.pop(first));
        let second = stack.push(InteractionMode::DrawPick);
        assert_ne!(first, second);
    }
}
