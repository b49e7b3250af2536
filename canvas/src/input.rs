//! Input model: modifier keys, mouse buttons, cursor hints, and the gesture state machine.
//!
//! `Modifiers`, `Button`, `Key` and `WheelDelta` describe a raw host event.
//! `InputState` is the gesture being tracked between pointer-down and
//! pointer-up, carrying the context needed to recompute a note's geometry on
//! every pointer move and to decide on release whether anything changed.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::NoteId;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"n"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive comparison against a key name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Pointer cursor the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Grab,
    Grabbing,
    NwseResize,
    Text,
    Pointer,
}

impl CursorStyle {
    /// CSS `cursor` value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::NwseResize => "nwse-resize",
            Self::Text => "text",
            Self::Pointer => "pointer",
        }
    }
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The note whose text area currently has keyboard focus, if any.
    pub focused_id: Option<NoteId>,
    /// Last cursor style sent to the host.
    pub cursor: CursorStyle,
}

/// Internal state for the gesture state machine.
///
/// Each active variant carries gesture context needed to recompute geometry
/// on pointer-move and to detect a real change on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving a note across the canvas.
    DraggingNote {
        /// Id of the note being dragged.
        id: NoteId,
        /// Canvas-space offset from the note's top-left corner to the pointer at drag start.
        grab: Point,
        /// Note x at the start of the drag.
        orig_x: f64,
        /// Note y at the start of the drag.
        orig_y: f64,
    },
    /// The user is resizing a note from its bottom-right handle.
    ResizingNote {
        /// Id of the note being resized.
        id: NoteId,
        /// Screen-space pointer position at the start of the resize.
        start_screen: Point,
        /// Note width at the start of the resize.
        orig_w: f64,
        /// Note height at the start of the resize.
        orig_h: f64,
    },
    /// The user is panning the canvas by dragging empty space.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
}

impl InputState {
    /// A gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The note targeted by the gesture, if any.
    #[must_use]
    pub fn note_id(&self) -> Option<&NoteId> {
        match self {
            Self::DraggingNote { id, .. } | Self::ResizingNote { id, .. } => Some(id),
            Self::Idle | Self::Panning { .. } => None,
        }
    }
}
