//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `UiState` holds the editor-wide toggles the panels expose.
//! `InputState` is the gesture tracked between pointer-down and pointer-up,
//! carrying what is needed to apply live updates and commit once on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::{ObjectId, PlacingObject};
use crate::hit::{Rect, ResizeAnchor};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Pointer,
    /// A palette template is armed; canvas clicks place it.
    Placing,
    /// Level management mode (level list and canvas size panels).
    Map,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
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

    /// Any modifier that turns a marquee into an additive/subtractive one.
    #[must_use]
    pub fn multi_select(self) -> bool {
        self.shift || self.command()
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
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"ArrowLeft"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive comparison for single-letter shortcuts.
    #[must_use]
    pub fn is_letter(&self, letter: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
    }
}

/// Persistent UI state visible to panels and the renderer.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Armed palette template, if any.
    pub placing: Option<PlacingObject>,
    /// Keep the template armed after a placement for repeated stamping.
    pub keep_after_placement: bool,
    /// Preserve aspect ratio when resizing.
    pub keep_aspect_ratio: bool,
    /// A save request is in flight.
    pub saving: bool,
    /// The object list differs from the last saved or loaded state.
    pub dirty: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::Pointer,
            placing: None,
            keep_after_placement: false,
            keep_aspect_ratio: true,
            saving: false,
            dirty: false,
        }
    }
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to compute deltas and
/// emit a single commit on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Rubber-band selection over empty canvas.
    Marquee {
        /// Level-space position of the pointer-down.
        start: Point,
        /// Level-space position of the latest pointer event.
        current: Point,
    },
    /// The user is moving the selected objects.
    DraggingObjects {
        /// World-space position of the pointer at drag start.
        start_world: Point,
        /// `(id, x, y)` of each dragged object at drag start.
        origins: Vec<(ObjectId, f64, f64)>,
    },
    /// The user is resizing one object by dragging one of its eight handles.
    ResizingObject {
        /// Id of the object being resized.
        id: ObjectId,
        /// Which corner/edge handle is being dragged.
        anchor: ResizeAnchor,
        /// World-space pointer position at the start of the resize.
        start_world: Point,
        /// Object box at the start of the resize.
        orig: Rect,
    },
}

impl InputState {
    /// The live marquee rectangle, normalized, while one is being drawn.
    #[must_use]
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self {
            Self::Marquee { start, current } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }
}
