//! Input model: mouse buttons, keys, action-menu choices and the interaction
//! state machine.
//!
//! `InteractionState` is transient UI state owned by the controller. It is
//! never persisted. Each variant carries what the next event needs: the press
//! offset that keeps a dragged item from jumping under the cursor, the time of
//! the last click for double-click detection, or the label draft being typed.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ItemId;
use crate::viewport::Point;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
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

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (`"Delete"`, `"Escape"`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Delete"
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.0 == "Enter"
    }
}

/// Choices offered by the per-item action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Start editing the label (also reveals it on commit).
    EditLabel,
    /// Hide the label without changing its text.
    HideLabel,
    Duplicate,
    /// Scale up by one step.
    Enlarge,
    /// Scale down by one step.
    Shrink,
    /// Rotate clockwise by one step.
    Rotate,
    Delete,
    Close,
}

/// A pointer press on a selected item that has not turned into a drag yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Press {
    /// Client position of the pointer-down.
    pub origin: Point,
    /// Pointer position minus the item's rendered center, captured at press.
    pub offset: Point,
}

/// Controller state between events.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// One item selected.
    Selected {
        id: ItemId,
        /// Timestamp of the click that may be the first half of a double click.
        armed_at_ms: Option<f64>,
        /// Set while the button is still held after selecting.
        press: Option<Press>,
    },
    /// The selected item follows the pointer.
    Dragging { id: ItemId, offset: Point },
    /// The action menu for `id` is open.
    ActionMenuOpen { id: ItemId },
    /// The label of `id` is being edited.
    EditingLabel { id: ItemId, draft: String },
}

impl InteractionState {
    /// Plain selection with no pending click or press.
    #[must_use]
    pub fn selected(id: ItemId) -> Self {
        Self::Selected { id, armed_at_ms: None, press: None }
    }

    /// The item this state refers to, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<ItemId> {
        match self {
            Self::Idle => None,
            Self::Selected { id, .. }
            | Self::Dragging { id, .. }
            | Self::ActionMenuOpen { id }
            | Self::EditingLabel { id, .. } => Some(*id),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
