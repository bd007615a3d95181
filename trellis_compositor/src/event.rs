// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window events.

/// Mouse button identifier.
pub type Button = u8;

/// Keys the router and common widgets care about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Focus traversal key.
    Tab,
    /// Return / Enter.
    Enter,
    /// Escape.
    Escape,
    /// Space bar.
    Space,
    /// Backspace.
    Backspace,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Any other key, by platform scan code.
    Other(u32),
}

/// Why focus moved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FocusReason {
    /// A pointer press. The focus ring is hidden.
    Pointer,
    /// Keyboard traversal. The focus ring is shown.
    Keyboard,
    /// An explicit request. The focus ring keeps its current visibility.
    Programmatic,
}

/// An event delivered to the canvas or to a widget.
///
/// Pointer positions arrive at the canvas in canvas coordinates; a widget receives them in
/// its own coordinate frame. Timestamps are milliseconds from an arbitrary epoch.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Pointer moved.
    MouseMove {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
        /// Timestamp in milliseconds.
        time: u64,
    },
    /// Button pressed.
    MousePress {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
        /// Button pressed.
        button: Button,
        /// Timestamp in milliseconds.
        time: u64,
    },
    /// Button released.
    MouseRelease {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
        /// Button released.
        button: Button,
        /// Timestamp in milliseconds.
        time: u64,
    },
    /// The pointer entered the widget. Never propagated.
    MouseEnter {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
    },
    /// The pointer left the widget. Never propagated.
    MouseLeave,
    /// Second click of a double click, delivered after its release.
    DoubleClick {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
        /// Button clicked.
        button: Button,
    },
    /// Key went down.
    KeyPressed(Key),
    /// Key went up.
    KeyReleased(Key),
    /// Text input.
    Char(char),
    /// The widget gained focus.
    Focus(FocusReason),
    /// The widget lost focus.
    FocusLose,
    /// A host timer fired.
    Timer {
        /// Host-defined timer id.
        id: u32,
        /// Timestamp in milliseconds.
        time: u64,
    },
    /// Host-defined notification.
    Custom(u64),
}

impl Event {
    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<(i32, i32)> {
        match *self {
            Self::MouseMove { x, y, .. }
            | Self::MousePress { x, y, .. }
            | Self::MouseRelease { x, y, .. }
            | Self::MouseEnter { x, y }
            | Self::DoubleClick { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    /// The same event with its pointer position moved by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        let mut ev = self.clone();
        match &mut ev {
            Self::MouseMove { x, y, .. }
            | Self::MousePress { x, y, .. }
            | Self::MouseRelease { x, y, .. }
            | Self::MouseEnter { x, y }
            | Self::DoubleClick { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            _ => {}
        }
        ev
    }

    /// Key and text events, which only go to the focused widget.
    pub fn is_keyboard(&self) -> bool {
        matches!(self, Self::KeyPressed(_) | Self::KeyReleased(_) | Self::Char(_))
    }
}
