// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget behaviour and the contexts handed to it.

use trellis_rect::Rect;
use trellis_widget_tree::{WidgetFlags, WidgetId};

use crate::{DirtyRegion, Event, Paint};

/// Whether a propagated event continues to the next widget.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Keep going.
    #[default]
    Continue,
    /// The event was consumed.
    Stop,
}

/// Behaviour attached to a widget in the tree.
///
/// Every method has a do-nothing default, so a widget implements only what it needs.
pub trait Widget: Send {
    /// Paint the widget. Coordinates are widget-local and clipped to the widget's area.
    fn draw(&mut self, ctx: &mut DrawCtx<'_>) {
        let _ = ctx;
    }

    /// Handle an event. Pointer positions are widget-local.
    fn window_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) -> Outcome {
        let _ = (ctx, event);
        Outcome::Continue
    }

    /// The widget's flags changed to `flags`.
    fn state_change(&mut self, flags: WidgetFlags) {
        let _ = flags;
    }

    /// The widget is being destroyed.
    fn destroy(&mut self) {}
}

/// Passed to [`Widget::draw`].
pub struct DrawCtx<'a> {
    pub(crate) paint: &'a mut dyn Paint,
    pub(crate) id: WidgetId,
    pub(crate) size: (i32, i32),
    pub(crate) focused: bool,
    pub(crate) hovered: bool,
}

impl core::fmt::Debug for DrawCtx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DrawCtx")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("focused", &self.focused)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl DrawCtx<'_> {
    /// Drawing primitives in widget-local coordinates.
    pub fn paint(&mut self) -> &mut dyn Paint {
        &mut *self.paint
    }

    /// The widget being drawn.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Width of the widget.
    pub fn width(&self) -> i32 {
        self.size.0
    }

    /// Height of the widget.
    pub fn height(&self) -> i32 {
        self.size.1
    }

    /// The widget's area in its own coordinates.
    pub fn local_rect(&self) -> Rect {
        Rect::from_xywh(0, 0, self.size.0, self.size.1)
    }

    /// Whether the widget holds keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the pointer is over the widget.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

/// Passed to [`Widget::window_event`].
pub struct EventCtx<'a> {
    pub(crate) id: WidgetId,
    pub(crate) rect: Rect,
    pub(crate) dirty: &'a mut DirtyRegion,
    pub(crate) focus_request: &'a mut Option<WidgetId>,
    pub(crate) focused: bool,
    pub(crate) hovered: bool,
}

impl core::fmt::Debug for EventCtx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventCtx")
            .field("id", &self.id)
            .field("rect", &self.rect)
            .field("focused", &self.focused)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl EventCtx<'_> {
    /// The widget receiving the event.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The widget's area in canvas coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Whether the widget holds keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the pointer is over the widget.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Repaint the whole widget.
    pub fn invalidate(&mut self) {
        self.dirty.add(self.rect);
    }

    /// Repaint part of the widget, given in widget-local coordinates.
    pub fn invalidate_rect(&mut self, local: Rect) {
        self.dirty.add(local.offset(self.rect.left, self.rect.top));
    }

    /// Repaint an arbitrary canvas region.
    pub fn add_dirty_rect(&mut self, rect: Rect) {
        self.dirty.add(rect);
    }

    /// Ask for keyboard focus once the current event has been handled.
    pub fn request_focus(&mut self) {
        *self.focus_request = Some(self.id);
    }
}
