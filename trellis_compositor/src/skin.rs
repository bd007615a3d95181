// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus-box rendering.

use trellis_rect::Rect;

use crate::{Color, Paint};

/// Look-and-feel hooks the compositor consults.
pub trait Skin: Send {
    /// How far the focus box extends beyond the focused widget, in pixels.
    fn focus_box_width(&self) -> i32;

    /// Draw the focus box. `rect` is the focused widget's canvas rectangle already grown by
    /// [`focus_box_width`](Self::focus_box_width); the paint origin is the canvas origin.
    fn draw_focus_box(&self, paint: &mut dyn Paint, rect: Rect);
}

/// A one-pixel outline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DefaultSkin {
    /// Gap between the widget and the outline, plus the outline itself.
    pub padding: i32,
    /// Outline color.
    pub color: Color,
}

impl Default for DefaultSkin {
    fn default() -> Self {
        Self {
            padding: 2,
            color: Color::BLACK,
        }
    }
}

impl Skin for DefaultSkin {
    fn focus_box_width(&self) -> i32 {
        self.padding
    }

    fn draw_focus_box(&self, paint: &mut dyn Paint, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let Rect {
            left,
            top,
            right,
            bottom,
        } = rect;
        paint.draw_line(left, top, right, top, self.color);
        paint.draw_line(left, bottom, right, bottom, self.color);
        paint.draw_line(left, top, left, bottom, self.color);
        paint.draw_line(right, top, right, bottom, self.color);
    }
}
