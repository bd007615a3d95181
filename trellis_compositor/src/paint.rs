// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset and scissor state, and the clipped drawing primitives built on it.

use trellis_atlas::{
    FontId, GlyphCache, GlyphKey, GlyphMetrics, IconCache, IconId, Pixmap, RasterSource,
};
use trellis_rect::Rect;

use crate::{Backend, Color};

/// Glyph rasterizer shared by a canvas.
pub type GlyphSource = dyn RasterSource<GlyphKey, GlyphMetrics> + Send;

/// Icon rasterizer shared by a canvas.
pub type IconSource = dyn RasterSource<IconId, ()> + Send;

/// Current translation and scissor of a canvas.
///
/// Drawing is only possible between [`begin`](Self::begin) and [`end`](Self::end).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClipState {
    bounds: Rect,
    offset: (i32, i32),
    scissor: Rect,
    began: bool,
}

/// A saved [`ClipState`] offset and scissor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SavedClip {
    offset: (i32, i32),
    scissor: Rect,
}

impl ClipState {
    /// Idle state for a canvas covering `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            offset: (0, 0),
            scissor: Rect::EMPTY,
            began: false,
        }
    }

    /// Change the canvas bounds.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Open a paint bracket over `rect`.
    ///
    /// Resets the offset, sets the scissor to `rect` clipped to the canvas bounds, and
    /// returns that scissor. Returns `None` when a bracket is already open or nothing of
    /// `rect` is on the canvas.
    pub fn begin(&mut self, rect: Rect) -> Option<Rect> {
        if self.began {
            return None;
        }
        let scissor = rect.intersection(&self.bounds)?;
        self.offset = (0, 0);
        self.scissor = scissor;
        self.began = true;
        Some(scissor)
    }

    /// Close the paint bracket.
    pub fn end(&mut self) {
        self.began = false;
        self.offset = (0, 0);
        self.scissor = Rect::EMPTY;
    }

    /// Whether a paint bracket is open.
    pub fn began(&self) -> bool {
        self.began
    }

    /// Current translation.
    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }

    /// Current scissor in canvas coordinates.
    pub fn scissor(&self) -> Rect {
        self.scissor
    }

    /// Capture the offset and scissor.
    pub fn save(&self) -> SavedClip {
        SavedClip {
            offset: self.offset,
            scissor: self.scissor,
        }
    }

    /// Put back a captured offset and scissor.
    pub fn restore(&mut self, saved: SavedClip) {
        self.offset = saved.offset;
        self.scissor = saved.scissor;
    }

    /// Move the origin to the top-left of `area` (canvas coordinates) and narrow the scissor
    /// to it. Returns `false`, leaving the state untouched, when nothing of `area` remains
    /// visible.
    pub fn narrow(&mut self, area: Rect) -> bool {
        let Some(scissor) = self.scissor.intersection(&area) else {
            return false;
        };
        self.offset = (area.left, area.top);
        self.scissor = scissor;
        true
    }

    /// Map `rect` from the current origin to canvas coordinates and clip it.
    fn resolve(&self, rect: Rect) -> Option<Rect> {
        if !self.began {
            return None;
        }
        rect.offset(self.offset.0, self.offset.1)
            .intersection(&self.scissor)
    }

    /// Clip a `src` block of `pixmap` drawn at `(x, y)`. Returns the destination origin and
    /// the remaining source block.
    fn resolve_copy(&self, x: i32, y: i32, pixmap: &Pixmap, src: Rect) -> Option<(i32, i32, Rect)> {
        let src = src.intersection(&pixmap.bounds())?;
        let dst = Rect::from_xywh(x, y, src.width(), src.height());
        let clipped = self.resolve(dst)?;
        let (dx, dy) = (
            x.saturating_add(self.offset.0),
            y.saturating_add(self.offset.1),
        );
        let src = Rect::from_xywh(
            src.left + (clipped.left - dx),
            src.top + (clipped.top - dy),
            clipped.width(),
            clipped.height(),
        );
        Some((clipped.left, clipped.top, src))
    }
}

/// Clipped drawing primitives.
///
/// Coordinates are relative to the current origin, which during a widget's draw is the
/// widget's top-left corner. Everything outside the current scissor is discarded, and
/// nothing at all is drawn outside a paint bracket.
pub trait Paint {
    /// Fill `rect`.
    fn draw_box(&mut self, rect: Rect, color: Color);

    /// Draw a one-pixel line between two inclusive end points.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);

    /// Copy `src` from `pixmap` to `(x, y)`.
    fn blit(&mut self, x: i32, y: i32, pixmap: &Pixmap, src: Rect);

    /// Composite `src` from `pixmap` over the target at `(x, y)`.
    fn blend(&mut self, x: i32, y: i32, pixmap: &Pixmap, src: Rect);

    /// Draw `text` with its top-left pen position at `(x, y)` and return its advance width.
    ///
    /// Glyphs that cannot be rasterized or cached take no space.
    fn draw_string(&mut self, x: i32, y: i32, font: FontId, color: Color, text: &str) -> i32;

    /// Composite a cached icon at `(x, y)`. Returns `false` if the icon is unavailable.
    fn draw_icon(&mut self, x: i32, y: i32, icon: IconId) -> bool;
}

/// The [`Paint`] implementation over a canvas backend.
pub struct Surface<'a, B: Backend> {
    pub(crate) backend: &'a mut B,
    pub(crate) clip: &'a mut ClipState,
    pub(crate) glyphs: &'a mut GlyphCache,
    pub(crate) glyph_source: Option<&'a mut GlyphSource>,
    pub(crate) icons: &'a mut IconCache,
    pub(crate) icon_source: Option<&'a mut IconSource>,
}

impl<B: Backend> core::fmt::Debug for Surface<'_, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Surface")
            .field("clip", &self.clip)
            .field("glyphs", &self.glyphs.len())
            .field("icons", &self.icons.len())
            .finish_non_exhaustive()
    }
}

impl<B: Backend> Surface<'_, B> {
    /// The clip state in effect.
    pub fn clip(&self) -> &ClipState {
        &*self.clip
    }
}

/// Minor-axis step reached after `k` major-axis steps, rounded to the nearest pixel.
fn minor_step(k: i64, minor_len: i64, major_len: i64) -> i64 {
    let num = 2 * i128::from(k) * i128::from(minor_len) + i128::from(major_len);
    let q = num / (2 * i128::from(major_len));
    i64::try_from(q).unwrap_or(minor_len)
}

impl<B: Backend> Paint for Surface<'_, B> {
    fn draw_box(&mut self, rect: Rect, color: Color) {
        if let Some(r) = self.clip.resolve(rect) {
            self.backend.draw_box(r, color);
        }
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        if x0 == x1 || y0 == y1 {
            let r = Rect::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1));
            self.draw_box(r, color);
            return;
        }
        if !self.clip.began() {
            return;
        }
        let scissor = self.clip.scissor();
        let (ox, oy) = self.clip.offset();
        let (ax, ay) = (i64::from(x0) + i64::from(ox), i64::from(y0) + i64::from(oy));
        let (bx, by) = (i64::from(x1) + i64::from(ox), i64::from(y1) + i64::from(oy));
        if ax.max(bx) < i64::from(scissor.left)
            || ax.min(bx) > i64::from(scissor.right)
            || ay.max(by) < i64::from(scissor.top)
            || ay.min(by) > i64::from(scissor.bottom)
        {
            return;
        }

        // Step along the longer axis, but only over the stretch the scissor covers.
        let x_major = (bx - ax).abs() >= (by - ay).abs();
        let (major, minor, lo, hi) = if x_major {
            ((ax, bx), (ay, by), scissor.left, scissor.right)
        } else {
            ((ay, by), (ax, bx), scissor.top, scissor.bottom)
        };
        let (major_len, minor_len) = ((major.1 - major.0).abs(), (minor.1 - minor.0).abs());
        let (s_major, s_minor) = ((major.1 - major.0).signum(), (minor.1 - minor.0).signum());
        let (lo, hi) = (i64::from(lo), i64::from(hi));
        let (first, last) = if s_major > 0 {
            (lo - major.0, hi - major.0)
        } else {
            (major.0 - hi, major.0 - lo)
        };
        for k in first.max(0)..=last.min(major_len) {
            let m = major.0 + s_major * k;
            let n = minor.0 + s_minor * minor_step(k, minor_len, major_len);
            let (x, y) = if x_major { (m, n) } else { (n, m) };
            if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y))
                && scissor.contains_point(x, y)
            {
                self.backend.draw_box(Rect::new(x, y, x, y), color);
            }
        }
    }

    fn blit(&mut self, x: i32, y: i32, pixmap: &Pixmap, src: Rect) {
        if let Some((dx, dy, src)) = self.clip.resolve_copy(x, y, pixmap, src) {
            self.backend.blit(dx, dy, pixmap, src);
        }
    }

    fn blend(&mut self, x: i32, y: i32, pixmap: &Pixmap, src: Rect) {
        if let Some((dx, dy, src)) = self.clip.resolve_copy(x, y, pixmap, src) {
            self.backend.blend(dx, dy, pixmap, src);
        }
    }

    fn draw_string(&mut self, x: i32, y: i32, font: FontId, color: Color, text: &str) -> i32 {
        if !self.clip.began() {
            return 0;
        }
        let mut pen = x;
        for code_point in text.chars() {
            let key = GlyphKey::new(font, code_point);
            let entry = match self.glyph_source.as_deref_mut() {
                Some(source) => self.glyphs.fetch(key, source),
                None => self.glyphs.get(&key),
            };
            // Missing glyphs degrade to a zero-width placeholder.
            let Some(entry) = entry else { continue };
            if !entry.rect.is_empty() {
                let gx = pen.saturating_add(entry.metrics.bearing_x);
                let gy = y.saturating_add(entry.metrics.bearing_y);
                if let Some((dx, dy, src)) =
                    self.clip.resolve_copy(gx, gy, self.glyphs.atlas(), entry.rect)
                {
                    self.backend
                        .blend_glyph(dx, dy, self.glyphs.atlas(), src, color);
                }
            }
            pen = pen.saturating_add(entry.metrics.advance);
        }
        pen.saturating_sub(x)
    }

    fn draw_icon(&mut self, x: i32, y: i32, icon: IconId) -> bool {
        if !self.clip.began() {
            return false;
        }
        let entry = match self.icon_source.as_deref_mut() {
            Some(source) => self.icons.fetch(icon, source),
            None => self.icons.get(&icon),
        };
        let Some(entry) = entry else {
            return false;
        };
        if let Some((dx, dy, src)) = self.clip.resolve_copy(x, y, self.icons.atlas(), entry.rect) {
            self.backend.blend(dx, dy, self.icons.atlas(), src);
        }
        true
    }
}
