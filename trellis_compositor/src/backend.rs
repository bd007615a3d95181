// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering backend interface.

use trellis_atlas::{PixelFormat, Pixmap};
use trellis_rect::Rect;

use crate::{CanvasError, Color};

/// A render target the compositor draws into.
///
/// Every rectangle and position a backend receives has already been offset and clipped by
/// the compositor; backends must not transform it further. Source rectangles passed to
/// [`blit`](Self::blit), [`blend`](Self::blend), and [`blend_glyph`](Self::blend_glyph) lie
/// inside the source pixmap, and the destination block lies inside the paint rectangle
/// passed to [`begin`](Self::begin).
///
/// Releasing backend resources is `Drop`.
pub trait Backend: Send {
    /// Change the size of the render target.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        let _ = (width, height);
        Ok(())
    }

    /// Allocate a pixmap suitable for [`blit`](Self::blit) and [`blend`](Self::blend).
    fn create_pixmap(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Pixmap, CanvasError> {
        Ok(Pixmap::new(width, height, format)?)
    }

    /// Start painting inside `rect`.
    fn begin(&mut self, rect: Rect);

    /// Finish the paint started by [`begin`](Self::begin).
    fn end(&mut self);

    /// Overwrite `rect` with `color`.
    fn clear(&mut self, rect: Rect, color: Color);

    /// Fill `rect` with `color`, compositing when it is translucent.
    fn draw_box(&mut self, rect: Rect, color: Color);

    /// Copy `src` from `pixmap` to `(x, y)`.
    fn blit(&mut self, x: i32, y: i32, pixmap: &Pixmap, src: Rect);

    /// Composite `src` from `pixmap` over the target at `(x, y)`.
    fn blend(&mut self, x: i32, y: i32, pixmap: &Pixmap, src: Rect);

    /// Composite `color` at `(x, y)` using the alpha of `src` in `atlas` as coverage.
    fn blend_glyph(&mut self, x: i32, y: i32, atlas: &Pixmap, src: Rect, color: Color);
}
