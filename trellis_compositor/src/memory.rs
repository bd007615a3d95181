// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A backend that renders into CPU memory.

use trellis_atlas::{PixelFormat, Pixmap};
use trellis_rect::Rect;

use crate::{Backend, CanvasError, Color};

/// Renders into an RGBA8 [`Pixmap`] that can be read back.
///
/// Each paint bracket is recorded, so callers can see which regions were repainted.
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    framebuffer: Pixmap,
    painting: Option<Rect>,
    paints: Vec<Rect>,
}

#[allow(clippy::cast_possible_truncation, reason = "weighted mean of two u8 values")]
fn mix(s: u8, d: u8, a: u32) -> u8 {
    ((u32::from(s) * a + u32::from(d) * (255 - a) + 127) / 255) as u8
}

/// Straight-alpha source-over, with `src` alpha scaled by `coverage`.
fn over(dst: [u8; 4], src: [u8; 4], coverage: u8) -> [u8; 4] {
    let a = u32::from(src[3]) * u32::from(coverage) / 255;
    if a == 0 {
        return dst;
    }
    [
        mix(src[0], dst[0], a),
        mix(src[1], dst[1], a),
        mix(src[2], dst[2], a),
        mix(0xff, dst[3], a),
    ]
}

impl MemoryBackend {
    /// A transparent-black `width` x `height` framebuffer.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::ZeroSized { width, height });
        }
        Ok(Self {
            framebuffer: Pixmap::new(width, height, PixelFormat::Rgba8)?,
            painting: None,
            paints: Vec::new(),
        })
    }

    /// The rendered pixels.
    pub fn framebuffer(&self) -> &Pixmap {
        &self.framebuffer
    }

    /// Read one pixel.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.framebuffer.pixel_rgba(x, y).map(Color::from_array)
    }

    /// Overwrite the whole framebuffer, outside of any paint bracket.
    pub fn fill(&mut self, color: Color) {
        let bounds = self.framebuffer.bounds();
        self.framebuffer.fill_rect(bounds, color.to_array());
    }

    /// Whether a paint bracket is open.
    pub fn is_painting(&self) -> bool {
        self.painting.is_some()
    }

    /// Paint rectangles seen since the last call, in order.
    pub fn take_paints(&mut self) -> Vec<Rect> {
        core::mem::take(&mut self.paints)
    }

    fn composite_block(
        &mut self,
        x: i32,
        y: i32,
        src_pm: &Pixmap,
        src: Rect,
        mut pixel: impl FnMut([u8; 4], [u8; 4]) -> [u8; 4],
    ) {
        for sy in src.top..=src.bottom {
            for sx in src.left..=src.right {
                let Some(s) = src_pm.pixel_rgba(sx, sy) else {
                    continue;
                };
                let (dx, dy) = (x + sx - src.left, y + sy - src.top);
                if let Some(d) = self.framebuffer.pixel_rgba(dx, dy) {
                    self.framebuffer.set_pixel_rgba(dx, dy, pixel(d, s));
                }
            }
        }
    }
}

impl Backend for MemoryBackend {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        let mut next = Pixmap::new(width, height, PixelFormat::Rgba8)
            .map_err(|_| CanvasError::Resize { width, height })?;
        if let Some(keep) = self.framebuffer.bounds().intersection(&next.bounds()) {
            for y in keep.top..=keep.bottom {
                for x in keep.left..=keep.right {
                    if let Some(px) = self.framebuffer.pixel_rgba(x, y) {
                        next.set_pixel_rgba(x, y, px);
                    }
                }
            }
        }
        self.framebuffer = next;
        Ok(())
    }

    fn begin(&mut self, rect: Rect) {
        self.painting = Some(rect);
        self.paints.push(rect);
    }

    fn end(&mut self) {
        self.painting = None;
    }

    fn clear(&mut self, rect: Rect, color: Color) {
        self.framebuffer.fill_rect(rect, color.to_array());
    }

    fn draw_box(&mut self, rect: Rect, color: Color) {
        if color.a == 0xff {
            self.framebuffer.fill_rect(rect, color.to_array());
            return;
        }
        let Some(r) = rect.intersection(&self.framebuffer.bounds()) else {
            return;
        };
        for y in r.top..=r.bottom {
            for x in r.left..=r.right {
                if let Some(d) = self.framebuffer.pixel_rgba(x, y) {
                    self.framebuffer
                        .set_pixel_rgba(x, y, over(d, color.to_array(), 0xff));
                }
            }
        }
    }

    fn blit(&mut self, x: i32, y: i32, pixmap: &Pixmap, src: Rect) {
        self.composite_block(x, y, pixmap, src, |_, s| s);
    }

    fn blend(&mut self, x: i32, y: i32, pixmap: &Pixmap, src: Rect) {
        self.composite_block(x, y, pixmap, src, |d, s| over(d, s, 0xff));
    }

    fn blend_glyph(&mut self, x: i32, y: i32, atlas: &Pixmap, src: Rect, color: Color) {
        let color = color.to_array();
        self.composite_block(x, y, atlas, src, |d, s| over(d, color, s[3]));
    }
}
