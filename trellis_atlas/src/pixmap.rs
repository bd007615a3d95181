// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel formats and CPU pixel buffers.

use alloc::vec;
use alloc::vec::Vec;
use trellis_rect::Rect;

/// Pixel layout shared by caches, canvases, and backends.
///
/// The discriminants are fixed wire values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PixelFormat {
    /// Single 8-bit coverage/alpha channel.
    A8 = 0,
    /// 8-bit red, green, blue.
    Rgb8 = 1,
    /// 8-bit red, green, blue, alpha (straight alpha).
    Rgba8 = 2,
}

impl PixelFormat {
    /// The wire code of this format.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::A8),
            1 => Some(Self::Rgb8),
            2 => Some(Self::Rgba8),
            _ => None,
        }
    }

    /// Bytes used by one pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::A8 => 1,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Expand one pixel in this format to RGBA.
    ///
    /// Coverage-only pixels become white with the coverage as alpha.
    #[inline]
    pub fn to_rgba(self, px: &[u8]) -> [u8; 4] {
        match self {
            Self::A8 => [0xff, 0xff, 0xff, px[0]],
            Self::Rgb8 => [px[0], px[1], px[2], 0xff],
            Self::Rgba8 => [px[0], px[1], px[2], px[3]],
        }
    }

    /// Store an RGBA value into one pixel in this format.
    #[inline]
    pub fn store_rgba(self, rgba: [u8; 4], out: &mut [u8]) {
        match self {
            Self::A8 => out[0] = rgba[3],
            Self::Rgb8 => out[..3].copy_from_slice(&rgba[..3]),
            Self::Rgba8 => out[..4].copy_from_slice(&rgba),
        }
    }
}

/// Errors raised when creating or writing a [`Pixmap`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PixmapError {
    /// One of the dimensions is zero.
    #[error("pixmap dimensions must be non-zero, got {width}x{height}")]
    ZeroSized {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The byte size does not fit in memory or a coordinate does not fit in `i32`.
    #[error("pixmap of {width}x{height} is too large")]
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A pixel buffer does not match the declared dimensions.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Bytes required by the dimensions and format.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// A write targets pixels outside the pixmap.
    #[error("region {rect:?} lies outside the pixmap bounds {bounds:?}")]
    OutOfBounds {
        /// Region that was written.
        rect: Rect,
        /// Bounds of the pixmap.
        bounds: Rect,
    },
}

/// A CPU pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl core::fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

pub(crate) fn byte_len(width: u32, height: u32, format: PixelFormat) -> Result<usize, PixmapError> {
    if width == 0 || height == 0 {
        return Err(PixmapError::ZeroSized { width, height });
    }
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(PixmapError::TooLarge { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(format.bytes_per_pixel()))
        .ok_or(PixmapError::TooLarge { width, height })
}

impl Pixmap {
    /// Create a zero-filled pixmap.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, PixmapError> {
        let len = byte_len(width, height, format)?;
        Ok(Self {
            width,
            height,
            format,
            data: vec![0; len],
        })
    }

    /// Wrap existing pixels, row-major with no padding.
    pub fn from_pixels(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, PixmapError> {
        let expected = byte_len(width, height, format)?;
        if data.len() != expected {
            return Err(PixmapError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// The full pixmap as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        #[allow(
            clippy::cast_possible_wrap,
            reason = "dimensions are validated to fit in i32 at construction"
        )]
        Rect::from_xywh(0, 0, self.width as i32, self.height as i32)
    }

    fn offset_of(&self, x: i32, y: i32) -> Option<usize> {
        if !self.bounds().contains_point(x, y) {
            return None;
        }
        #[allow(clippy::cast_sign_loss, reason = "bounds check guarantees non-negative")]
        let (x, y) = (x as usize, y as usize);
        Some(y * self.stride() + x * self.format.bytes_per_pixel())
    }

    /// Read a pixel expanded to RGBA, or `None` outside the pixmap.
    pub fn pixel_rgba(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let off = self.offset_of(x, y)?;
        Some(self.format.to_rgba(&self.data[off..]))
    }

    /// Write an RGBA value into a pixel; writes outside the pixmap are ignored.
    pub fn set_pixel_rgba(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if let Some(off) = self.offset_of(x, y) {
            let format = self.format;
            format.store_rgba(rgba, &mut self.data[off..]);
        }
    }

    /// Fill the part of `rect` that lies inside the pixmap.
    pub fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]) {
        let Some(r) = rect.intersection(&self.bounds()) else {
            return;
        };
        for y in r.top..=r.bottom {
            for x in r.left..=r.right {
                self.set_pixel_rgba(x, y, rgba);
            }
        }
    }

    /// Copy a `width` x `height` block of `src_format` pixels to `(x, y)`, converting formats.
    ///
    /// The block must lie entirely inside the pixmap.
    pub fn write_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        src_format: PixelFormat,
        src: &[u8],
    ) -> Result<(), PixmapError> {
        let expected = byte_len(width, height, src_format)?;
        if src.len() != expected {
            return Err(PixmapError::BufferSize {
                expected,
                actual: src.len(),
            });
        }
        #[allow(
            clippy::cast_possible_wrap,
            reason = "byte_len rejects dimensions above i32::MAX"
        )]
        let rect = Rect::from_xywh(x, y, width as i32, height as i32);
        if !self.bounds().contains_rect(&rect) {
            return Err(PixmapError::OutOfBounds {
                rect,
                bounds: self.bounds(),
            });
        }
        let bpp = src_format.bytes_per_pixel();
        let src_stride = width as usize * bpp;
        for (row, line) in src.chunks_exact(src_stride).enumerate() {
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_possible_wrap,
                reason = "row < height which fits in i32"
            )]
            let dy = y + row as i32;
            for (col, px) in line.chunks_exact(bpp).enumerate() {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_possible_wrap,
                    reason = "col < width which fits in i32"
                )]
                let dx = x + col as i32;
                self.set_pixel_rgba(dx, dy, src_format.to_rgba(px));
            }
        }
        Ok(())
    }
}
