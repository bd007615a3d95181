// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas errors.

use trellis_atlas::PixmapError;

/// Errors raised while creating or resizing a canvas.
///
/// Empty intersections, off-canvas rectangles, a full dirty list, and a full atlas are not
/// errors; those degrade quietly.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// One of the dimensions is zero.
    #[error("canvas dimensions must be non-zero, got {width}x{height}")]
    ZeroSized {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The backend refused a resize.
    #[error("backend cannot resize to {width}x{height}")]
    Resize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A pixmap could not be created.
    #[error(transparent)]
    Pixmap(#[from] PixmapError),
}
