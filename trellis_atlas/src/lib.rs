// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_atlas --heading-base-level=0

//! Trellis Atlas: grow-only glyph and icon caches over a shared texture atlas.
//!
//! The building blocks, leaves first:
//!
//! - [`PixelFormat`] and [`Pixmap`]: a CPU pixel buffer in one of three fixed formats
//!   (`A8 = 0`, `RGB8 = 1`, `RGBA8 = 2`), with format conversion on write and readback.
//! - [`ShelfAllocator`]: places rectangles left-to-right in rows, opening a new row when the
//!   current one is full. It never frees, compacts, or moves a placement.
//! - [`RbMap`]: an arena-indexed left-leaning red-black tree. Rotations and color flips are
//!   index swaps; lookup and insert are `O(log n)`.
//! - [`AtlasCache`]: ties the three together. [`AtlasCache::fetch`] searches the tree, and on
//!   a miss asks a [`RasterSource`] for pixels, reserves a placement, uploads the pixels into
//!   the atlas, and records the entry. Entries are never evicted.
//!
//! [`GlyphCache`] and [`IconCache`] are the two concrete variants: the first keyed by
//! `(font, code point)` and carrying [`GlyphMetrics`], the second keyed by an opaque [`IconId`].
//!
//! ## Example
//!
//! ```rust
//! use trellis_atlas::{
//!     FontId, GlyphCache, GlyphKey, GlyphMetrics, PixelFormat, Raster, RasterSource,
//! };
//!
//! /// Rasterizes every glyph as a solid 6x8 block.
//! struct Blocks;
//!
//! impl RasterSource<GlyphKey, GlyphMetrics> for Blocks {
//!     fn rasterize(&mut self, _key: &GlyphKey) -> Option<Raster<GlyphMetrics>> {
//!         Some(Raster::new(
//!             6,
//!             8,
//!             PixelFormat::A8,
//!             vec![0xff; 48],
//!             GlyphMetrics { advance: 7, bearing_x: 0, bearing_y: 0 },
//!         ))
//!     }
//! }
//!
//! let mut cache = GlyphCache::new(64, 64, PixelFormat::A8).unwrap();
//! let key = GlyphKey::new(FontId(0), 'a');
//! let first = cache.fetch(key, &mut Blocks).unwrap();
//! let again = cache.fetch(key, &mut Blocks).unwrap();
//! assert_eq!(first.rect, again.rect);
//! assert_eq!(cache.stats().rasterized, 1);
//! ```
//!
//! When the atlas is exhausted, `fetch` returns `None` and leaves the cache untouched; callers
//! are expected to degrade (for example, draw a zero-width placeholder) rather than fail.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cache;
mod pixmap;
mod rbtree;
mod shelf;

pub use cache::{
    AtlasCache, CacheEntry, CacheStats, FontId, GlyphCache, GlyphKey, GlyphMetrics, IconCache,
    IconId, Raster, RasterSource,
};
pub use pixmap::{PixelFormat, Pixmap, PixmapError};
pub use rbtree::RbMap;
pub use shelf::ShelfAllocator;
