// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grow-only caches over a shared atlas.

use alloc::vec::Vec;
use trellis_rect::Rect;

use crate::pixmap::byte_len;
use crate::{PixelFormat, Pixmap, PixmapError, RbMap, ShelfAllocator};

/// Opaque font identity supplied by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontId(pub u32);

/// Glyph cache key: font identity first, then code point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlyphKey {
    /// Font the glyph belongs to.
    pub font: FontId,
    /// Unicode scalar value.
    pub code_point: char,
}

impl GlyphKey {
    /// Create a key.
    pub const fn new(font: FontId, code_point: char) -> Self {
        Self { font, code_point }
    }
}

/// Per-glyph positioning data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphMetrics {
    /// Horizontal pen advance in pixels.
    pub advance: i32,
    /// Offset from the pen position to the left edge of the raster.
    pub bearing_x: i32,
    /// Offset from the line top to the top edge of the raster.
    pub bearing_y: i32,
}

/// Opaque icon identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IconId(pub u32);

/// Pixels produced for one cache key.
#[derive(Clone, Debug)]
pub struct Raster<M> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout of `pixels`.
    pub format: PixelFormat,
    /// Row-major pixel bytes.
    pub pixels: Vec<u8>,
    /// Metrics stored alongside the placement.
    pub metrics: M,
}

impl<M> Raster<M> {
    /// Bundle a raster.
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>, metrics: M) -> Self {
        Self {
            width,
            height,
            format,
            pixels,
            metrics,
        }
    }

    /// A raster with no pixels, such as a space.
    pub fn empty(metrics: M) -> Self {
        Self::new(0, 0, PixelFormat::A8, Vec::new(), metrics)
    }

    /// Whether the raster covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check that `pixels` holds exactly `width * height` pixels of `format`.
    pub fn validate(&self) -> Result<(), PixmapError> {
        let expected = byte_len(self.width, self.height, self.format)?;
        if self.pixels.len() != expected {
            return Err(PixmapError::BufferSize {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }
}

/// Produces pixels on a cache miss.
pub trait RasterSource<K, M> {
    /// Rasterize `key`, or return `None` if it has no image.
    fn rasterize(&mut self, key: &K) -> Option<Raster<M>>;
}

impl<K, M, F> RasterSource<K, M> for F
where
    F: FnMut(&K) -> Option<Raster<M>>,
{
    fn rasterize(&mut self, key: &K) -> Option<Raster<M>> {
        self(key)
    }
}

/// A cached placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<M> {
    /// Location in the atlas; empty for zero-sized rasters.
    pub rect: Rect,
    /// Metrics recorded at insertion.
    pub metrics: M,
}

/// Lookup counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the tree.
    pub hits: u64,
    /// Lookups that had to rasterize.
    pub misses: u64,
    /// Entries inserted.
    pub rasterized: u64,
    /// Misses that could not be cached (no raster, bad pixels, or a full atlas).
    pub failures: u64,
}

/// A grow-only cache that packs rasters into one atlas pixmap.
#[derive(Debug)]
pub struct AtlasCache<K, M> {
    entries: RbMap<K, CacheEntry<M>>,
    atlas: Pixmap,
    shelf: ShelfAllocator,
    stats: CacheStats,
}

/// Glyph rasters keyed by font and code point.
pub type GlyphCache = AtlasCache<GlyphKey, GlyphMetrics>;

/// Icon rasters keyed by id.
pub type IconCache = AtlasCache<IconId, ()>;

impl<K: Ord + Copy + core::fmt::Debug, M: Copy> AtlasCache<K, M> {
    /// Create a cache with an empty `width` x `height` atlas.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, PixmapError> {
        Ok(Self::with_atlas(Pixmap::new(width, height, format)?))
    }

    /// Create a cache that packs into an existing pixmap.
    ///
    /// The whole pixmap is treated as free space.
    pub fn with_atlas(atlas: Pixmap) -> Self {
        Self {
            entries: RbMap::new(),
            shelf: ShelfAllocator::new(atlas.width(), atlas.height()),
            atlas,
            stats: CacheStats::default(),
        }
    }

    /// Look up `key`, rasterizing and packing it on a miss.
    ///
    /// Returns `None` when the source has no image for `key`, the raster's pixel buffer does
    /// not match its size, or the atlas is full. The cache and its free space are left
    /// unchanged in those cases and a later call retries.
    pub fn fetch<S>(&mut self, key: K, source: &mut S) -> Option<CacheEntry<M>>
    where
        S: RasterSource<K, M> + ?Sized,
    {
        if let Some(entry) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Some(*entry);
        }
        self.stats.misses += 1;

        let Some(raster) = source.rasterize(&key) else {
            self.stats.failures += 1;
            return None;
        };
        let rect = if raster.is_empty() {
            Rect::EMPTY
        } else {
            if let Err(err) = raster.validate() {
                self.stats.failures += 1;
                tracing::debug!(?key, %err, "rejected raster");
                return None;
            }
            let Some(rect) = self.shelf.alloc(raster.width, raster.height) else {
                self.stats.failures += 1;
                tracing::debug!(?key, w = raster.width, h = raster.height, "atlas exhausted");
                return None;
            };
            if let Err(err) = self.atlas.write_pixels(
                rect.left,
                rect.top,
                raster.width,
                raster.height,
                raster.format,
                &raster.pixels,
            ) {
                // The placement is lost; shelf space is never reclaimed.
                self.stats.failures += 1;
                tracing::debug!(?key, %err, "atlas upload failed");
                return None;
            }
            rect
        };

        let entry = CacheEntry {
            rect,
            metrics: raster.metrics,
        };
        self.entries.insert(key, entry);
        self.stats.rasterized += 1;
        tracing::trace!(?key, ?rect, "cached raster");
        Some(entry)
    }

    /// Look up `key` without rasterizing.
    pub fn get(&self, key: &K) -> Option<CacheEntry<M>> {
        self.entries.get(key).copied()
    }

    /// The atlas pixmap that entry rects point into.
    pub fn atlas(&self) -> &Pixmap {
        &self.atlas
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookup counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Cached keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct Counting {
        calls: u32,
        size: u32,
    }

    impl RasterSource<GlyphKey, GlyphMetrics> for Counting {
        fn rasterize(&mut self, key: &GlyphKey) -> Option<Raster<GlyphMetrics>> {
            self.calls += 1;
            if key.code_point == ' ' {
                return Some(Raster::empty(GlyphMetrics {
                    advance: 4,
                    ..GlyphMetrics::default()
                }));
            }
            let n = (self.size * self.size) as usize;
            Some(Raster::new(
                self.size,
                self.size,
                PixelFormat::A8,
                vec![key.code_point as u8; n],
                GlyphMetrics {
                    advance: 8,
                    bearing_x: 1,
                    bearing_y: 0,
                },
            ))
        }
    }

    #[test]
    fn repeated_fetch_rasterizes_once() {
        let mut cache = GlyphCache::new(32, 32, PixelFormat::A8).unwrap();
        let mut src = Counting { calls: 0, size: 6 };
        let key = GlyphKey::new(FontId(3), 'x');
        let a = cache.fetch(key, &mut src).unwrap();
        let b = cache.fetch(key, &mut src).unwrap();
        assert_eq!(a, b);
        assert_eq!(src.calls, 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                rasterized: 1,
                failures: 0
            }
        );
        // Pixels landed where the entry says.
        let px = cache.atlas().pixel_rgba(a.rect.left, a.rect.top).unwrap();
        assert_eq!(px[3], b'x');
    }

    #[test]
    fn distinct_keys_get_disjoint_rects() {
        let mut cache = GlyphCache::new(64, 64, PixelFormat::A8).unwrap();
        let mut src = Counting { calls: 0, size: 5 };
        let mut rects = Vec::new();
        for (font, c) in [(0, 'a'), (0, 'b'), (1, 'a'), (2, 'z')] {
            rects.push(cache.fetch(GlyphKey::new(FontId(font), c), &mut src).unwrap().rect);
        }
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(a.intersection(b).is_none(), "{a:?} overlaps {b:?}");
            }
        }
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn zero_sized_raster_takes_no_space() {
        let mut cache = GlyphCache::new(8, 8, PixelFormat::A8).unwrap();
        let mut src = Counting { calls: 0, size: 8 };
        let space = cache.fetch(GlyphKey::new(FontId(0), ' '), &mut src).unwrap();
        assert!(space.rect.is_empty());
        assert_eq!(space.metrics.advance, 4);
        // The whole atlas is still available.
        assert!(cache.fetch(GlyphKey::new(FontId(0), 'm'), &mut src).is_some());
    }

    #[test]
    fn full_atlas_degrades_to_none() {
        let mut cache = GlyphCache::new(8, 8, PixelFormat::A8).unwrap();
        let mut src = Counting { calls: 0, size: 8 };
        assert!(cache.fetch(GlyphKey::new(FontId(0), 'a'), &mut src).is_some());
        assert!(cache.fetch(GlyphKey::new(FontId(0), 'b'), &mut src).is_none());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().failures, 1);
        // Failed keys are not cached; the next call asks again.
        assert!(cache.fetch(GlyphKey::new(FontId(0), 'b'), &mut src).is_none());
        assert_eq!(src.calls, 3);
    }

    #[test]
    fn malformed_raster_keeps_atlas_space() {
        let mut cache = GlyphCache::new(8, 8, PixelFormat::A8).unwrap();
        let mut source = |key: &GlyphKey| {
            // 'x' claims 4x4 but only carries three bytes.
            let len = if key.code_point == 'x' { 3 } else { 16 };
            Some(Raster::new(4, 4, PixelFormat::A8, vec![0xff; len], GlyphMetrics::default()))
        };
        let x = GlyphKey::new(FontId(0), 'x');
        for _ in 0..4 {
            assert!(cache.fetch(x, &mut source).is_none());
        }
        assert_eq!(cache.stats().failures, 4);
        assert!(cache.is_empty());

        // All four 4x4 slots of the atlas are still free.
        for c in ['a', 'b', 'c', 'd'] {
            assert!(
                cache.fetch(GlyphKey::new(FontId(0), c), &mut source).is_some(),
                "slot for {c}"
            );
        }
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn icon_cache_accepts_closures() {
        let mut cache = IconCache::new(16, 16, PixelFormat::Rgba8).unwrap();
        let mut source = |id: &IconId| {
            (id.0 != 0).then(|| Raster::new(2, 2, PixelFormat::Rgb8, vec![200; 12], ()))
        };
        assert!(cache.fetch(IconId(0), &mut source).is_none());
        let e = cache.fetch(IconId(7), &mut source).unwrap();
        assert_eq!(e.rect.width(), 2);
        assert_eq!(
            cache.atlas().pixel_rgba(e.rect.left, e.rect.top),
            Some([200, 200, 200, 255])
        );
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![IconId(7)]);
    }
}
