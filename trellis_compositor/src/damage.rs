// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded dirty-rectangle tracking.

use smallvec::SmallVec;
use trellis_rect::Rect;

/// Most rectangles a [`DirtyRegion`] keeps before collapsing.
pub const MAX_DIRTY_RECTS: usize = 10;

/// Regions that must be repainted, in canvas coordinates.
///
/// Rectangles are clipped to the canvas bounds on insertion and merged into an existing
/// entry when they overlap or share an edge with it. When all [`MAX_DIRTY_RECTS`] slots are
/// taken and the new rectangle merges with none of them, the stored rectangles collapse into
/// their union and the new rectangle is kept beside it. The union of the stored rectangles
/// therefore always covers everything added since the last [`clear`](Self::clear).
#[derive(Clone, Debug)]
pub struct DirtyRegion {
    bounds: Rect,
    rects: SmallVec<[Rect; MAX_DIRTY_RECTS]>,
}

impl DirtyRegion {
    /// An empty region for a canvas covering `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            rects: SmallVec::new(),
        }
    }

    /// Canvas bounds used for clipping.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Change the canvas bounds, clipping what is already stored.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        let old = core::mem::take(&mut self.rects);
        for r in old {
            self.add(r);
        }
    }

    /// Mark `rect` dirty.
    pub fn add(&mut self, rect: Rect) {
        let Some(rect) = rect.intersection(&self.bounds) else {
            return;
        };
        if self.rects.iter_mut().any(|r| r.join(&rect, true)) {
            return;
        }
        if self.rects.len() < MAX_DIRTY_RECTS {
            self.rects.push(rect);
            return;
        }
        let mut union = self.rects[0];
        for r in &self.rects[1..] {
            union.join(r, false);
        }
        tracing::debug!(?union, ?rect, "dirty list full, collapsing");
        self.rects.clear();
        self.rects.push(union);
        self.rects.push(rect);
    }

    /// Mark the whole canvas dirty.
    pub fn add_all(&mut self) {
        self.rects.clear();
        self.rects.push(self.bounds);
    }

    /// Stored rectangles.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Number of stored rectangles.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Whether nothing is dirty.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Smallest rectangle covering all dirty regions.
    pub fn union(&self) -> Rect {
        self.rects.iter().fold(Rect::EMPTY, |acc, r| acc.union(r))
    }

    /// Forget all damage.
    pub fn clear(&mut self) {
        self.rects.clear();
    }
}
