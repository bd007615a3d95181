// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-based ("shelf") rectangle placement.

use trellis_rect::Rect;

/// Places rectangles left-to-right in rows.
///
/// When a request does not fit in the remaining width of the current row, a new row is
/// opened below it. Placements are never freed or moved.
#[derive(Clone, Debug)]
pub struct ShelfAllocator {
    width: i32,
    height: i32,
    next_x: i32,
    next_y: i32,
    row_height: i32,
}

impl ShelfAllocator {
    /// Create an allocator for a `width` x `height` area.
    ///
    /// Dimensions above `i32::MAX` are clamped.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
            next_x: 0,
            next_y: 0,
            row_height: 0,
        }
    }

    /// Reserve a `w` x `h` region.
    ///
    /// Returns `None` for zero-sized requests and when the area is exhausted. A failed request
    /// leaves the allocator unchanged.
    pub fn alloc(&mut self, w: u32, h: u32) -> Option<Rect> {
        let w = i32::try_from(w).ok()?;
        let h = i32::try_from(h).ok()?;
        if w == 0 || h == 0 || w > self.width {
            return None;
        }

        let (mut x, mut y, mut row) = (self.next_x, self.next_y, self.row_height);
        if x.checked_add(w).is_none_or(|end| end > self.width) {
            y = y.checked_add(row)?;
            x = 0;
            row = 0;
        }
        if y.checked_add(h)? > self.height {
            return None;
        }

        self.next_x = x + w;
        self.next_y = y;
        self.row_height = row.max(h);
        Some(Rect::from_xywh(x, y, w, h))
    }

    /// Height consumed so far, including the open row.
    pub fn used_height(&self) -> u32 {
        u32::try_from(self.next_y + self.row_height).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::ShelfAllocator;
    use alloc::vec::Vec;
    use trellis_rect::Rect;

    #[test]
    fn fills_a_row_then_opens_the_next() {
        let mut s = ShelfAllocator::new(10, 10);
        assert_eq!(s.alloc(4, 3), Some(Rect::new(0, 0, 3, 2)));
        assert_eq!(s.alloc(4, 2), Some(Rect::new(4, 0, 7, 1)));
        // Only two columns left in the first row.
        assert_eq!(s.alloc(3, 2), Some(Rect::new(0, 3, 2, 4)));
        assert_eq!(s.used_height(), 5);
    }

    #[test]
    fn rejects_zero_and_oversized() {
        let mut s = ShelfAllocator::new(8, 8);
        assert_eq!(s.alloc(0, 4), None);
        assert_eq!(s.alloc(4, 0), None);
        assert_eq!(s.alloc(9, 1), None);
        assert_eq!(s.alloc(1, 9), None);
        assert_eq!(s.alloc(8, 8), Some(Rect::new(0, 0, 7, 7)));
    }

    #[test]
    fn full_atlas_leaves_state_untouched() {
        let mut s = ShelfAllocator::new(4, 4);
        assert!(s.alloc(4, 3).is_some());
        assert_eq!(s.alloc(2, 2), None);
        // The failed request must not have opened a row.
        assert_eq!(s.alloc(2, 1), Some(Rect::new(0, 3, 1, 3)));
    }

    #[test]
    fn placements_never_overlap() {
        let mut s = ShelfAllocator::new(64, 64);
        let mut seed: u32 = 0x2545_f491;
        let mut placed: Vec<Rect> = Vec::new();
        for _ in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let w = (seed >> 16) % 9 + 1;
            let h = (seed >> 8) % 7 + 1;
            if let Some(r) = s.alloc(w, h) {
                assert!(Rect::new(0, 0, 63, 63).contains_rect(&r), "{r:?} escapes");
                for p in &placed {
                    assert!(r.intersection(p).is_none(), "{r:?} overlaps {p:?}");
                }
                placed.push(r);
            }
        }
        assert!(!placed.is_empty(), "at least one placement succeeded");
    }
}
