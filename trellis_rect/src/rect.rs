// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Rect`] type and its algebra.

/// Axis-aligned rectangle with inclusive integer bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Leftmost column (inclusive).
    pub left: i32,
    /// Topmost row (inclusive).
    pub top: i32,
    /// Rightmost column (inclusive).
    pub right: i32,
    /// Bottommost row (inclusive).
    pub bottom: i32,
}

impl Default for Rect {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Rect {
    /// The canonical empty rectangle.
    pub const EMPTY: Self = Self::new(0, 0, -1, -1);

    /// Create a rectangle from inclusive corners.
    #[inline(always)]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from an origin and a size.
    ///
    /// A zero width or height yields an empty rectangle anchored at the origin.
    #[inline]
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x.saturating_add(width).saturating_sub(1),
            bottom: y.saturating_add(height).saturating_sub(1),
        }
    }

    /// Width in pixels; zero for empty rectangles, saturating at `i32::MAX`.
    #[inline]
    pub const fn width(&self) -> i32 {
        clamp_span(span(self.left, self.right))
    }

    /// Height in pixels; zero for empty rectangles, saturating at `i32::MAX`.
    #[inline]
    pub const fn height(&self) -> i32 {
        clamp_span(span(self.top, self.bottom))
    }

    /// Whether this rectangle covers no pixel at all.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// Inclusive point containment.
    #[doc(alias = "point_inside")]
    #[inline]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }

    /// Whether `other` lies entirely inside this rectangle.
    ///
    /// An empty `other` is contained by everything.
    #[inline]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.is_empty()
            || (self.left <= other.left
                && other.right <= self.right
                && self.top <= other.top
                && other.bottom <= self.bottom)
    }

    /// The overlap of two rectangles, or `None` when they share no pixel.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let r = Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        (!r.is_empty()).then_some(r)
    }

    /// The smallest rectangle covering both inputs. Empty inputs are ignored.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Whether the two rectangles overlap or share (part of) an edge.
    ///
    /// Rectangles that only meet diagonally at a corner do not touch.
    #[inline]
    pub fn touches(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let overlap_x = self.left <= other.right && other.left <= self.right;
        let overlap_y = self.top <= other.bottom && other.top <= self.bottom;
        let reach_x = self.left <= other.right.saturating_add(1)
            && other.left <= self.right.saturating_add(1);
        let reach_y = self.top <= other.bottom.saturating_add(1)
            && other.top <= self.bottom.saturating_add(1);
        (overlap_x && reach_y) || (reach_x && overlap_y)
    }

    /// Grow this rectangle to cover `other`.
    ///
    /// With `only_if_touch` set, the join only happens when the two rectangles overlap or share
    /// an edge; otherwise `self` is left unchanged and `false` is returned. Joining an empty
    /// `other` never changes `self` and reports `false`.
    pub fn join(&mut self, other: &Self, only_if_touch: bool) -> bool {
        if other.is_empty() {
            return false;
        }
        if only_if_touch && !self.touches(other) {
            return false;
        }
        *self = self.union(other);
        true
    }

    /// Translate by `(dx, dy)`. Edges saturate at the `i32` range.
    #[inline]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left.saturating_add(dx),
            top: self.top.saturating_add(dy),
            right: self.right.saturating_add(dx),
            bottom: self.bottom.saturating_add(dy),
        }
    }

    /// Grow outward by `amount` on every side (shrink when negative). Edges saturate at the
    /// `i32` range.
    #[inline]
    pub const fn inflate(&self, amount: i32) -> Self {
        Self {
            left: self.left.saturating_sub(amount),
            top: self.top.saturating_sub(amount),
            right: self.right.saturating_add(amount),
            bottom: self.bottom.saturating_add(amount),
        }
    }

    /// Number of pixels covered, widened to avoid overflow.
    #[inline]
    pub const fn area(&self) -> u64 {
        span(self.left, self.right).saturating_mul(span(self.top, self.bottom))
    }
}

/// Inclusive extent of `lo..=hi`, zero when inverted.
#[inline]
const fn span(lo: i32, hi: i32) -> u64 {
    let s = hi as i64 - lo as i64 + 1;
    if s > 0 { s as u64 } else { 0 }
}

#[inline]
const fn clamp_span(s: u64) -> i32 {
    if s > i32::MAX as u64 {
        i32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation, reason = "checked against i32::MAX above")]
        let s = s as i32;
        s
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;

    fn shares_point(a: &Rect, b: &Rect) -> bool {
        for y in -2..8 {
            for x in -2..8 {
                if a.contains_point(x, y) && b.contains_point(x, y) {
                    return true;
                }
            }
        }
        false
    }

    #[test]
    fn width_height_and_empty() {
        let r = Rect::new(10, 10, 20, 20);
        assert_eq!(r.width(), 11);
        assert_eq!(r.height(), 11);
        assert!(!r.is_empty());

        assert!(Rect::EMPTY.is_empty());
        assert_eq!(Rect::EMPTY.width(), 0);
        assert_eq!(Rect::new(5, 5, 4, 9).height(), 5);
        assert!(Rect::new(5, 5, 4, 9).is_empty());

        assert_eq!(Rect::from_xywh(3, 4, 10, 2), Rect::new(3, 4, 12, 5));
        assert!(Rect::from_xywh(3, 4, 0, 2).is_empty());
    }

    #[test]
    fn intersection_matches_shared_points() {
        // Small exhaustive sweep over rectangles inside a 6x6 window.
        let mut candidates = [Rect::EMPTY; 64];
        let mut n = 0;
        for &(l, r) in &[(0, 0), (0, 2), (1, 3), (3, 5), (4, 4), (2, 1), (5, 5), (0, 5)] {
            for &(t, b) in &[(0, 0), (0, 3), (2, 2), (3, 5), (1, 0), (4, 5), (0, 5), (2, 4)] {
                candidates[n] = Rect::new(l, t, r, b);
                n += 1;
            }
        }
        for a in &candidates {
            for b in &candidates {
                let got = a.intersection(b);
                assert_eq!(
                    got.is_some(),
                    shares_point(a, b),
                    "intersection of {a:?} and {b:?}"
                );
                if let Some(i) = got {
                    assert!(a.contains_rect(&i) && b.contains_rect(&i), "overlap escapes");
                }
            }
        }
    }

    #[test]
    fn join_only_if_touch() {
        let mut acc = Rect::new(0, 0, 9, 9);

        // Shares the right edge.
        assert!(acc.join(&Rect::new(10, 2, 15, 5), true));
        assert_eq!(acc, Rect::new(0, 0, 15, 9));

        // Diagonal corner contact is not an edge.
        let before = acc;
        assert!(!acc.join(&Rect::new(16, 10, 20, 20), true));
        assert_eq!(acc, before, "failed join must not modify acc");

        // Unconditional join grows regardless.
        assert!(acc.join(&Rect::new(16, 10, 20, 20), false));
        assert_eq!(acc, Rect::new(0, 0, 20, 20));
    }

    #[test]
    fn join_into_empty_and_with_empty() {
        let mut acc = Rect::EMPTY;
        assert!(!acc.join(&Rect::new(1, 1, 2, 2), true));
        assert!(acc.join(&Rect::new(1, 1, 2, 2), false));
        assert_eq!(acc, Rect::new(1, 1, 2, 2));
        assert!(!acc.join(&Rect::EMPTY, false));
        assert_eq!(acc, Rect::new(1, 1, 2, 2));
    }

    #[test]
    fn contains_point_is_inclusive() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains_point(10, 10));
        assert!(r.contains_point(20, 20));
        assert!(!r.contains_point(21, 20));
        assert!(!r.contains_point(9, 15));
        assert!(!Rect::EMPTY.contains_point(0, 0));
    }

    #[test]
    fn offset_and_inflate() {
        let r = Rect::new(0, 0, 4, 4);
        assert_eq!(r.offset(10, -2), Rect::new(10, -2, 14, 2));
        assert_eq!(r.inflate(2), Rect::new(-2, -2, 6, 6));
        assert_eq!(r.inflate(2).area(), 81);
    }

    #[test]
    fn extreme_coordinates_saturate() {
        let huge = Rect::new(0, 0, i32::MAX, i32::MAX);
        assert_eq!(huge.offset(10, 10), Rect::new(10, 10, i32::MAX, i32::MAX));
        assert_eq!(huge.inflate(1), Rect::new(-1, -1, i32::MAX, i32::MAX));
        assert_eq!(
            Rect::new(i32::MIN, 0, 0, 0).offset(-5, 0).left,
            i32::MIN,
            "left edge clamps"
        );

        let all = Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(all.width(), i32::MAX);
        assert_eq!(all.height(), i32::MAX);
        assert_eq!(all.area(), u64::MAX);
        assert_eq!(huge.width(), i32::MAX);
        assert_eq!(Rect::new(i32::MAX, 0, i32::MIN, 0).width(), 0);
    }
}
