// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_rect --heading-base-level=0

//! Trellis Rect: inclusive-coordinate integer rectangles.
//!
//! Every other Trellis crate speaks in terms of [`Rect`]: damage regions, scissor rects,
//! widget areas, and atlas placements.
//!
//! - Coordinates are inclusive on both ends, so `width = right - left + 1`.
//! - A rectangle with `right < left` (or `bottom < top`) is empty. [`Rect::EMPTY`] is the
//!   canonical empty value.
//! - All operations are pure. Empty results are legitimate "nothing to do" outcomes, not errors.
//!
//! ## Example
//!
//! ```rust
//! use trellis_rect::Rect;
//!
//! let a = Rect::new(0, 0, 9, 9);
//! let b = Rect::new(5, 5, 14, 14);
//! assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 9, 9)));
//!
//! // Rectangles that only share an edge can be joined when touching is required.
//! let mut acc = Rect::new(0, 0, 9, 9);
//! assert!(acc.join(&Rect::new(10, 0, 19, 9), true));
//! assert_eq!(acc, Rect::new(0, 0, 19, 9));
//!
//! // Disjoint rectangles are left alone.
//! assert!(!acc.join(&Rect::new(50, 50, 60, 60), true));
//! assert!(acc.contains_point(19, 9));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod rect;

pub use rect::Rect;
