// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the widget tree: identifiers, flags, and traversal modes.

use core::sync::atomic::{AtomicU32, Ordering};

static NEXT_TAG: AtomicU32 = AtomicU32::new(1);

/// Identity of one [`WidgetTree`](crate::WidgetTree) instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct TreeTag(u32);

impl TreeTag {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifier for a widget (generational, tagged with its owning tree).
///
/// Ids from another tree, and ids whose widget was removed, are never accepted.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WidgetId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
    pub(crate) tag: TreeTag,
}

impl WidgetId {
    pub(crate) const fn idx(self) -> usize {
        self.idx as usize
    }
}

bitflags::bitflags! {
    /// Widget state flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// Widget is drawn, hit-tested, and receives propagated events.
        const VISIBLE   = 0b0000_0001;
        /// Widget accepts keyboard focus.
        const FOCUSABLE = 0b0000_0010;
        /// Widget is greyed out and refuses focus.
        const DISABLED  = 0b0000_0100;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

impl WidgetFlags {
    /// Whether a widget with these flags may take focus.
    pub fn accepts_focus(self) -> bool {
        self.contains(Self::VISIBLE | Self::FOCUSABLE) && !self.contains(Self::DISABLED)
    }
}

/// What focus traversal does after the last candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Stop; reaching the end of the tree yields no next candidate.
    #[default]
    Never,
    /// Continue from the root.
    Wrap,
}
