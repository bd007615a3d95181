// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_widget_tree --heading-base-level=0

//! Trellis Widget Tree: the structural half of a retained-mode widget hierarchy.
//!
//! The tree stores parent/child links, parent-relative areas, and [`WidgetFlags`] for every
//! widget. Widget behaviour (drawing, event handling) lives elsewhere and is looked up by
//! [`WidgetId`].
//!
//! - Widgets live in an arena and are addressed by generational [`WidgetId`]s. Each id also
//!   carries the identity of the tree that issued it, so an id from one canvas is rejected by
//!   every other canvas.
//! - [`WidgetTree::add_child`] makes the child the new head of the parent's child list. The
//!   head wins hit tests and is painted last, so the most recently added child is on top.
//! - [`WidgetTree::remove_from_parent`] detaches a whole subtree. Detached widgets report
//!   `false` from [`WidgetTree::is_attached`] and are never reached from the root.
//! - [`WidgetTree::get_child_from_point`] resolves the deepest visible widget under a point.
//! - [`WidgetTree::find_next_focus`] walks in pre-order to the next widget that accepts focus,
//!   with [`WrapMode`] deciding what happens at the end of the tree.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{Walk, WidgetTree};
pub use types::{WidgetFlags, WidgetId, WrapMode};
