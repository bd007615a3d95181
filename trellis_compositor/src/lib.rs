// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_compositor --heading-base-level=0

//! Trellis Compositor: a retained-mode 2D compositor for widget trees.
//!
//! ## Overview
//!
//! A [`Canvas`] pairs a render target (any [`Backend`]) with a widget tree. Widgets are
//! rectangles arranged parent-relative, each with optional [`Widget`] behaviour. The canvas
//! keeps:
//!
//! - a bounded list of damaged rectangles ([`DirtyRegion`]). Touching rectangles merge, and
//!   past [`MAX_DIRTY_RECTS`] the list collapses into its bounding box;
//! - an offset and scissor ([`ClipState`]) applied to every drawing primitive, so widgets
//!   draw in local coordinates and can never paint outside their own area or any ancestor's;
//! - the hovered and focused widgets, and a double-click recognizer;
//! - grow-only glyph and icon caches over backend-allocated atlases.
//!
//! ## Painting
//!
//! [`Canvas::redraw_widgets`] repaints each dirty rectangle inside its own paint bracket:
//! optionally clear to the background, draw visible widgets with parents below children and
//! older siblings below newer ones, then the focus box when the ring is showing. The dirty
//! list is empty afterwards.
//!
//! ## Events
//!
//! [`Canvas::dispatch_event`] routes pointer events to the deepest visible widget under the
//! pointer, key events to the focused widget, and everything else to every visible widget in
//! pre-order until one returns [`Outcome::Stop`].
//!
//! ## Example
//!
//! ```rust
//! use trellis_compositor::{
//!     Canvas, CanvasConfig, Color, DrawCtx, MemoryBackend, Rect, Widget, WidgetFlags,
//! };
//!
//! struct Swatch(Color);
//!
//! impl Widget for Swatch {
//!     fn draw(&mut self, ctx: &mut DrawCtx<'_>) {
//!         let r = ctx.local_rect();
//!         ctx.paint().draw_box(r, self.0);
//!     }
//! }
//!
//! let backend = MemoryBackend::new(64, 64).unwrap();
//! let mut canvas = Canvas::new(backend, 64, 64, CanvasConfig::default()).unwrap();
//! let root = canvas.root();
//! let red = Color::rgb(0xff, 0, 0);
//! let swatch = canvas.create_widget(Rect::new(8, 8, 15, 15), WidgetFlags::VISIBLE, Swatch(red));
//! canvas.add_child(root, swatch);
//! canvas.redraw_widgets(true);
//!
//! assert_eq!(canvas.backend().pixel(8, 8), Some(red));
//! assert!(canvas.dirty_region().is_empty());
//! ```
//!
//! ## Threads
//!
//! A canvas is `Send`. [`SharedCanvas`] wraps one in a single lock for use from several
//! threads.

mod backend;
mod canvas;
mod config;
mod damage;
mod error;
mod event;
mod memory;
mod paint;
mod router;
mod skin;
mod sync;
mod widget;

pub use backend::Backend;
pub use canvas::Canvas;
pub use config::{CanvasConfig, Color, DoubleClickConfig};
pub use damage::{DirtyRegion, MAX_DIRTY_RECTS};
pub use error::CanvasError;
pub use event::{Button, Event, FocusReason, Key};
pub use memory::MemoryBackend;
pub use paint::{ClipState, GlyphSource, IconSource, Paint, SavedClip, Surface};
pub use skin::{DefaultSkin, Skin};
pub use sync::SharedCanvas;
pub use widget::{DrawCtx, EventCtx, Outcome, Widget};

pub use trellis_atlas::{
    CacheStats, FontId, GlyphCache, GlyphKey, GlyphMetrics, IconCache, IconId, PixelFormat,
    Pixmap, Raster, RasterSource,
};
pub use trellis_rect::Rect;
pub use trellis_widget_tree::{WidgetFlags, WidgetId, WidgetTree, WrapMode};
