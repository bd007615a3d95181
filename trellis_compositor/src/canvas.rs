// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas: widget ownership, damage, and painting.

use hashbrown::HashMap;
use smallvec::SmallVec;
use trellis_atlas::{
    FontId, GlyphCache, GlyphKey, GlyphMetrics, IconCache, IconId, PixelFormat, Pixmap,
    RasterSource,
};
use trellis_event_state::double_click::DoubleClickState;
use trellis_rect::Rect;
use trellis_widget_tree::{WidgetFlags, WidgetId, WidgetTree};

use crate::{
    Backend, CanvasConfig, CanvasError, ClipState, Color, DefaultSkin, DirtyRegion, DrawCtx,
    Event, FocusReason, GlyphSource, IconSource, MAX_DIRTY_RECTS, Paint, Skin, Surface, Widget,
};

fn bounds_of(width: u32, height: u32) -> Rect {
    Rect::from_xywh(
        0,
        0,
        i32::try_from(width).unwrap_or(i32::MAX),
        i32::try_from(height).unwrap_or(i32::MAX),
    )
}

/// A render target with its widget tree.
///
/// The canvas owns the root widget, the behaviour of every widget created through it, the
/// dirty region, the offset/scissor state, the pointer-hover and keyboard-focus state, and
/// the glyph and icon caches.
///
/// Tree changes made through the canvas keep damage and focus consistent: attaching,
/// moving, and showing a widget damage its new area; detaching, hiding, and destroying a
/// widget damage its old area and drop hover and focus held inside its subtree.
pub struct Canvas<B: Backend> {
    pub(crate) backend: B,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) config: CanvasConfig,
    pub(crate) tree: WidgetTree,
    pub(crate) widgets: HashMap<WidgetId, Box<dyn Widget>>,
    pub(crate) dirty: DirtyRegion,
    pub(crate) clip: ClipState,
    pub(crate) focus: Option<WidgetId>,
    pub(crate) mouse_over: Option<WidgetId>,
    pub(crate) pending_focus: Option<WidgetId>,
    pub(crate) show_focus_ring: bool,
    pub(crate) click: DoubleClickState<WidgetId>,
    pub(crate) skin: Box<dyn Skin>,
    pub(crate) glyphs: GlyphCache,
    pub(crate) icons: IconCache,
    pub(crate) glyph_source: Option<Box<GlyphSource>>,
    pub(crate) icon_source: Option<Box<IconSource>>,
}

impl<B: Backend> core::fmt::Debug for Canvas<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tree", &self.tree)
            .field("dirty", &self.dirty)
            .field("clip", &self.clip)
            .field("focus", &self.focus)
            .field("mouse_over", &self.mouse_over)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> Canvas<B> {
    /// Create a canvas drawing into `backend`.
    ///
    /// The glyph atlas (A8) and icon atlas (RGBA8) are allocated through
    /// [`Backend::create_pixmap`]. The canvas starts with nothing dirty.
    pub fn new(
        mut backend: B,
        width: u32,
        height: u32,
        config: CanvasConfig,
    ) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::ZeroSized { width, height });
        }
        let bounds = bounds_of(width, height);
        let (gw, gh) = config.glyph_atlas;
        let (iw, ih) = config.icon_atlas;
        let glyphs = GlyphCache::with_atlas(backend.create_pixmap(gw, gh, PixelFormat::A8)?);
        let icons = IconCache::with_atlas(backend.create_pixmap(iw, ih, PixelFormat::Rgba8)?);
        let click = DoubleClickState::with_thresholds(
            config.double_click.time_threshold_ms,
            config.double_click.distance_threshold,
        );
        tracing::debug!(width, height, "canvas created");
        Ok(Self {
            backend,
            width,
            height,
            config,
            tree: WidgetTree::new(bounds),
            widgets: HashMap::new(),
            dirty: DirtyRegion::new(bounds),
            clip: ClipState::new(bounds),
            focus: None,
            mouse_over: None,
            pending_focus: None,
            show_focus_ring: false,
            click,
            skin: Box::new(DefaultSkin::default()),
            glyphs,
            icons,
            glyph_source: None,
            icon_source: None,
        })
    }

    /// Tear the canvas down.
    ///
    /// Widgets are detached, not destroyed: their behaviours are handed back without
    /// [`Widget::destroy`] being called. The backend is dropped.
    pub fn destroy(self) -> Vec<Box<dyn Widget>> {
        tracing::debug!(widgets = self.widgets.len(), "canvas destroyed");
        self.widgets.into_values().collect()
    }

    /// Resize the canvas and its backend, then mark everything dirty.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::ZeroSized { width, height });
        }
        self.backend.resize(width, height)?;
        self.width = width;
        self.height = height;
        let bounds = bounds_of(width, height);
        let root = self.tree.root();
        self.tree.set_area(root, bounds);
        self.clip.set_bounds(bounds);
        self.dirty.set_bounds(bounds);
        self.dirty.add_all();
        Ok(())
    }

    // --- accessors ---

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The canvas rectangle.
    pub fn bounds(&self) -> Rect {
        self.dirty.bounds()
    }

    /// Settings the canvas was created with.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The render target.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The render target, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Widget structure.
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// The root widget, covering the whole canvas.
    pub fn root(&self) -> WidgetId {
        self.tree.root()
    }

    /// The widget holding keyboard focus.
    pub fn focus(&self) -> Option<WidgetId> {
        self.focus
    }

    /// The widget under the pointer, as of the last pointer event.
    pub fn mouse_over(&self) -> Option<WidgetId> {
        self.mouse_over
    }

    /// Whether the focus box is drawn.
    pub fn focus_ring_visible(&self) -> bool {
        self.show_focus_ring
    }

    /// Pending damage.
    pub fn dirty_region(&self) -> &DirtyRegion {
        &self.dirty
    }

    /// Offset and scissor state.
    pub fn clip(&self) -> &ClipState {
        &self.clip
    }

    /// The glyph cache.
    pub fn glyph_cache(&self) -> &GlyphCache {
        &self.glyphs
    }

    /// The icon cache.
    pub fn icon_cache(&self) -> &IconCache {
        &self.icons
    }

    /// Replace the skin.
    pub fn set_skin(&mut self, skin: impl Skin + 'static) {
        self.skin = Box::new(skin);
        self.invalidate_focus_box();
    }

    /// Set the glyph rasterizer used by [`Paint::draw_string`].
    pub fn set_glyph_source(
        &mut self,
        source: impl RasterSource<GlyphKey, GlyphMetrics> + Send + 'static,
    ) {
        self.glyph_source = Some(Box::new(source));
    }

    /// Set the icon rasterizer used by [`Paint::draw_icon`].
    pub fn set_icon_source(&mut self, source: impl RasterSource<IconId, ()> + Send + 'static) {
        self.icon_source = Some(Box::new(source));
    }

    // --- widgets ---

    /// Create a detached widget with the given behaviour.
    pub fn create_widget(
        &mut self,
        area: Rect,
        flags: WidgetFlags,
        widget: impl Widget + 'static,
    ) -> WidgetId {
        let id = self.tree.insert(area, flags);
        self.widgets.insert(id, Box::new(widget));
        id
    }

    /// Replace the behaviour of a widget (including the root), returning the old one.
    pub fn set_widget(
        &mut self,
        id: WidgetId,
        widget: impl Widget + 'static,
    ) -> Option<Box<dyn Widget>> {
        if !self.tree.is_alive(id) {
            return None;
        }
        self.damage_widget(id);
        self.widgets.insert(id, Box::new(widget))
    }

    /// The behaviour of a widget.
    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.widgets.get(&id).map(|w| &**w)
    }

    /// The behaviour of a widget, mutably.
    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets.get_mut(&id).map(|w| &mut **w)
    }

    /// Make `child` the newest (topmost) child of `parent`, moving it if it already has a
    /// parent.
    ///
    /// Rejected for stale or foreign ids, for the root, and for moves that would create a
    /// cycle.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        let tree = &self.tree;
        if !tree.is_alive(parent)
            || !tree.is_alive(child)
            || child == tree.root()
            || tree.is_ancestor(child, parent)
        {
            return false;
        }
        let old = self.shown_rect(child);
        if !self.tree.is_attached(parent) {
            self.release_refs(child);
        }
        let added = self.tree.add_child(parent, child);
        self.apply_focus_request();
        if !added {
            return false;
        }
        if let Some(r) = old {
            self.dirty.add(r);
        }
        self.damage_widget(child);
        true
    }

    /// Detach a widget and its subtree from the canvas.
    pub fn remove_from_parent(&mut self, id: WidgetId) -> bool {
        if self.tree.parent_of(id).is_none() {
            return false;
        }
        let old = self.shown_rect(id);
        self.release_refs(id);
        if let Some(r) = old {
            self.dirty.add(r);
        }
        let removed = self.tree.remove_from_parent(id);
        self.apply_focus_request();
        removed
    }

    /// Destroy a widget: call [`Widget::destroy`], drop its behaviour, and free its id.
    ///
    /// Its children are detached and left alive.
    pub fn destroy_widget(&mut self, id: WidgetId) -> bool {
        if id == self.tree.root() || !self.tree.is_alive(id) {
            return false;
        }
        let old = self.shown_rect(id);
        self.release_refs(id);
        if let Some(r) = old {
            self.dirty.add(r);
        }
        if let Some(mut widget) = self.widgets.remove(&id) {
            widget.destroy();
        }
        let removed = self.tree.remove(id);
        self.apply_focus_request();
        removed
    }

    /// Move or resize a widget; `area` is relative to its parent.
    pub fn set_area(&mut self, id: WidgetId, area: Rect) {
        if self.tree.area(id).is_none_or(|a| a == area) {
            return;
        }
        let old = self.shown_rect(id);
        self.tree.set_area(id, area);
        if let Some(r) = old {
            self.dirty.add(r);
        }
        self.damage_widget(id);
    }

    /// Replace a widget's flags and notify it through [`Widget::state_change`].
    pub fn set_flags(&mut self, id: WidgetId, flags: WidgetFlags) -> bool {
        let Some(old_flags) = self.tree.flags(id) else {
            return false;
        };
        if old_flags == flags {
            return true;
        }
        let old = self.shown_rect(id);
        if !flags.contains(WidgetFlags::VISIBLE) {
            self.release_refs(id);
        } else if self.focus == Some(id) && !flags.accepts_focus() {
            self.transfer_focus(None, FocusReason::Programmatic);
        }
        self.tree.set_flags(id, flags);
        if let Some(r) = old {
            self.dirty.add(r);
        }
        self.damage_widget(id);
        if let Some(widget) = self.widgets.get_mut(&id) {
            widget.state_change(flags);
        }
        self.apply_focus_request();
        true
    }

    /// Show or hide a widget.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> bool {
        let Some(mut flags) = self.tree.flags(id) else {
            return false;
        };
        flags.set(WidgetFlags::VISIBLE, visible);
        self.set_flags(id, flags)
    }

    /// Resolve the deepest visible widget at a canvas position.
    pub fn widget_at(&self, x: i32, y: i32) -> Option<WidgetId> {
        self.tree.get_child_from_point(self.tree.root(), x, y)
    }

    // --- damage ---

    /// Mark a canvas region for repaint.
    pub fn add_dirty_rect(&mut self, rect: Rect) {
        self.dirty.add(rect);
    }

    /// Mark a widget's area for repaint.
    pub fn invalidate(&mut self, id: WidgetId) {
        self.damage_widget(id);
    }

    /// Canvas rectangle of a widget that is currently on screen.
    pub(crate) fn shown_rect(&self, id: WidgetId) -> Option<Rect> {
        if !self.tree.is_attached(id) || !self.tree.is_visible_in_tree(id) {
            return None;
        }
        self.tree.absolute_rect(id)
    }

    pub(crate) fn damage_widget(&mut self, id: WidgetId) {
        if let Some(r) = self.shown_rect(id) {
            self.dirty.add(r);
        }
    }

    pub(crate) fn damage_focus_box(&mut self, id: WidgetId) {
        if !self.tree.is_attached(id) {
            return;
        }
        if let Some(r) = self.tree.absolute_rect(id) {
            self.dirty.add(r.inflate(self.skin.focus_box_width()));
        }
    }

    fn invalidate_focus_box(&mut self) {
        if let Some(f) = self.focus
            && self.show_focus_ring
        {
            self.damage_focus_box(f);
        }
    }

    // --- painting ---

    /// Open a paint bracket over `rect`, clipped to the canvas.
    ///
    /// Returns `false` if a bracket is already open or `rect` misses the canvas.
    pub fn begin(&mut self, rect: Rect) -> bool {
        let Some(scissor) = self.clip.begin(rect) else {
            return false;
        };
        self.backend.begin(scissor);
        true
    }

    /// Close the paint bracket.
    pub fn end(&mut self) {
        if self.clip.began() {
            self.backend.end();
            self.clip.end();
        }
    }

    /// Clipped drawing primitives at the current offset.
    pub fn surface(&mut self) -> Surface<'_, B> {
        Surface {
            backend: &mut self.backend,
            clip: &mut self.clip,
            glyphs: &mut self.glyphs,
            glyph_source: self.glyph_source.as_deref_mut(),
            icons: &mut self.icons,
            icon_source: self.icon_source.as_deref_mut(),
        }
    }

    /// Repaint every dirty region, then forget the damage.
    ///
    /// With `clear` set, each region is first filled with the background color. Does
    /// nothing while a paint bracket is open.
    pub fn redraw_widgets(&mut self, clear: bool) {
        if self.clip.began() {
            tracing::warn!("redraw requested inside an open paint bracket");
            return;
        }
        let rects: SmallVec<[Rect; MAX_DIRTY_RECTS]> = SmallVec::from_slice(self.dirty.rects());
        for rect in rects {
            self.paint_region(rect, clear);
        }
        self.dirty.clear();
    }

    /// Repaint the whole canvas regardless of damage, then forget the damage.
    pub fn draw_widgets(&mut self, clear: bool) {
        if self.clip.began() {
            tracing::warn!("redraw requested inside an open paint bracket");
            return;
        }
        let bounds = self.bounds();
        self.paint_region(bounds, clear);
        self.dirty.clear();
    }

    fn paint_region(&mut self, rect: Rect, clear: bool) {
        if !self.begin(rect) {
            return;
        }
        if clear {
            self.backend
                .clear(self.clip.scissor(), self.config.background);
        }
        let focus_box = self
            .focus
            .filter(|_| self.show_focus_ring)
            .and_then(|f| self.shown_rect(f))
            .map(|r| r.inflate(self.skin.focus_box_width()));
        let root = self.tree.root();
        let mut painter = Painter {
            surface: Surface {
                backend: &mut self.backend,
                clip: &mut self.clip,
                glyphs: &mut self.glyphs,
                glyph_source: self.glyph_source.as_deref_mut(),
                icons: &mut self.icons,
                icon_source: self.icon_source.as_deref_mut(),
            },
            tree: &self.tree,
            widgets: &mut self.widgets,
            focus: self.focus,
            hovered: self.mouse_over,
        };
        painter.draw_subtree(root);
        if let Some(r) = focus_box {
            self.skin.draw_focus_box(&mut painter.surface, r);
        }
        self.end();
    }

    /// Drop hover and focus held by `subtree` or any of its descendants.
    pub(crate) fn release_refs(&mut self, subtree: WidgetId) {
        if let Some(f) = self.focus
            && self.tree.is_ancestor(subtree, f)
        {
            self.transfer_focus(None, FocusReason::Programmatic);
        }
        if let Some(m) = self.mouse_over
            && self.tree.is_ancestor(subtree, m)
        {
            self.mouse_over = None;
            self.deliver(m, &Event::MouseLeave);
        }
    }
}

/// Recursive widget painter for one paint bracket.
struct Painter<'a, B: Backend> {
    surface: Surface<'a, B>,
    tree: &'a WidgetTree,
    widgets: &'a mut HashMap<WidgetId, Box<dyn Widget>>,
    focus: Option<WidgetId>,
    hovered: Option<WidgetId>,
}

impl<B: Backend> Painter<'_, B> {
    /// Paint `id` and its visible descendants, oldest child first, each clipped to its own
    /// area and to every ancestor's.
    fn draw_subtree(&mut self, id: WidgetId) {
        let tree = self.tree;
        if !tree
            .flags(id)
            .is_some_and(|f| f.contains(WidgetFlags::VISIBLE))
        {
            return;
        }
        let Some(area) = tree.absolute_rect(id) else {
            return;
        };
        let saved = self.surface.clip.save();
        if !self.surface.clip.narrow(area) {
            return;
        }
        if let Some(widget) = self.widgets.get_mut(&id) {
            let mut ctx = DrawCtx {
                paint: &mut self.surface,
                id,
                size: (area.width(), area.height()),
                focused: self.focus == Some(id),
                hovered: self.hovered == Some(id),
            };
            widget.draw(&mut ctx);
        }
        for child in tree.children(id).rev() {
            self.draw_subtree(child);
        }
        self.surface.clip.restore(saved);
    }
}

/// Drawing through the canvas itself, at the current offset and scissor.
impl<B: Backend> Paint for Canvas<B> {
    fn draw_box(&mut self, rect: Rect, color: Color) {
        self.surface().draw_box(rect, color);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.surface().draw_line(x0, y0, x1, y1, color);
    }

    fn blit(&mut self, x: i32, y: i32, pixmap: &Pixmap, src: Rect) {
        self.surface().blit(x, y, pixmap, src);
    }

    fn blend(&mut self, x: i32, y: i32, pixmap: &Pixmap, src: Rect) {
        self.surface().blend(x, y, pixmap, src);
    }

    fn draw_string(
        &mut self,
        x: i32,
        y: i32,
        font: FontId,
        color: Color,
        text: &str,
    ) -> i32 {
        self.surface().draw_string(x, y, font, color, text)
    }

    fn draw_icon(&mut self, x: i32, y: i32, icon: IconId) -> bool {
        self.surface().draw_icon(x, y, icon)
    }
}
