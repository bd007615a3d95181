// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::vec::Vec;
use trellis_rect::Rect;

use crate::types::{TreeTag, WidgetFlags, WidgetId, WrapMode};

/// Widget hierarchy rooted at a canvas.
///
/// The tree is created with a root widget covering the canvas. Other widgets are created
/// detached with [`WidgetTree::insert`] and become part of the canvas once they are linked
/// under an attached parent with [`WidgetTree::add_child`].
///
/// Areas are parent-relative: a child at `(5, 5)` inside a parent at `(10, 10)` sits at
/// `(15, 15)` on the canvas.
///
/// ## Example
///
/// ```rust
/// use trellis_rect::Rect;
/// use trellis_widget_tree::{WidgetFlags, WidgetTree};
///
/// let mut tree = WidgetTree::new(Rect::new(0, 0, 99, 99));
/// let panel = tree.insert(Rect::new(10, 10, 59, 59), WidgetFlags::VISIBLE);
/// let button = tree.insert(Rect::new(5, 5, 24, 14), WidgetFlags::VISIBLE);
/// assert!(tree.add_child(tree.root(), panel));
/// assert!(tree.add_child(panel, button));
///
/// assert_eq!(tree.absolute_rect(button), Some(Rect::new(15, 15, 34, 24)));
/// assert_eq!(tree.get_child_from_point(tree.root(), 20, 20), Some(button));
/// assert_eq!(tree.get_child_from_point(tree.root(), 50, 50), Some(panel));
/// ```
pub struct WidgetTree {
    tag: TreeTag,
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: WidgetId,
}

impl core::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("WidgetTree")
            .field("root", &self.root)
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<WidgetId>,
    /// Oldest first; the last entry is the head.
    children: Vec<WidgetId>,
    area: Rect,
    flags: WidgetFlags,
    attached: bool,
}

impl Node {
    fn new(generation: u32, area: Rect, flags: WidgetFlags) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            area,
            flags,
            attached: false,
        }
    }
}

impl WidgetTree {
    /// Create a tree whose root covers `root_area`.
    pub fn new(root_area: Rect) -> Self {
        let tag = TreeTag::fresh();
        let mut root = Node::new(1, root_area, WidgetFlags::VISIBLE);
        root.attached = true;
        Self {
            tag,
            nodes: alloc::vec![Some(root)],
            generations: alloc::vec![1],
            free_list: Vec::new(),
            root: WidgetId {
                idx: 0,
                generation: 1,
                tag,
            },
        }
    }

    /// The root widget. It is always attached and can never be removed or re-parented.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// Create a detached widget.
    pub fn insert(&mut self, area: Rect, flags: WidgetFlags) -> WidgetId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, area, flags));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, area, flags)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        WidgetId {
            idx,
            generation,
            tag: self.tag,
        }
    }

    /// Destroy a widget.
    ///
    /// The widget is unlinked from its parent and its children become detached orphans that
    /// the caller may re-attach or remove. Returns `false` for the root and for stale ids.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        if id == self.root || !self.is_alive(id) {
            return false;
        }
        self.remove_from_parent(id);
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        true
    }

    /// Make `child` the newest child of `parent`.
    ///
    /// A child that already has a parent is moved. The call is rejected (returning `false`)
    /// for stale or foreign ids, for the root as `child`, and when `child` is `parent` or one
    /// of its ancestors.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) || child == self.root {
            return false;
        }
        if self.is_ancestor(child, parent) {
            return false;
        }
        if let Some(old) = self.node(child).parent {
            self.node_mut(old).children.retain(|c| *c != child);
        }
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        let attached = self.node(parent).attached;
        self.set_attached(child, attached);
        true
    }

    /// Unlink a widget from its parent and detach its whole subtree.
    ///
    /// Returns `false` if the widget had no parent.
    pub fn remove_from_parent(&mut self, id: WidgetId) -> bool {
        let Some(parent) = self.parent_of(id) else {
            return false;
        };
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
        self.set_attached(id, false);
        true
    }

    fn set_attached(&mut self, id: WidgetId, attached: bool) {
        let mut stack = alloc::vec![id];
        while let Some(id) = stack.pop() {
            let n = self.node_mut(id);
            n.attached = attached;
            stack.extend_from_slice(&n.children);
        }
    }

    /// Update a widget's parent-relative area.
    pub fn set_area(&mut self, id: WidgetId, area: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.area = area;
        }
    }

    /// Replace a widget's flags, returning the previous flags.
    pub fn set_flags(&mut self, id: WidgetId, flags: WidgetFlags) -> Option<WidgetFlags> {
        let n = self.node_opt_mut(id)?;
        Some(core::mem::replace(&mut n.flags, flags))
    }

    // --- queries ---

    /// Returns true if `id` belongs to this tree and refers to a live widget.
    pub fn is_alive(&self, id: WidgetId) -> bool {
        id.tag == self.tag
            && self
                .nodes
                .get(id.idx())
                .and_then(|n| n.as_ref())
                .is_some_and(|n| n.generation == id.generation)
    }

    /// Whether the widget is reachable from the root.
    pub fn is_attached(&self, id: WidgetId) -> bool {
        self.node_opt(id).is_some_and(|n| n.attached)
    }

    /// The parent-relative area of a live widget.
    pub fn area(&self, id: WidgetId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.area)
    }

    /// The flags of a live widget.
    pub fn flags(&self, id: WidgetId) -> Option<WidgetFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Returns the parent of a widget, or `None` for roots, orphans, and stale ids.
    pub fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children head-first: the most recently added child comes first.
    ///
    /// This is hit-testing priority. Reverse it for paint order.
    pub fn children(&self, id: WidgetId) -> impl DoubleEndedIterator<Item = WidgetId> + '_ {
        self.node_opt(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .rev()
            .copied()
    }

    /// Whether `ancestor` is `id` or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut cur = Some(id).filter(|&id| self.is_alive(id));
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent_of(c);
        }
        false
    }

    /// Whether the widget and every ancestor are visible.
    pub fn is_visible_in_tree(&self, id: WidgetId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            match self.node_opt(c) {
                Some(n) if n.flags.contains(WidgetFlags::VISIBLE) => cur = n.parent,
                _ => return false,
            }
        }
        true
    }

    /// Top-left corner of the widget in the coordinates of its topmost ancestor.
    pub fn absolute_origin(&self, id: WidgetId) -> Option<(i32, i32)> {
        let mut n = self.node_opt(id)?;
        let (mut x, mut y) = (n.area.left, n.area.top);
        while let Some(p) = n.parent {
            n = self.node(p);
            x = x.saturating_add(n.area.left);
            y = y.saturating_add(n.area.top);
        }
        Some((x, y))
    }

    /// The widget's area in the coordinates of its topmost ancestor.
    pub fn absolute_rect(&self, id: WidgetId) -> Option<Rect> {
        let n = self.node_opt(id)?;
        let (x, y) = match n.parent {
            Some(p) => self.absolute_origin(p)?,
            None => (0, 0),
        };
        Some(n.area.offset(x, y))
    }

    /// Resolve the deepest visible widget under a point.
    ///
    /// `(x, y)` is expressed in the coordinate frame of `id`'s parent (canvas coordinates for
    /// the root). Returns `None` when the point lies outside `id`'s own area or `id` is not
    /// visible. Otherwise children are tested head-first with the point translated into each
    /// child's frame; the first match is descended into, and `id` itself is returned when no
    /// child matches.
    pub fn get_child_from_point(&self, id: WidgetId, x: i32, y: i32) -> Option<WidgetId> {
        let n = self.node_opt(id)?;
        if !n.flags.contains(WidgetFlags::VISIBLE) || !n.area.contains_point(x, y) {
            return None;
        }
        let (lx, ly) = (x.saturating_sub(n.area.left), y.saturating_sub(n.area.top));
        for child in n.children.iter().rev() {
            if let Some(hit) = self.get_child_from_point(*child, lx, ly) {
                return Some(hit);
            }
        }
        Some(id)
    }

    /// Get the next widget in pre-order (parent, then children oldest first).
    ///
    /// Returns `None` at the end of the tree or for stale ids. Does not wrap around.
    pub fn next_pre_order(&self, current: WidgetId) -> Option<WidgetId> {
        if !self.is_alive(current) {
            return None;
        }
        self.next_in_order(current, true)
    }

    /// Find the next widget after `from` that accepts focus.
    ///
    /// Walks in pre-order starting after `from`, never entering invisible subtrees. With
    /// [`WrapMode::Wrap`] the walk continues from the top of `from`'s tree and may come back
    /// to `from` itself.
    ///
    /// Siblings are visited oldest first, in the order they were added. This is the reverse
    /// of [`children`](Self::children) and of hit testing, which both start at the newest.
    pub fn find_next_focus(&self, from: WidgetId, wrap: WrapMode) -> Option<WidgetId> {
        if !self.is_alive(from) {
            return None;
        }
        let top = self.topmost(from);
        let mut cur = from;
        let mut wrapped = false;
        loop {
            let descend = self.node(cur).flags.contains(WidgetFlags::VISIBLE);
            let next = match self.next_in_order(cur, descend) {
                Some(n) => n,
                None if wrap == WrapMode::Wrap && !wrapped => {
                    wrapped = true;
                    top
                }
                None => return None,
            };
            if self.is_visible_in_tree(next) && self.node(next).flags.accepts_focus() {
                return Some(next);
            }
            if next == from {
                return None;
            }
            cur = next;
        }
    }

    /// Pre-order walk over `id`'s subtree (including `id`), skipping invisible subtrees when
    /// `visible_only` is set.
    pub fn walk(&self, id: WidgetId, visible_only: bool) -> Walk<'_> {
        let mut stack = Vec::new();
        if self.is_alive(id) {
            stack.push(id);
        }
        Walk {
            tree: self,
            stack,
            visible_only,
        }
    }

    // --- internals ---

    fn topmost(&self, id: WidgetId) -> WidgetId {
        let mut cur = id;
        while let Some(p) = self.parent_of(cur) {
            cur = p;
        }
        cur
    }

    fn next_in_order(&self, current: WidgetId, descend: bool) -> Option<WidgetId> {
        if descend && let Some(&first_child) = self.node(current).children.first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    fn next_sibling(&self, node: WidgetId) -> Option<WidgetId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn node_opt(&self, id: WidgetId) -> Option<&Node> {
        if id.tag != self.tag {
            return None;
        }
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.generation).then_some(n)
    }

    fn node_opt_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        if id.tag != self.tag {
            return None;
        }
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation {
            return None;
        }
        Some(n)
    }

    // Only called with ids reachable from live nodes.
    fn node(&self, id: WidgetId) -> &Node {
        match &self.nodes[id.idx()] {
            Some(n) => n,
            None => unreachable!("linked widget slot is unoccupied"),
        }
    }

    fn node_mut(&mut self, id: WidgetId) -> &mut Node {
        match &mut self.nodes[id.idx()] {
            Some(n) => n,
            None => unreachable!("linked widget slot is unoccupied"),
        }
    }
}

/// Pre-order iterator returned by [`WidgetTree::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    tree: &'a WidgetTree,
    stack: Vec<WidgetId>,
    visible_only: bool,
}

impl Iterator for Walk<'_> {
    type Item = WidgetId;

    fn next(&mut self) -> Option<WidgetId> {
        loop {
            let id = self.stack.pop()?;
            let n = self.tree.node(id);
            if self.visible_only && !n.flags.contains(WidgetFlags::VISIBLE) {
                continue;
            }
            self.stack.extend(n.children.iter().rev());
            return Some(id);
        }
    }
}
