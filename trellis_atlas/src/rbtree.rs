// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-indexed left-leaning red-black tree.

use alloc::vec::Vec;

#[derive(Clone, Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<usize>,
    right: Option<usize>,
    red: bool,
}

/// An ordered map without removal.
///
/// Nodes live in a `Vec` and link to each other by index, so rotations are index swaps and
/// there is no per-node allocation.
#[derive(Clone, Debug)]
pub struct RbMap<K, V> {
    nodes: Vec<Node<K, V>>,
    root: Option<usize>,
}

impl<K, V> Default for RbMap<K, V> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }
}

impl<K: Ord, V> RbMap<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut cur = self.root;
        while let Some(i) = cur {
            let n = &self.nodes[i];
            cur = match key.cmp(&n.key) {
                core::cmp::Ordering::Less => n.left,
                core::cmp::Ordering::Greater => n.right,
                core::cmp::Ordering::Equal => return Some(&n.value),
            };
        }
        None
    }

    /// Insert `key` if absent.
    ///
    /// Returns `false` and keeps the existing value when `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let mut inserted = false;
        let root = self.insert_at(self.root, key, value, &mut inserted);
        self.nodes[root].red = false;
        self.root = Some(root);
        inserted
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        Iter {
            map: self,
            stack: Vec::new(),
            cur: self.root,
        }
    }

    fn is_red(&self, i: Option<usize>) -> bool {
        i.is_some_and(|i| self.nodes[i].red)
    }

    fn insert_at(&mut self, at: Option<usize>, key: K, value: V, inserted: &mut bool) -> usize {
        let Some(h) = at else {
            *inserted = true;
            self.nodes.push(Node {
                key,
                value,
                left: None,
                right: None,
                red: true,
            });
            return self.nodes.len() - 1;
        };
        match key.cmp(&self.nodes[h].key) {
            core::cmp::Ordering::Less => {
                let l = self.insert_at(self.nodes[h].left, key, value, inserted);
                self.nodes[h].left = Some(l);
            }
            core::cmp::Ordering::Greater => {
                let r = self.insert_at(self.nodes[h].right, key, value, inserted);
                self.nodes[h].right = Some(r);
            }
            core::cmp::Ordering::Equal => return h,
        }
        self.fix_up(h)
    }

    fn fix_up(&mut self, mut h: usize) -> usize {
        if self.is_red(self.nodes[h].right) && !self.is_red(self.nodes[h].left) {
            h = self.rotate_left(h);
        }
        if self.is_red(self.nodes[h].left)
            && self.is_red(self.nodes[h].left.and_then(|l| self.nodes[l].left))
        {
            h = self.rotate_right(h);
        }
        if self.is_red(self.nodes[h].left) && self.is_red(self.nodes[h].right) {
            self.flip_colors(h);
        }
        h
    }

    fn rotate_left(&mut self, h: usize) -> usize {
        let Some(x) = self.nodes[h].right else {
            return h;
        };
        self.nodes[h].right = self.nodes[x].left;
        self.nodes[x].left = Some(h);
        self.nodes[x].red = self.nodes[h].red;
        self.nodes[h].red = true;
        x
    }

    fn rotate_right(&mut self, h: usize) -> usize {
        let Some(x) = self.nodes[h].left else {
            return h;
        };
        self.nodes[h].left = self.nodes[x].right;
        self.nodes[x].right = Some(h);
        self.nodes[x].red = self.nodes[h].red;
        self.nodes[h].red = true;
        x
    }

    fn flip_colors(&mut self, h: usize) {
        self.nodes[h].red = !self.nodes[h].red;
        for c in [self.nodes[h].left, self.nodes[h].right].into_iter().flatten() {
            self.nodes[c].red = !self.nodes[c].red;
        }
    }
}

struct Iter<'a, K, V> {
    map: &'a RbMap<K, V>,
    stack: Vec<usize>,
    cur: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(i) = self.cur {
            self.stack.push(i);
            self.cur = self.map.nodes[i].left;
        }
        let i = self.stack.pop()?;
        let n = &self.map.nodes[i];
        self.cur = n.right;
        Some((&n.key, &n.value))
    }
}
