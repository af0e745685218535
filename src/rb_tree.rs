//! [`RbTree`] is the red-black tree shared by [`TreeMap`](crate::TreeMap) and treeified hash
//! buckets.
//!
//! Nodes are stored in a [`Slab`] and refer to each other by index, therefore the tree never
//! holds a pointer into itself. The ordering is not part of the type: every search or insertion
//! takes a comparator, which lets the same tree serve partially ordered user keys as well as the
//! `(hash, sequence)` keys of treeified buckets.

pub mod node;

use node::{Color, Node};
use slab::Slab;
use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::mem::{replace, swap};

/// Index of a node in the arena.
pub(crate) type NodeId = usize;

/// Red-black tree over an index arena.
#[derive(Clone, Debug)]
pub(crate) struct RbTree<K, V> {
    nodes: Slab<Node<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> RbTree<K, V> {
    /// Creates an empty [`RbTree`].
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    pub(crate) fn key(&self, id: NodeId) -> &K {
        &self.nodes[id].key
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> &V {
        &self.nodes[id].value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, id: NodeId) -> &mut V {
        &mut self.nodes[id].value
    }

    #[inline]
    pub(crate) fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = &self.nodes[id];
        (&node.key, &node.value)
    }

    #[inline]
    pub(crate) fn has_two_children(&self, id: NodeId) -> bool {
        self.nodes[id].has_two_children()
    }

    /// Returns the node with the smallest key.
    #[inline]
    pub(crate) fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.leftmost(root))
    }

    /// Returns the node with the largest key.
    #[inline]
    pub(crate) fn last(&self) -> Option<NodeId> {
        self.root.map(|root| self.rightmost(root))
    }

    /// Returns the in-order successor.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.nodes[id].right {
            return Some(self.leftmost(right));
        }
        let mut child = id;
        let mut parent = self.nodes[id].parent;
        while let Some(p) = parent {
            if self.nodes[p].right != Some(child) {
                break;
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        parent
    }

    /// Returns the in-order predecessor.
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.nodes[id].left {
            return Some(self.rightmost(left));
        }
        let mut child = id;
        let mut parent = self.nodes[id].parent;
        while let Some(p) = parent {
            if self.nodes[p].left != Some(child) {
                break;
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        parent
    }

    /// Returns the `n`-th node in ascending order.
    pub(crate) fn nth(&self, n: usize) -> Option<NodeId> {
        if n >= self.len() {
            return None;
        }
        let mut current = self.first();
        for _ in 0..n {
            current = current.and_then(|id| self.successor(id));
        }
        current
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub(crate) fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.into_iter().map(|r| (r, 1)).collect();
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            let node = &self.nodes[id];
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }
        max_depth
    }

    /// Returns an iterator over the entries in ascending order.
    #[inline]
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: self,
            front: self.first(),
            back: self.last(),
            remaining: self.len(),
        }
    }

    /// Searches for a node.
    ///
    /// `compare` returns the ordering of the searched key relative to the supplied node key.
    pub(crate) fn search<E, F>(&self, mut compare: F) -> Result<Option<NodeId>, E>
    where
        F: FnMut(&K) -> Result<Ordering, E>,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            match compare(&node.key)? {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => return Ok(Some(id)),
            }
        }
        Ok(None)
    }

    /// Returns the smallest node that is greater than, or equal to if `inclusive`, the searched key.
    pub(crate) fn ceiling_by<E, F>(&self, mut compare: F, inclusive: bool) -> Result<Option<NodeId>, E>
    where
        F: FnMut(&K) -> Result<Ordering, E>,
    {
        let mut candidate = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            match compare(&node.key)? {
                Ordering::Less => {
                    candidate = Some(id);
                    current = node.left;
                }
                Ordering::Equal if inclusive => return Ok(Some(id)),
                Ordering::Equal | Ordering::Greater => current = node.right,
            }
        }
        Ok(candidate)
    }

    /// Returns the largest node that is less than, or equal to if `inclusive`, the searched key.
    pub(crate) fn floor_by<E, F>(&self, mut compare: F, inclusive: bool) -> Result<Option<NodeId>, E>
    where
        F: FnMut(&K) -> Result<Ordering, E>,
    {
        let mut candidate = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            match compare(&node.key)? {
                Ordering::Greater => {
                    candidate = Some(id);
                    current = node.right;
                }
                Ordering::Equal if inclusive => return Ok(Some(id)),
                Ordering::Equal | Ordering::Less => current = node.left,
            }
        }
        Ok(candidate)
    }

    /// Inserts a key-value pair.
    ///
    /// `compare` receives the new key and an existing key. If an equal key exists, the value is
    /// replaced and the old value is returned while the existing key is retained.
    pub(crate) fn insert_by<E, F>(
        &mut self,
        key: K,
        value: V,
        mut compare: F,
    ) -> Result<(NodeId, Option<V>), E>
    where
        F: FnMut(&K, &K) -> Result<Ordering, E>,
    {
        let mut parent = None;
        let mut attach_left = false;
        let mut current = self.root;
        while let Some(id) = current {
            match compare(&key, &self.nodes[id].key)? {
                Ordering::Less => {
                    attach_left = true;
                    current = self.nodes[id].left;
                }
                Ordering::Greater => {
                    attach_left = false;
                    current = self.nodes[id].right;
                }
                Ordering::Equal => {
                    let old = replace(&mut self.nodes[id].value, value);
                    return Ok((id, Some(old)));
                }
            }
            parent = Some(id);
        }

        let id = self.nodes.insert(Node::new(key, value, parent));
        match parent {
            None => self.root = Some(id),
            Some(p) if attach_left => self.nodes[p].left = Some(id),
            Some(p) => self.nodes[p].right = Some(id),
        }
        self.fix_after_insertion(id);
        Ok((id, None))
    }

    /// Removes the node and returns its entry.
    ///
    /// If the node has two children, the entry of its successor is moved into the node and the
    /// successor is unlinked instead, therefore `id` keeps referring to the successor entry.
    pub(crate) fn remove(&mut self, id: NodeId) -> (K, V) {
        let mut target = id;
        if let (Some(_), Some(right)) = (self.nodes[id].left, self.nodes[id].right) {
            let successor = self.leftmost(right);
            if let Some((node, next)) = self.nodes.get2_mut(id, successor) {
                swap(&mut node.key, &mut next.key);
                swap(&mut node.value, &mut next.value);
            }
            target = successor;
        }

        let replacement = self.nodes[target].left.or(self.nodes[target].right);
        let parent = self.nodes[target].parent;
        if let Some(replacement) = replacement {
            self.nodes[replacement].parent = parent;
            self.replace_child(parent, target, Some(replacement));
            if self.nodes[target].color == Color::Black {
                self.fix_after_deletion(replacement);
            }
        } else if parent.is_none() {
            self.root = None;
        } else {
            // The leaf stands in for the missing child while rebalancing.
            if self.nodes[target].color == Color::Black {
                self.fix_after_deletion(target);
            }
            if let Some(parent) = self.nodes[target].parent {
                if self.nodes[parent].left == Some(target) {
                    self.nodes[parent].left = None;
                } else if self.nodes[parent].right == Some(target) {
                    self.nodes[parent].right = None;
                }
            }
        }

        let node = self.nodes.remove(target);
        (node.key, node.value)
    }

    /// Consumes the tree and returns its entries in ascending order.
    pub(crate) fn into_sorted_vec(mut self) -> Vec<(K, V)> {
        let mut ids = Vec::with_capacity(self.len());
        let mut current = self.first();
        while let Some(id) = current {
            ids.push(id);
            current = self.successor(id);
        }
        ids.into_iter()
            .map(|id| {
                let node = self.nodes.remove(id);
                (node.key, node.value)
            })
            .collect()
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.nodes[id].right {
            id = right;
        }
        id
    }

    #[inline]
    fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.nodes[id].color)
    }

    #[inline]
    fn set_color(&mut self, id: Option<NodeId>, color: Color) {
        if let Some(id) = id {
            self.nodes[id].color = color;
        }
    }

    #[inline]
    fn left_of(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.and_then(|id| self.nodes[id].left)
    }

    #[inline]
    fn right_of(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.and_then(|id| self.nodes[id].right)
    }

    /// Makes `new` take the place of `old` under `parent`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                if self.nodes[parent].left == Some(old) {
                    self.nodes[parent].left = new;
                } else {
                    self.nodes[parent].right = new;
                }
            }
        }
    }

    fn rotate_left(&mut self, id: NodeId) {
        let Some(right) = self.nodes[id].right else {
            return;
        };
        let inner = self.nodes[right].left;
        self.nodes[id].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(id);
        }
        let parent = self.nodes[id].parent;
        self.nodes[right].parent = parent;
        self.replace_child(parent, id, Some(right));
        self.nodes[right].left = Some(id);
        self.nodes[id].parent = Some(right);
    }

    fn rotate_right(&mut self, id: NodeId) {
        let Some(left) = self.nodes[id].left else {
            return;
        };
        let inner = self.nodes[left].right;
        self.nodes[id].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(id);
        }
        let parent = self.nodes[id].parent;
        self.nodes[left].parent = parent;
        self.replace_child(parent, id, Some(left));
        self.nodes[left].right = Some(id);
        self.nodes[id].parent = Some(left);
    }

    fn fix_after_insertion(&mut self, mut x: NodeId) {
        self.nodes[x].color = Color::Red;
        while let Some(parent) = self.nodes[x].parent {
            if self.nodes[parent].color == Color::Black {
                break;
            }
            // A red parent is never the root.
            let Some(grandparent) = self.nodes[parent].parent else {
                break;
            };
            if self.nodes[grandparent].left == Some(parent) {
                let uncle = self.nodes[grandparent].right;
                if self.color_of(uncle) == Color::Red {
                    self.nodes[parent].color = Color::Black;
                    self.set_color(uncle, Color::Black);
                    self.nodes[grandparent].color = Color::Red;
                    x = grandparent;
                } else {
                    let parent = if self.nodes[parent].right == Some(x) {
                        self.rotate_left(parent);
                        replace(&mut x, parent)
                    } else {
                        parent
                    };
                    self.nodes[parent].color = Color::Black;
                    self.nodes[grandparent].color = Color::Red;
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.nodes[grandparent].left;
                if self.color_of(uncle) == Color::Red {
                    self.nodes[parent].color = Color::Black;
                    self.set_color(uncle, Color::Black);
                    self.nodes[grandparent].color = Color::Red;
                    x = grandparent;
                } else {
                    let parent = if self.nodes[parent].left == Some(x) {
                        self.rotate_right(parent);
                        replace(&mut x, parent)
                    } else {
                        parent
                    };
                    self.nodes[parent].color = Color::Black;
                    self.nodes[grandparent].color = Color::Red;
                    self.rotate_left(grandparent);
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    fn fix_after_deletion(&mut self, mut x: NodeId) {
        while Some(x) != self.root && self.nodes[x].color == Color::Black {
            let Some(parent) = self.nodes[x].parent else {
                break;
            };
            if self.nodes[parent].left == Some(x) {
                let mut sibling = self.nodes[parent].right;
                if self.color_of(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.nodes[parent].color = Color::Red;
                    self.rotate_left(parent);
                    sibling = self.nodes[parent].right;
                }
                let (near, far) = (self.left_of(sibling), self.right_of(sibling));
                if self.color_of(near) == Color::Black && self.color_of(far) == Color::Black {
                    self.set_color(sibling, Color::Red);
                    x = parent;
                } else {
                    if self.color_of(far) == Color::Black {
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        if let Some(sibling) = sibling {
                            self.rotate_right(sibling);
                        }
                        sibling = self.nodes[parent].right;
                    }
                    let parent_color = self.nodes[parent].color;
                    self.set_color(sibling, parent_color);
                    self.nodes[parent].color = Color::Black;
                    let far = self.right_of(sibling);
                    self.set_color(far, Color::Black);
                    self.rotate_left(parent);
                    break;
                }
            } else {
                let mut sibling = self.nodes[parent].left;
                if self.color_of(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.nodes[parent].color = Color::Red;
                    self.rotate_right(parent);
                    sibling = self.nodes[parent].left;
                }
                let (near, far) = (self.right_of(sibling), self.left_of(sibling));
                if self.color_of(near) == Color::Black && self.color_of(far) == Color::Black {
                    self.set_color(sibling, Color::Red);
                    x = parent;
                } else {
                    if self.color_of(far) == Color::Black {
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        if let Some(sibling) = sibling {
                            self.rotate_left(sibling);
                        }
                        sibling = self.nodes[parent].left;
                    }
                    let parent_color = self.nodes[parent].color;
                    self.set_color(sibling, parent_color);
                    self.nodes[parent].color = Color::Black;
                    let far = self.left_of(sibling);
                    self.set_color(far, Color::Black);
                    self.rotate_right(parent);
                    break;
                }
            }
        }
        self.nodes[x].color = Color::Black;
        self.set_color(self.root, Color::Black);
    }
}

impl<K, V> Default for RbTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// In-order iterator over an [`RbTree`].
#[derive(Debug)]
pub(crate) struct Iter<'t, K, V> {
    tree: &'t RbTree<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'t, K, V> Iterator for Iter<'t, K, V> {
    type Item = (&'t K, &'t V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = self.tree.successor(id);
        self.remaining -= 1;
        Some(self.tree.entry(id))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = self.tree.predecessor(id);
        self.remaining -= 1;
        Some(self.tree.entry(id))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
impl<K, V> RbTree<K, V> {
    /// Asserts the red-black and linkage invariants, and returns the black height.
    pub(crate) fn check_invariants(&self) -> usize {
        assert_eq!(self.color_of(self.root), Color::Black, "red root");
        if let Some(root) = self.root {
            assert!(self.nodes[root].parent.is_none(), "root with a parent");
        }
        let mut count = 0;
        let black_height = self.check_subtree(self.root, &mut count);
        assert_eq!(count, self.len(), "unreachable nodes");
        black_height
    }

    fn check_subtree(&self, id: Option<NodeId>, count: &mut usize) -> usize {
        let Some(id) = id else {
            return 1;
        };
        *count += 1;
        let node = &self.nodes[id];
        for child in [node.left, node.right].into_iter().flatten() {
            assert_eq!(self.nodes[child].parent, Some(id), "broken parent link");
            if node.color == Color::Red {
                assert_eq!(self.nodes[child].color, Color::Black, "red node with a red child");
            }
        }
        let left = self.check_subtree(node.left, count);
        let right = self.check_subtree(node.right, count);
        assert_eq!(left, right, "unequal black heights");
        left + usize::from(node.color == Color::Black)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::Rng;
    use std::collections::BTreeMap;
    use std::convert::Infallible;

    fn total(new: &u64, existing: &u64) -> Result<Ordering, Infallible> {
        Ok(new.cmp(existing))
    }

    fn insert(tree: &mut RbTree<u64, u64>, key: u64, value: u64) -> Option<u64> {
        match tree.insert_by(key, value, total) {
            Ok((_, replaced)) => replaced,
            Err(never) => match never {},
        }
    }

    fn find(tree: &RbTree<u64, u64>, key: u64) -> Option<NodeId> {
        match tree.search(|k| Ok::<_, Infallible>(key.cmp(k))) {
            Ok(found) => found,
            Err(never) => match never {},
        }
    }

    #[test]
    fn ascending_insert_stays_balanced() {
        let mut tree = RbTree::new();
        for k in 0..1024 {
            assert!(insert(&mut tree, k, k).is_none());
            tree.check_invariants();
        }
        assert_eq!(tree.len(), 1024);
        assert!(tree.depth() <= 2 * 11);
        assert!(tree.iter().map(|(k, _)| *k).eq(0..1024));
        assert!(tree.iter().rev().map(|(k, _)| *k).eq((0..1024).rev()));
    }

    #[test]
    fn replace_keeps_size() {
        let mut tree = RbTree::new();
        assert!(insert(&mut tree, 7, 0).is_none());
        assert_eq!(insert(&mut tree, 7, 1), Some(0));
        assert_eq!(tree.len(), 1);
        assert_eq!(find(&tree, 7).map(|id| *tree.value(id)), Some(1));
    }

    #[test]
    fn random_insert_remove() {
        let mut rng = rand::rng();
        let mut tree = RbTree::new();
        let mut model = BTreeMap::new();
        for _ in 0..4096 {
            let key = rng.random_range(0..512_u64);
            if rng.random_bool(0.6) {
                assert_eq!(insert(&mut tree, key, key * 2), model.insert(key, key * 2));
            } else {
                let removed = find(&tree, key).map(|id| tree.remove(id));
                assert_eq!(removed, model.remove(&key).map(|v| (key, v)));
            }
            tree.check_invariants();
        }
        assert!(tree.iter().map(|(k, v)| (*k, *v)).eq(model.into_iter()));
    }

    #[test]
    fn remove_two_children_moves_successor() {
        let mut tree = RbTree::new();
        for k in [50, 30, 70, 20, 40, 60, 80] {
            insert(&mut tree, k, k);
        }
        let Some(id) = find(&tree, 50) else {
            unreachable!();
        };
        assert!(tree.has_two_children(id));
        assert_eq!(tree.remove(id), (50, 50));
        assert_eq!(*tree.key(id), 60);
        tree.check_invariants();
    }

    #[test]
    fn navigation() {
        let mut tree = RbTree::new();
        for k in (0..100).step_by(10) {
            insert(&mut tree, k, k);
        }
        let ceiling = |key: u64, inclusive| {
            tree.ceiling_by(|k| Ok::<_, Infallible>(key.cmp(k)), inclusive)
                .ok()
                .flatten()
                .map(|id| *tree.key(id))
        };
        let floor = |key: u64, inclusive| {
            tree.floor_by(|k| Ok::<_, Infallible>(key.cmp(k)), inclusive)
                .ok()
                .flatten()
                .map(|id| *tree.key(id))
        };
        assert_eq!(ceiling(15, true), Some(20));
        assert_eq!(ceiling(20, true), Some(20));
        assert_eq!(ceiling(20, false), Some(30));
        assert_eq!(ceiling(91, true), None);
        assert_eq!(floor(15, true), Some(10));
        assert_eq!(floor(10, false), Some(0));
        assert_eq!(floor(0, false), None);
        assert_eq!(tree.nth(3).map(|id| *tree.key(id)), Some(30));
        assert!(tree.nth(10).is_none());
    }

    #[test]
    fn drain_sorted() {
        let mut keys: Vec<u64> = (0..256).collect();
        keys.shuffle(&mut rand::rng());
        let mut tree = RbTree::new();
        for k in &keys {
            insert(&mut tree, *k, *k);
        }
        let sorted: Vec<u64> = tree.into_sorted_vec().into_iter().map(|(k, _)| k).collect();
        assert!(sorted.into_iter().eq(0..256));
    }
}
