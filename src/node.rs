//! Arena-backed circular rings of polygon vertices.
//!
//! Nodes live in a single `Vec` addressed by [`NodeIndex`]; slot 0 holds a sentinel so
//! links can be non-zero. Removed nodes stay in the arena unlinked until the next reset.

use alloc::vec::Vec;
use core::num::NonZeroU32;
use num_traits::float::Float;

use crate::predicates::{area, equals};
use crate::zorder::UNINDEXED;

pub(crate) type NodeIndex = NonZeroU32;

pub(crate) struct Node<T> {
    /// vertex index in the input point list
    pub(crate) i: u32,
    /// z-order key, `UNINDEXED` until the ring is first indexed
    pub(crate) z: u32,
    pub(crate) x: T,
    pub(crate) y: T,
    /// previous node in the ring
    pub(crate) prev_i: NodeIndex,
    /// next node in the ring
    pub(crate) next_i: NodeIndex,
    /// previous node in z-order
    pub(crate) prev_z_i: Option<NodeIndex>,
    /// next node in z-order
    pub(crate) next_z_i: Option<NodeIndex>,
    /// single-vertex hole, never filtered out
    pub(crate) steiner: bool,
}

impl<T: Float> Node<T> {
    pub(crate) fn new(i: u32, x: T, y: T) -> Self {
        Self {
            i,
            z: UNINDEXED,
            x,
            y,
            prev_i: NodeIndex::MIN,
            next_i: NodeIndex::MIN,
            prev_z_i: None,
            next_z_i: None,
            steiner: false,
        }
    }

    /// unlinked copy sharing the vertex index and position
    fn duplicate(&self) -> Self {
        Self {
            z: self.z,
            ..Self::new(self.i, self.x, self.y)
        }
    }
}

/// append a node; the arena always holds the sentinel, so the new slot is never 0
fn push<T>(nodes: &mut Vec<Node<T>>, node: Node<T>) -> NodeIndex {
    debug_assert!(!nodes.is_empty());
    let index = NodeIndex::MIN.saturating_add(nodes.len() as u32 - 1);
    nodes.push(node);
    index
}

/// create a node and link it after `last` (or into a ring of its own)
pub(crate) fn insert_node<T: Float>(
    nodes: &mut Vec<Node<T>>,
    i: u32,
    x: T,
    y: T,
    last: Option<NodeIndex>,
) -> NodeIndex {
    let p_i = push(nodes, Node::new(i, x, y));
    match last {
        Some(last_i) => {
            let last = node_mut!(nodes, last_i);
            let next_i = last.next_i;
            last.next_i = p_i;
            node_mut!(nodes, next_i).prev_i = p_i;
            let p = node_mut!(nodes, p_i);
            (p.prev_i, p.next_i) = (last_i, next_i);
        }
        None => {
            let p = node_mut!(nodes, p_i);
            (p.prev_i, p.next_i) = (p_i, p_i);
        }
    }
    p_i
}

/// unlink a node from its ring and from the z-order list; returns its former neighbours
pub(crate) fn remove_node<T>(nodes: &mut [Node<T>], p_i: NodeIndex) -> (NodeIndex, NodeIndex) {
    let p = node!(nodes, p_i);
    let (prev_i, next_i) = (p.prev_i, p.next_i);
    let (prev_z_i, next_z_i) = (p.prev_z_i, p.next_z_i);

    node_mut!(nodes, next_i).prev_i = prev_i;
    node_mut!(nodes, prev_i).next_i = next_i;

    if let Some(z_i) = prev_z_i {
        node_mut!(nodes, z_i).next_z_i = next_z_i;
    }
    if let Some(z_i) = next_z_i {
        node_mut!(nodes, z_i).prev_z_i = prev_z_i;
    }
    (prev_i, next_i)
}

/// Connect `a` and `b` with a two-way bridge.
///
/// If both nodes are on the same ring, the ring is split in two; if they are on
/// different rings (outer ring and hole), the rings are merged. `a` keeps going to `b`,
/// and the returned duplicate of `b` starts the chain that continues with the
/// duplicate of `a`.
pub(crate) fn split_polygon<T: Float>(
    nodes: &mut Vec<Node<T>>,
    a_i: NodeIndex,
    b_i: NodeIndex,
) -> NodeIndex {
    let a2 = node!(nodes, a_i).duplicate();
    let b2 = node!(nodes, b_i).duplicate();
    let a2_i = push(nodes, a2);
    let b2_i = push(nodes, b2);

    let an_i = node!(nodes, a_i).next_i;
    let bp_i = node!(nodes, b_i).prev_i;

    node_mut!(nodes, a_i).next_i = b_i;
    node_mut!(nodes, b_i).prev_i = a_i;

    let a2 = node_mut!(nodes, a2_i);
    (a2.prev_i, a2.next_i) = (b2_i, an_i);
    node_mut!(nodes, an_i).prev_i = a2_i;

    let b2 = node_mut!(nodes, b2_i);
    (b2.prev_i, b2.next_i) = (bp_i, a2_i);
    node_mut!(nodes, bp_i).next_i = b2_i;

    b2_i
}

/// Remove duplicate and collinear points, walking from `start_i` until `end_i`
/// (the whole ring when `None`) without a change.
///
/// Returns `None` when the ring collapses to a single node.
pub(crate) fn filter_points<T: Float>(
    nodes: &mut [Node<T>],
    start_i: NodeIndex,
    end_i: Option<NodeIndex>,
) -> Option<NodeIndex> {
    let mut end_i = end_i.unwrap_or(start_i);
    let mut p_i = start_i;

    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        let redundant = !p.steiner
            && (equals(p, p_next) || area(node!(nodes, p.prev_i), p, p_next) == T::zero());

        if redundant {
            let (prev_i, next_i) = remove_node(nodes, p_i);
            if prev_i == next_i {
                return None;
            }
            (p_i, end_i) = (prev_i, prev_i);
        } else {
            p_i = p.next_i;
            if p_i == end_i {
                return Some(end_i);
            }
        }
    }
}

/// leftmost node of a ring, lowest y on ties
pub(crate) fn get_leftmost<T: Float>(nodes: &[Node<T>], start_i: NodeIndex) -> NodeIndex {
    let mut p_i = start_i;
    let mut leftmost_i = start_i;

    loop {
        let p = node!(nodes, p_i);
        let leftmost = node!(nodes, leftmost_i);
        if p.x < leftmost.x || (p.x == leftmost.x && p.y < leftmost.y) {
            leftmost_i = p_i;
        }
        p_i = p.next_i;
        if p_i == start_i {
            return leftmost_i;
        }
    }
}
