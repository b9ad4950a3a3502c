//! Merging hole rings into the outer ring through bridge edges.

use alloc::vec::Vec;
use core::cmp::Ordering;
use log::warn;
use num_traits::float::Float;

use crate::node::{filter_points, get_leftmost, split_polygon, Node, NodeIndex};
use crate::predicates::{locally_inside, point_in_triangle, sector_contains_sector};
use crate::{ring_ranges, Earcut, Index, Stats};

impl<T: Float> Earcut<T> {
    /// Link every hole into the outer ring, producing a single ring without holes.
    ///
    /// Returns `None` if the merged ring collapsed while filtering around a bridge.
    pub(crate) fn eliminate_holes<N: Index>(
        &mut self,
        hole_indices: &[N],
        mut outer_i: NodeIndex,
    ) -> Option<NodeIndex> {
        self.queue.clear();
        for range in ring_ranges(hole_indices, self.data.len()).skip(1) {
            let Some(list_i) = self.linked_list(range.start, range.end, false) else {
                continue;
            };
            let list = node_mut!(self.nodes, list_i);
            if list.next_i == list_i {
                list.steiner = true;
            }
            self.queue.push(get_leftmost(&self.nodes, list_i));
        }

        let nodes = &self.nodes;
        self.queue.sort_by(|&a_i, &b_i| {
            let (a, b) = (node!(nodes, a_i), node!(nodes, b_i));
            a.x.partial_cmp(&b.x)
                .unwrap_or(Ordering::Equal)
                .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
        });
        self.stats.holes = self.queue.len();

        // process holes from left to right
        let Self {
            nodes, queue, stats, ..
        } = self;
        for &hole_i in queue.iter() {
            outer_i = eliminate_hole(nodes, hole_i, outer_i, stats)?;
        }
        Some(outer_i)
    }
}

/// find a bridge between the hole and the outer ring and link them through it
fn eliminate_hole<T: Float>(
    nodes: &mut Vec<Node<T>>,
    hole_i: NodeIndex,
    outer_i: NodeIndex,
    stats: &mut Stats,
) -> Option<NodeIndex> {
    let Some(bridge_i) = find_hole_bridge(nodes, hole_i, outer_i) else {
        stats.unbridged += 1;
        warn!(
            "no bridge found for hole at vertex {}; hole ignored",
            node!(nodes, hole_i).i
        );
        return Some(outer_i);
    };
    let bridge_reverse_i = split_polygon(nodes, bridge_i, hole_i);

    // filter collinear points around the cuts
    let end_i = node!(nodes, bridge_reverse_i).next_i;
    filter_points(nodes, bridge_reverse_i, Some(end_i));
    let end_i = node!(nodes, bridge_i).next_i;
    filter_points(nodes, bridge_i, Some(end_i))
}

/// David Eberly's algorithm for finding a bridge between a hole and the outer ring
fn find_hole_bridge<T: Float>(
    nodes: &[Node<T>],
    hole_i: NodeIndex,
    outer_i: NodeIndex,
) -> Option<NodeIndex> {
    let hole = node!(nodes, hole_i);
    let (hx, hy) = (hole.x, hole.y);
    let mut qx = T::neg_infinity();
    let mut m_i: Option<NodeIndex> = None;

    // find a segment intersected by a ray from the hole's leftmost point to the left;
    // the segment's endpoint with lesser x is the potential connection point
    let mut p_i = outer_i;
    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        if hy <= p.y && hy >= p_next.y && p_next.y != p.y {
            let x = p.x + (hy - p.y) * (p_next.x - p.x) / (p_next.y - p.y);
            if x <= hx && x > qx {
                qx = x;
                if x == hx {
                    // the hole point lies on an outer vertex
                    if hy == p.y {
                        return Some(p_i);
                    }
                    if hy == p_next.y {
                        return Some(p.next_i);
                    }
                }
                m_i = Some(if p.x < p_next.x { p_i } else { p.next_i });
            }
        }
        p_i = p.next_i;
        if p_i == outer_i {
            break;
        }
    }

    let m_i = m_i?;
    if hx == qx {
        // hole touches the outer segment; pick its leftmost endpoint
        return Some(m_i);
    }

    // look for points inside the triangle of hole point, segment intersection and endpoint;
    // if there are none, the connection is valid, otherwise pick the point of minimum
    // angle with the ray
    let m = node!(nodes, m_i);
    let (mx, my) = (m.x, m.y);
    let (left, right) = if hy < my { (hx, qx) } else { (qx, hx) };
    let mut best_i = m_i;
    let mut tan_min = T::infinity();

    let mut p_i = m_i;
    loop {
        let p = node!(nodes, p_i);
        if hx >= p.x
            && p.x >= mx
            && hx != p.x
            && point_in_triangle([left, hy], [mx, my], [right, hy], [p.x, p.y])
        {
            let tan = (hy - p.y).abs() / (hx - p.x);
            let best = node!(nodes, best_i);
            if locally_inside(nodes, p, hole)
                && (tan < tan_min
                    || (tan == tan_min
                        && (p.x > best.x
                            || (p.x == best.x && sector_contains_sector(nodes, best, p)))))
            {
                best_i = p_i;
                tan_min = tan;
            }
        }

        p_i = p.next_i;
        if p_i == m_i {
            return Some(best_i);
        }
    }
}
