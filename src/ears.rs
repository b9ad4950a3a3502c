//! The ear slicing loop and its fallback passes.

use alloc::vec::Vec;
use log::{debug, warn};
use num_traits::float::Float;

use crate::node::{filter_points, remove_node, split_polygon, Node, NodeIndex};
use crate::predicates::{area, equals, intersects, is_valid_diagonal, locally_inside, point_in_triangle};
use crate::zorder::{index_curve, Bounds};
use crate::{Earcut, Index, Stats};

/// How far a ring has escalated after scans that found no ear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pass {
    /// plain scan of the ring as built
    Initial,
    /// scan after removing duplicate and collinear points
    Filtered,
    /// scan after curing small local self-intersections
    Cured,
}

/// A ring entry point waiting to be sliced.
pub(crate) type Job = (NodeIndex, Pass);

impl<T: Float> Earcut<T> {
    /// triangulate a ring and every fragment split off from it
    pub(crate) fn earcut_linked<N: Index>(
        &mut self,
        start_i: NodeIndex,
        triangles: &mut Vec<N>,
        bounds: Option<&Bounds<T>>,
    ) {
        let Self {
            nodes, jobs, stats, ..
        } = self;

        jobs.clear();
        jobs.push((start_i, Pass::Initial));
        while let Some(job) = jobs.pop() {
            slice_ears(nodes, job, triangles, bounds, jobs, stats);
        }
    }
}

/// Clip ears off one ring, escalating through the passes until it is exhausted.
///
/// A split pushes both halves as new jobs instead of recursing.
fn slice_ears<T: Float, N: Index>(
    nodes: &mut Vec<Node<T>>,
    (mut ear_i, mut pass): Job,
    triangles: &mut Vec<N>,
    bounds: Option<&Bounds<T>>,
    jobs: &mut Vec<Job>,
    stats: &mut Stats,
) {
    if pass == Pass::Initial {
        if let Some(bounds) = bounds {
            index_curve(nodes, ear_i, bounds);
        }
    }

    let mut stop_i = ear_i;
    loop {
        let ear = node!(nodes, ear_i);
        if ear.prev_i == ear.next_i {
            return;
        }
        let (prev_i, next_i) = (ear.prev_i, ear.next_i);

        let clip = match bounds {
            Some(bounds) => is_ear_hashed(nodes, ear_i, bounds),
            None => is_ear(nodes, ear_i),
        };
        if clip {
            emit(triangles, [node!(nodes, prev_i).i, ear.i, node!(nodes, next_i).i]);
            remove_node(nodes, ear_i);

            // skipping the next vertex leads to less sliver triangles
            ear_i = node!(nodes, next_i).next_i;
            stop_i = ear_i;
            continue;
        }

        ear_i = next_i;
        if ear_i != stop_i {
            continue;
        }

        // looped through the whole remaining ring without finding an ear
        let escalated = match pass {
            Pass::Initial => {
                stats.filter_retries += 1;
                filter_points(nodes, ear_i, None).map(|i| (i, Pass::Filtered))
            }
            Pass::Filtered => filter_points(nodes, ear_i, None)
                .and_then(|i| cure_local_intersections(nodes, i, triangles, stats))
                .map(|i| (i, Pass::Cured)),
            Pass::Cured => {
                split_earcut(nodes, ear_i, jobs, stats);
                return;
            }
        };
        let Some((next_ear_i, next_pass)) = escalated else {
            return;
        };
        debug!("no ear found in {:?} pass, retrying as {:?}", pass, next_pass);
        (ear_i, pass, stop_i) = (next_ear_i, next_pass, next_ear_i);
    }
}

fn emit<N: Index>(triangles: &mut Vec<N>, vertices: [u32; 3]) {
    triangles.extend(vertices.map(|i| N::from_usize(i as usize)));
}

/// candidate ear triangle with its bounding box
struct Candidate<T> {
    a: [T; 2],
    b: [T; 2],
    c: [T; 2],
    min: [T; 2],
    max: [T; 2],
}

impl<T: Float> Candidate<T> {
    fn new(a: &Node<T>, b: &Node<T>, c: &Node<T>) -> Self {
        Self {
            a: [a.x, a.y],
            b: [b.x, b.y],
            c: [c.x, c.y],
            min: [a.x.min(b.x.min(c.x)), a.y.min(b.y.min(c.y))],
            max: [a.x.max(b.x.max(c.x)), a.y.max(b.y.max(c.y))],
        }
    }

    /// whether `p` is a reflex vertex inside the candidate, which rules the ear out
    fn blocked_by(&self, nodes: &[Node<T>], p: &Node<T>) -> bool {
        p.x >= self.min[0]
            && p.x <= self.max[0]
            && p.y >= self.min[1]
            && p.y <= self.max[1]
            && point_in_triangle(self.a, self.b, self.c, [p.x, p.y])
            && area(node!(nodes, p.prev_i), p, node!(nodes, p.next_i)) >= T::zero()
    }
}

/// check whether a ring node forms a valid ear with its neighbours
fn is_ear<T: Float>(nodes: &[Node<T>], ear_i: NodeIndex) -> bool {
    let b = node!(nodes, ear_i);
    let a = node!(nodes, b.prev_i);
    let c = node!(nodes, b.next_i);

    if area(a, b, c) >= T::zero() {
        // reflex, can't be an ear
        return false;
    }

    // now make sure no other point lies inside the potential ear
    let candidate = Candidate::new(a, b, c);
    let mut p_i = c.next_i;
    while p_i != b.prev_i {
        let p = node!(nodes, p_i);
        if candidate.blocked_by(nodes, p) {
            return false;
        }
        p_i = p.next_i;
    }
    true
}

/// same as `is_ear`, but only visits nodes whose z-order key falls in the ear's range
fn is_ear_hashed<T: Float>(nodes: &[Node<T>], ear_i: NodeIndex, bounds: &Bounds<T>) -> bool {
    let b = node!(nodes, ear_i);
    let a = node!(nodes, b.prev_i);
    let c = node!(nodes, b.next_i);

    if area(a, b, c) >= T::zero() {
        // reflex, can't be an ear
        return false;
    }

    let candidate = Candidate::new(a, b, c);
    let min_z = bounds.z_order(candidate.min[0], candidate.min[1]);
    let max_z = bounds.z_order(candidate.max[0], candidate.max[1]);
    let blocks = |p_i: NodeIndex| {
        p_i != b.prev_i && p_i != b.next_i && candidate.blocked_by(nodes, node!(nodes, p_i))
    };

    let mut down = b.prev_z_i;
    let mut up = b.next_z_i;

    // look for points inside the triangle in both directions
    while let (Some(p_i), Some(n_i)) = (down, up) {
        let (p, n) = (node!(nodes, p_i), node!(nodes, n_i));
        if p.z < min_z || n.z > max_z {
            break;
        }
        if blocks(p_i) || blocks(n_i) {
            return false;
        }
        (down, up) = (p.prev_z_i, n.next_z_i);
    }

    // look for remaining points in decreasing z-order
    while let Some(p_i) = down {
        let p = node!(nodes, p_i);
        if p.z < min_z {
            break;
        }
        if blocks(p_i) {
            return false;
        }
        down = p.prev_z_i;
    }

    // look for remaining points in increasing z-order
    while let Some(n_i) = up {
        let n = node!(nodes, n_i);
        if n.z > max_z {
            break;
        }
        if blocks(n_i) {
            return false;
        }
        up = n.next_z_i;
    }

    true
}

/// Walk the ring and cut off small local self-intersections.
///
/// Where edge (a, p) crosses edge (p.next, b) and a-b is locally inside at both ends,
/// the triangle (a, p, b) is emitted and p, p.next are dropped.
fn cure_local_intersections<T: Float, N: Index>(
    nodes: &mut [Node<T>],
    start_i: NodeIndex,
    triangles: &mut Vec<N>,
    stats: &mut Stats,
) -> Option<NodeIndex> {
    let mut start_i = start_i;
    let mut p_i = start_i;
    loop {
        let p = node!(nodes, p_i);
        let (a_i, p_next_i) = (p.prev_i, p.next_i);
        let p_next = node!(nodes, p_next_i);
        let b_i = p_next.next_i;
        let (a, b) = (node!(nodes, a_i), node!(nodes, b_i));

        if !equals(a, b)
            && intersects(a, p, p_next, b)
            && locally_inside(nodes, a, b)
            && locally_inside(nodes, b, a)
        {
            emit(triangles, [a.i, p.i, b.i]);
            stats.cured_intersections += 1;

            remove_node(nodes, p_i);
            remove_node(nodes, p_next_i);
            (p_i, start_i) = (b_i, b_i);
        }

        p_i = node!(nodes, p_i).next_i;
        if p_i == start_i {
            return filter_points(nodes, p_i, None);
        }
    }
}

/// Split the ring along the first valid inner diagonal and queue both halves.
fn split_earcut<T: Float>(
    nodes: &mut Vec<Node<T>>,
    start_i: NodeIndex,
    jobs: &mut Vec<Job>,
    stats: &mut Stats,
) {
    let mut a_i = start_i;
    loop {
        let a = node!(nodes, a_i);
        let (a_prev_i, a_next_i) = (a.prev_i, a.next_i);

        let mut b_i = node!(nodes, a_next_i).next_i;
        while b_i != a_prev_i {
            if node!(nodes, a_i).i != node!(nodes, b_i).i && is_valid_diagonal(nodes, a_i, b_i) {
                let c_i = split_polygon(nodes, a_i, b_i);

                // filter collinear points around the cuts
                let end_i = node!(nodes, a_i).next_i;
                let first = filter_points(nodes, a_i, Some(end_i));
                let end_i = node!(nodes, c_i).next_i;
                let second = filter_points(nodes, c_i, Some(end_i));

                stats.splits += 1;
                debug!(
                    "split ring along diagonal {}-{}",
                    node!(nodes, a_i).i,
                    node!(nodes, b_i).i
                );

                // the first half is popped first
                jobs.extend(second.map(|i| (i, Pass::Initial)));
                jobs.extend(first.map(|i| (i, Pass::Initial)));
                return;
            }
            b_i = node!(nodes, b_i).next_i;
        }

        a_i = a_next_i;
        if a_i == start_i {
            stats.abandoned += 1;
            warn!(
                "no valid diagonal left; dropping fragment at vertex {}",
                node!(nodes, a_i).i
            );
            return;
        }
    }
}
