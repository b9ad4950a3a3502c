//! Orientation and containment tests on ring nodes.

use num_traits::float::Float;

use crate::node::{Node, NodeIndex};

/// signed area of a triangle; negative for a convex turn in ring order
#[inline]
pub(crate) fn area<T: Float>(p: &Node<T>, q: &Node<T>, r: &Node<T>) -> T {
    (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y)
}

/// check if two nodes share a position
#[inline]
pub(crate) fn equals<T: Float>(p1: &Node<T>, p2: &Node<T>) -> bool {
    p1.x == p2.x && p1.y == p2.y
}

/// twice the signed area of a ring given as points (shoelace formula)
pub(crate) fn signed_area<T: Float>(points: &[[T; 2]]) -> T {
    let Some(&last) = points.last() else {
        return T::zero();
    };
    let (sum, _) = points
        .iter()
        .fold((T::zero(), last), |(sum, [bx, by]), &[ax, ay]| {
            (sum + (bx - ax) * (ay + by), [ax, ay])
        });
    sum
}

/// check if a point lies within a convex triangle (boundary included)
#[inline]
pub(crate) fn point_in_triangle<T: Float>(
    [ax, ay]: [T; 2],
    [bx, by]: [T; 2],
    [cx, cy]: [T; 2],
    [px, py]: [T; 2],
) -> bool {
    (cx - px) * (ay - py) >= (ax - px) * (cy - py)
        && (ax - px) * (by - py) >= (bx - px) * (ay - py)
        && (bx - px) * (cy - py) >= (cx - px) * (by - py)
}

fn sign<T: Float>(v: T) -> i8 {
    (v > T::zero()) as i8 - (v < T::zero()) as i8
}

/// for collinear points p, q, r, check if q lies on segment pr
fn on_segment<T: Float>(p: &Node<T>, q: &Node<T>, r: &Node<T>) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// check if segments p1-q1 and p2-q2 intersect, touching included
pub(crate) fn intersects<T: Float>(p1: &Node<T>, q1: &Node<T>, p2: &Node<T>, q2: &Node<T>) -> bool {
    let o1 = sign(area(p1, q1, p2));
    let o2 = sign(area(p1, q1, q2));
    let o3 = sign(area(p2, q2, p1));
    let o4 = sign(area(p2, q2, q1));

    (o1 != o2 && o3 != o4)
        || (o1 == 0 && on_segment(p1, p2, q1))
        || (o2 == 0 && on_segment(p1, q2, q1))
        || (o3 == 0 && on_segment(p2, p1, q2))
        || (o4 == 0 && on_segment(p2, q1, q2))
}

/// check if the diagonal a-b crosses any edge of the ring not incident to a or b
fn intersects_polygon<T: Float>(nodes: &[Node<T>], a_i: NodeIndex, b_i: NodeIndex) -> bool {
    let (a, b) = (node!(nodes, a_i), node!(nodes, b_i));
    let mut p_i = a_i;
    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        if p.i != a.i && p.i != b.i && p_next.i != a.i && p_next.i != b.i
            && intersects(p, p_next, a, b)
        {
            return true;
        }
        p_i = p.next_i;
        if p_i == a_i {
            return false;
        }
    }
}

/// check if the diagonal a-b leaves a into the polygon interior
pub(crate) fn locally_inside<T: Float>(nodes: &[Node<T>], a: &Node<T>, b: &Node<T>) -> bool {
    let a_prev = node!(nodes, a.prev_i);
    let a_next = node!(nodes, a.next_i);
    if area(a_prev, a, a_next) < T::zero() {
        area(a, b, a_next) >= T::zero() && area(a, a_prev, b) >= T::zero()
    } else {
        area(a, b, a_prev) < T::zero() || area(a, a_next, b) < T::zero()
    }
}

/// check if the midpoint of the diagonal a-b is inside the ring (even-odd rule)
fn middle_inside<T: Float>(nodes: &[Node<T>], a_i: NodeIndex, b_i: NodeIndex) -> bool {
    let (a, b) = (node!(nodes, a_i), node!(nodes, b_i));
    let two = T::one() + T::one();
    let (px, py) = ((a.x + b.x) / two, (a.y + b.y) / two);

    let mut inside = false;
    let mut p_i = a_i;
    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        if (p.y > py) != (p_next.y > py)
            && p_next.y != p.y
            && px < (p_next.x - p.x) * (py - p.y) / (p_next.y - p.y) + p.x
        {
            inside = !inside;
        }
        p_i = p.next_i;
        if p_i == a_i {
            return inside;
        }
    }
}

/// check if the diagonal a-b lies in the ring interior and can split it
pub(crate) fn is_valid_diagonal<T: Float>(
    nodes: &[Node<T>],
    a_i: NodeIndex,
    b_i: NodeIndex,
) -> bool {
    let (a, b) = (node!(nodes, a_i), node!(nodes, b_i));
    let (a_prev, a_next) = (node!(nodes, a.prev_i), node!(nodes, a.next_i));
    let (b_prev, b_next) = (node!(nodes, b.prev_i), node!(nodes, b.next_i));

    if a_next.i == b.i || a_prev.i == b.i || intersects_polygon(nodes, a_i, b_i) {
        return false;
    }

    let visible = locally_inside(nodes, a, b)
        && locally_inside(nodes, b, a)
        && middle_inside(nodes, a_i, b_i)
        // does not create opposite-facing sectors
        && (area(a_prev, a, b_prev) != T::zero() || area(a, b_prev, b) != T::zero());

    // zero-length diagonal between two coincident convex vertices
    let touching = equals(a, b)
        && area(a_prev, a, a_next) > T::zero()
        && area(b_prev, b, b_next) > T::zero();

    visible || touching
}

/// whether the sector at m contains the sector at p (m and p share a position)
pub(crate) fn sector_contains_sector<T: Float>(
    nodes: &[Node<T>],
    m: &Node<T>,
    p: &Node<T>,
) -> bool {
    area(node!(nodes, m.prev_i), m, node!(nodes, p.prev_i)) < T::zero()
        && area(node!(nodes, p.next_i), m, node!(nodes, m.next_i)) < T::zero()
}
