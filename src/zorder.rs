//! Z-order (Morton) keys and the secondary node list sorted by them.

use num_traits::float::Float;

use crate::node::{Node, NodeIndex};

/// Bits per axis in a z-order key; scaled coordinates span `0..2^Z_ORDER_BITS`.
pub const Z_ORDER_BITS: u32 = 15;

const GRID_MAX: u32 = (1 << Z_ORDER_BITS) - 1;

/// key of a node that has not been indexed yet; real keys use at most 30 bits
pub(crate) const UNINDEXED: u32 = u32::MAX;

/// Outer ring bounding box, used to map coordinates onto the z-order grid.
pub(crate) struct Bounds<T> {
    min_x: T,
    min_y: T,
    inv_size: T,
}

impl<T: Float> Bounds<T> {
    /// `None` if the points have no extent
    pub(crate) fn of(points: &[[T; 2]]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        let (min, max) = rest.iter().fold((first, first), |(min, max), &[x, y]| {
            ([min[0].min(x), min[1].min(y)], [max[0].max(x), max[1].max(y)])
        });

        let size = (max[0] - min[0]).max(max[1] - min[1]);
        if size <= T::zero() || !size.is_finite() {
            return None;
        }
        Some(Self {
            min_x: min[0],
            min_y: min[1],
            inv_size: T::from(GRID_MAX)? / size,
        })
    }

    /// z-order key of a point inside the bounding box
    pub(crate) fn z_order(&self, x: T, y: T) -> u32 {
        let x = self.to_grid(x - self.min_x);
        let y = self.to_grid(y - self.min_y);
        spread(x) | (spread(y) << 1)
    }

    /// points outside the box (malformed holes) are clamped onto the grid
    fn to_grid(&self, offset: T) -> u32 {
        (offset * self.inv_size)
            .to_u32()
            .map_or(0, |v| v.min(GRID_MAX))
    }
}

/// spread the low 16 bits of `v` over the even bit positions
fn spread(v: u32) -> u32 {
    let mut v = v & 0xFFFF;
    v = (v | (v << 8)) & 0x00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333;
    (v | (v << 1)) & 0x5555_5555
}

/// interlink the nodes of a ring in z-order
pub(crate) fn index_curve<T: Float>(nodes: &mut [Node<T>], start_i: NodeIndex, bounds: &Bounds<T>) {
    let mut p_i = start_i;
    loop {
        let p = node_mut!(nodes, p_i);
        if p.z == UNINDEXED {
            p.z = bounds.z_order(p.x, p.y);
        }
        p.prev_z_i = Some(p.prev_i);
        p.next_z_i = Some(p.next_i);
        p_i = p.next_i;
        if p_i == start_i {
            break;
        }
    }

    // open the cycle in front of the start node
    let start = node_mut!(nodes, start_i);
    let last_i = start.prev_i;
    start.prev_z_i = None;
    node_mut!(nodes, last_i).next_z_i = None;

    sort_linked(nodes, start_i);
}

/// Bottom-up merge sort of the z-order list by key, stable and in place.
///
/// Simon Tatham's linked list merge sort:
/// <http://www.chiark.greenend.org.uk/~sgtatham/algorithms/listsort.html>
fn sort_linked<T>(nodes: &mut [Node<T>], head_i: NodeIndex) {
    let mut head = Some(head_i);
    let mut in_size = 1;

    loop {
        let mut p = head;
        head = None;
        let mut tail: Option<NodeIndex> = None;
        let mut num_merges = 0;

        while let Some(p_start) = p {
            num_merges += 1;

            // q starts in_size steps after p
            let mut q = Some(p_start);
            let mut p_size = 0;
            while p_size < in_size {
                let Some(q_i) = q else { break };
                p_size += 1;
                q = node!(nodes, q_i).next_z_i;
            }
            let mut q_size = in_size;

            loop {
                let from_p = p.filter(|_| p_size > 0);
                let from_q = q.filter(|_| q_size > 0);
                let (e_i, take_q) = match (from_p, from_q) {
                    (None, None) => break,
                    (Some(p_i), None) => (p_i, false),
                    (None, Some(q_i)) => (q_i, true),
                    (Some(p_i), Some(q_i)) => {
                        if node!(nodes, p_i).z <= node!(nodes, q_i).z {
                            (p_i, false)
                        } else {
                            (q_i, true)
                        }
                    }
                };

                let next = node!(nodes, e_i).next_z_i;
                if take_q {
                    q = next;
                    q_size -= 1;
                } else {
                    p = next;
                    p_size -= 1;
                }

                node_mut!(nodes, e_i).prev_z_i = tail;
                match tail {
                    Some(tail_i) => node_mut!(nodes, tail_i).next_z_i = Some(e_i),
                    None => head = Some(e_i),
                }
                tail = Some(e_i);
            }

            p = q;
        }

        if let Some(tail_i) = tail {
            node_mut!(nodes, tail_i).next_z_i = None;
        }
        if num_merges <= 1 {
            return;
        }
        in_size *= 2;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::node::insert_node;
    use alloc::vec::Vec;

    fn bounds() -> Bounds<f64> {
        let size = GRID_MAX as f64;
        Bounds::of(&[[0.0, 0.0], [size, 0.0], [size, size], [0.0, size]]).unwrap()
    }

    #[test]
    fn test_spread_interleaves_bits() {
        assert_eq!(spread(0), 0);
        assert_eq!(spread(1), 1);
        assert_eq!(spread(0b11), 0b101);
        assert_eq!(spread(GRID_MAX), 0x1555_5555);
    }

    #[test]
    fn test_z_order_corners() {
        let b = bounds();
        assert_eq!(b.z_order(0.0, 0.0), 0);
        assert_eq!(b.z_order(32767.0, 0.0), spread(GRID_MAX));
        assert_eq!(b.z_order(0.0, 32767.0), spread(GRID_MAX) << 1);
        assert_eq!(b.z_order(32767.0, 32767.0), (1 << (2 * Z_ORDER_BITS)) - 1);
    }

    #[test]
    fn test_z_order_clamps_outside_points() {
        let b = bounds();
        assert_eq!(b.z_order(-5.0, -5.0), 0);
        assert_eq!(b.z_order(40000.0, 40000.0), b.z_order(32767.0, 32767.0));
        assert_eq!(b.z_order(f64::NAN, 0.0), 0);
    }

    #[test]
    fn test_no_bounds_without_extent() {
        assert!(Bounds::<f64>::of(&[]).is_none());
        assert!(Bounds::of(&[[1.0, 1.0], [1.0, 1.0]]).is_none());
    }

    #[test]
    fn test_index_curve_sorts_ring() {
        let points = [
            [30000.0, 30000.0],
            [100.0, 100.0],
            [16000.0, 0.0],
            [0.0, 16000.0],
            [24000.0, 7000.0],
            [9000.0, 26000.0],
            [100.0, 100.0],
        ];
        let mut nodes = Vec::new();
        nodes.push(Node::new(0, f64::INFINITY, f64::INFINITY));
        let mut last = None;
        for (i, &[x, y]) in points.iter().enumerate() {
            last = Some(insert_node(&mut nodes, i as u32, x, y, last));
        }
        let start = last.unwrap();
        let b = bounds();
        index_curve(&mut nodes, start, &b);

        // walk back to the head of the z-list, then collect it forwards
        let mut head = start;
        while let Some(prev) = node!(nodes, head).prev_z_i {
            head = prev;
        }
        let mut keys = Vec::new();
        let mut cursor = Some(head);
        while let Some(i) = cursor {
            let n = node!(nodes, i);
            assert_eq!(n.z, b.z_order(n.x, n.y));
            if let Some(next) = n.next_z_i {
                assert_eq!(node!(nodes, next).prev_z_i, Some(i));
            }
            keys.push(n.z);
            cursor = n.next_z_i;
        }
        assert_eq!(keys.len(), points.len());
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }
}
