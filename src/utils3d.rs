//! Projection of planar 3D polygons onto 2D, for triangulating wall and roof faces.

use alloc::vec::Vec;
use num_traits::float::Float;

use crate::Error;

#[inline]
fn dot<T: Float>([ax, ay, az]: [T; 3], [bx, by, bz]: [T; 3]) -> T {
    ax * bx + ay * by + az * bz
}

#[inline]
fn cross<T: Float>([ax, ay, az]: [T; 3], [bx, by, bz]: [T; 3]) -> [T; 3] {
    [ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx]
}

fn normalize<T: Float>(v: [T; 3]) -> Option<[T; 3]> {
    let len = dot(v, v).sqrt();
    if !len.is_finite() || len < T::from(1e-30)? {
        return None;
    }
    Some([v[0] / len, v[1] / len, v[2] / len])
}

/// Newell's normal of a ring; the ring winds counter-clockwise around it
fn newell_normal<T: Float>(ring: &[[T; 3]]) -> Option<[T; 3]> {
    let &last = ring.last()?;
    if ring.len() < 3 {
        return None;
    }
    let (sum, _) = ring
        .iter()
        .fold(([T::zero(); 3], last), |(n, [px, py, pz]), &[x, y, z]| {
            let n = [
                n[0] + (py - y) * (pz + z),
                n[1] + (pz - z) * (px + x),
                n[2] + (px - x) * (py + y),
            ];
            (n, [x, y, z])
        });
    normalize(sum)
}

/// Orthonormal in-plane axes `(u, v)` such that `u × v = n`.
///
/// `u` comes from the world axis least aligned with `n`, so a plane facing +z maps
/// onto plain x/y.
fn plane_basis<T: Float>(n: [T; 3]) -> Option<([T; 3], [T; 3])> {
    let [ax, ay, az] = n.map(T::abs);
    let axis = if ax <= ay && ax <= az {
        [T::one(), T::zero(), T::zero()]
    } else if ay <= az {
        [T::zero(), T::one(), T::zero()]
    } else {
        [T::zero(), T::zero(), T::one()]
    };
    let d = dot(axis, n);
    let u = normalize([axis[0] - n[0] * d, axis[1] - n[1] * d, axis[2] - n[2] * d])?;
    Some((u, cross(n, u)))
}

/// Projects a planar 3D polygon (outer ring first, then holes) onto its own plane.
///
/// The plane comes from the first `num_outer` vertices. The outer ring keeps its winding
/// as seen from the side its normal points to, so the 2D result can go straight to
/// [`Earcut::earcut`](crate::Earcut::earcut) and its triangle indices stay valid for
/// the 3D vertices.
pub fn project3d_to_2d<T: Float>(
    vertices: &[[T; 3]],
    num_outer: usize,
    out_buf: &mut Vec<[T; 2]>,
) -> Result<(), Error> {
    let outer = &vertices[..num_outer.min(vertices.len())];
    let (u, v) = newell_normal(outer)
        .and_then(plane_basis)
        .ok_or(Error::DegeneratePlane)?;

    out_buf.clear();
    out_buf.extend(vertices.iter().map(|&p| [dot(p, u), dot(p, v)]));
    Ok(())
}
