use alloc::vec::Vec;
use num_traits::float::Float;

use crate::predicates::signed_area;
use crate::{ring_ranges, vertex_count, Error, Index};

/// Returns the relative difference between the polygon area and the area covered by its
/// triangulation; used to verify correctness of a triangulation.
///
/// The polygon area is the outer ring's area minus the area of every hole with at least
/// three vertices. Zero means the triangles cover the polygon exactly.
pub fn deviation<T: Float, N: Index>(
    data: &[T],
    hole_indices: &[N],
    dim: usize,
    triangles: &[N],
) -> Result<T, Error> {
    let vertices = vertex_count(data.len(), hole_indices, dim)?;
    let points: Vec<[T; 2]> = data
        .chunks_exact(dim)
        .map(|coords| [coords[0], coords[1]])
        .collect();

    let mut polygon_area = T::zero();
    if vertices >= 3 {
        for (k, range) in ring_ranges(hole_indices, vertices).enumerate() {
            let ring = &points[range];
            if k == 0 {
                polygon_area = signed_area(ring).abs();
            } else if ring.len() >= 3 {
                polygon_area = polygon_area - signed_area(ring).abs();
            }
        }
    }

    let mut triangles_area = T::zero();
    for triangle in triangles.chunks_exact(3) {
        let mut corners = [[T::zero(); 2]; 3];
        for (corner, index) in corners.iter_mut().zip(triangle) {
            let index = index.into_usize();
            *corner = *points
                .get(index)
                .ok_or(Error::TriangleIndexOutOfRange { index, vertices })?;
        }
        let [a, b, c] = corners;
        triangles_area = triangles_area
            + ((a[0] - c[0]) * (b[1] - a[1]) - (a[0] - b[0]) * (c[1] - a[1])).abs();
    }

    if polygon_area == T::zero() && triangles_area == T::zero() {
        Ok(T::zero())
    } else {
        Ok(((polygon_area - triangles_area) / polygon_area).abs())
    }
}
