use alloc::vec::Vec;

use crate::Error;

/// A polygon in the flat layout taken by [`Earcut::earcut`](crate::Earcut::earcut).
#[derive(Clone, Debug, PartialEq)]
pub struct Flattened<T> {
    /// coordinates of every ring, outer ring first
    pub vertices: Vec<T>,
    /// vertex offset of each hole ring
    pub hole_indices: Vec<usize>,
    /// coordinates per vertex
    pub dim: usize,
}

/// Turns nested rings (outer ring first, then holes, each a list of coordinate tuples as
/// in GeoJSON) into flat coordinates plus hole offsets.
///
/// The dimension is taken from the first vertex and must be shared by all of them.
///
/// ```
/// let rings = vec![
///     vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]],
///     vec![[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]],
/// ];
/// let flat: earclip::Flattened<f64> = earclip::flatten(&rings).unwrap();
/// assert_eq!(flat.hole_indices, vec![4]);
/// assert_eq!(flat.dim, 2);
///
/// let triangles: Vec<usize> = earclip::earcut(&flat.vertices, &flat.hole_indices, flat.dim).unwrap();
/// assert_eq!(triangles.len(), 8 * 3);
/// ```
pub fn flatten<T, R, P>(rings: &[R]) -> Result<Flattened<T>, Error>
where
    T: Copy,
    R: AsRef<[P]>,
    P: AsRef<[T]>,
{
    let dim = rings
        .iter()
        .find_map(|ring| ring.as_ref().first())
        .map_or(2, |point| point.as_ref().len());
    if dim < 2 {
        return Err(Error::InvalidDimension(dim));
    }

    let num_points: usize = rings.iter().map(|ring| ring.as_ref().len()).sum();
    let mut flat = Flattened {
        vertices: Vec::with_capacity(num_points * dim),
        hole_indices: Vec::with_capacity(rings.len().saturating_sub(1)),
        dim,
    };

    let mut offset = 0;
    for (k, ring) in rings.iter().enumerate() {
        if k > 0 {
            flat.hole_indices.push(offset);
        }
        for point in ring.as_ref() {
            let coords = point.as_ref();
            if coords.len() != dim {
                return Err(Error::MixedDimensions {
                    ring: k,
                    expected: dim,
                    found: coords.len(),
                });
            }
            flat.vertices.extend_from_slice(coords);
        }
        offset += ring.as_ref().len();
    }
    Ok(flat)
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_flatten_with_holes() {
        let rings = vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]],
            vec![[1.0, 1.0], [2.0, 1.0], [2.0, 2.0]],
            vec![[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 6.0]],
        ];
        let flat: Flattened<f64> = flatten(&rings).unwrap();
        assert_eq!(flat.dim, 2);
        assert_eq!(flat.hole_indices, vec![3, 6]);
        assert_eq!(flat.vertices.len(), 10 * 2);
        assert_eq!(&flat.vertices[6..8], &[1.0, 1.0]);
    }

    #[test]
    fn test_flatten_keeps_dimension() {
        let rings = vec![vec![
            vec![0.0, 0.0, 5.0],
            vec![1.0, 0.0, 5.0],
            vec![1.0, 1.0, 5.0],
        ]];
        let flat: Flattened<f64> = flatten(&rings).unwrap();
        assert_eq!(flat.dim, 3);
        assert!(flat.hole_indices.is_empty());
        assert_eq!(flat.vertices, vec![0.0, 0.0, 5.0, 1.0, 0.0, 5.0, 1.0, 1.0, 5.0]);
    }

    #[test]
    fn test_flatten_empty() {
        let rings: Vec<Vec<[f64; 2]>> = vec![];
        let flat: Flattened<f64> = flatten(&rings).unwrap();
        assert_eq!(flat.dim, 2);
        assert!(flat.vertices.is_empty());
        assert!(flat.hole_indices.is_empty());
    }

    #[test]
    fn test_flatten_empty_hole() {
        let rings = vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], vec![]];
        let flat: Flattened<f64> = flatten(&rings).unwrap();
        assert_eq!(flat.hole_indices, vec![3]);
    }

    #[test]
    fn test_flatten_mixed_dimensions() {
        let rings = vec![
            vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]],
            vec![vec![0.2, 0.2, 0.0]],
        ];
        assert_eq!(
            flatten::<f64, _, _>(&rings),
            Err(Error::MixedDimensions {
                ring: 1,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_flatten_rejects_one_dimensional_points() {
        let rings = vec![vec![vec![0.0], vec![1.0]]];
        assert_eq!(
            flatten::<f64, _, _>(&rings),
            Err(Error::InvalidDimension(1))
        );
    }
}
