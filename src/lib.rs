//! Ear-clipping triangulation of simple polygons with holes.
//!
//! The input is a flat coordinate array with a fixed stride (only the first two
//! components of each vertex are read) plus the vertex offsets at which hole rings
//! begin. The output is a flat list of vertex indices, three per triangle.
//!
//! Holes are bridged into the outer ring, ears are clipped with a z-order index for
//! larger inputs, and rings that resist clipping go through filtering, local
//! self-intersection curing and finally splitting along an inner diagonal.
//!
//! ```
//! let data = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
//! let triangles: Vec<u32> = earclip::earcut(&data, &[], 2).unwrap();
//! assert_eq!(triangles, vec![2, 3, 0, 0, 1, 2]);
//! ```

#![no_std]

extern crate alloc;

macro_rules! node {
    ($nodes:expr, $index:expr) => {
        &$nodes[$index.get() as usize]
    };
}

macro_rules! node_mut {
    ($nodes:expr, $index:expr) => {
        &mut $nodes[$index.get() as usize]
    };
}

mod deviation;
mod ears;
mod error;
mod flatten;
mod holes;
mod node;
mod predicates;
pub mod utils3d;
mod zorder;

pub use deviation::deviation;
pub use error::Error;
pub use flatten::{flatten, Flattened};
pub use zorder::Z_ORDER_BITS;

use alloc::vec::Vec;
use core::iter;
use core::ops::Range;
use num_traits::float::Float;

use ears::Job;
use node::{insert_node, remove_node, Node, NodeIndex};
use predicates::{equals, signed_area};
use zorder::Bounds;

/// Inputs with more vertices than this are triangulated with the z-order index.
pub const HASH_THRESHOLD: usize = 80;

/// Node links are `u32`; keep enough headroom for the bridge and split duplicates.
const MAX_VERTICES: usize = (u32::MAX / 8) as usize;

/// Integer type of the emitted vertex indices.
pub trait Index: Copy {
    /// Largest vertex index the type can hold.
    const MAX: usize;

    fn into_usize(self) -> usize;
    fn from_usize(v: usize) -> Self;
}

macro_rules! impl_index {
    ($($t:ty),*) => {
        $(
            impl Index for $t {
                const MAX: usize = <$t>::MAX as usize;

                #[inline]
                fn into_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_usize(v: usize) -> Self {
                    v as Self
                }
            }
        )*
    };
}

impl_index!(u16, u32, usize);

/// Counters describing the most recent [`Earcut::earcut`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// whether ear tests ran against the z-order index
    pub hashed: bool,
    /// non-empty hole rings queued for merging into the outer ring
    pub holes: usize,
    /// holes left out because no bridge to the outer ring was found
    pub unbridged: usize,
    /// rings that found no ear and were filtered for another scan
    pub filter_retries: usize,
    /// triangles emitted while curing local self-intersections
    pub cured_intersections: usize,
    /// rings split in two along an inner diagonal
    pub splits: usize,
    /// fragments dropped because no valid diagonal was left
    pub abandoned: usize,
}

/// Instance of the ear-clipping triangulator.
pub struct Earcut<T: Float> {
    data: Vec<[T; 2]>,
    nodes: Vec<Node<T>>,
    queue: Vec<NodeIndex>,
    jobs: Vec<Job>,
    stats: Stats,
}

impl<T: Float> Default for Earcut<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> Earcut<T> {
    /// Creates a new triangulator.
    ///
    /// A single instance can be reused for many polygons to avoid reallocating its buffers.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            nodes: Vec::new(),
            queue: Vec::new(),
            jobs: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Counters of the last triangulation.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    fn reset(&mut self, capacity: usize) {
        self.nodes.clear();
        self.nodes.reserve(capacity);
        self.nodes.push(Node::new(0, T::infinity(), T::infinity())); // sentinel
        self.stats = Stats::default();
    }

    /// Triangulates a polygon.
    ///
    /// `data` holds `dim` coordinates per vertex, outer ring first; `hole_indices` are the
    /// vertex offsets at which each hole ring starts. Triangles are written to
    /// `triangles_out` (cleared first) as triples of vertex indices.
    ///
    /// Degenerate geometry never fails: collapsed rings simply emit nothing. Errors are
    /// reserved for arguments that violate the input layout.
    pub fn earcut<N: Index>(
        &mut self,
        data: &[T],
        hole_indices: &[N],
        dim: usize,
        triangles_out: &mut Vec<N>,
    ) -> Result<(), Error> {
        triangles_out.clear();
        self.stats = Stats::default();

        let vertices = vertex_count(data.len(), hole_indices, dim)?;
        let max = N::MAX.saturating_add(1).min(MAX_VERTICES);
        if vertices > max {
            return Err(Error::TooManyVertices { vertices, max });
        }

        self.data.clear();
        self.data
            .extend(data.chunks_exact(dim).map(|coords| [coords[0], coords[1]]));
        if self.data.len() < 3 {
            return Ok(());
        }

        self.triangulate(hole_indices, triangles_out);
        Ok(())
    }

    fn triangulate<N: Index>(&mut self, hole_indices: &[N], triangles_out: &mut Vec<N>) {
        triangles_out.reserve((self.data.len() + 2 * hole_indices.len()) * 3);
        self.reset(self.data.len() * 3 / 2);

        let outer_len = hole_indices
            .first()
            .map_or(self.data.len(), |h| h.into_usize());

        let Some(mut outer_i) = self.linked_list(0, outer_len, true) else {
            return;
        };
        let outer = node!(self.nodes, outer_i);
        if outer.next_i == outer.prev_i {
            return;
        }

        if !hole_indices.is_empty() {
            let Some(merged_i) = self.eliminate_holes(hole_indices, outer_i) else {
                return;
            };
            outer_i = merged_i;
        }

        // if the shape is not too simple, use the z-order curve to speed up ear tests
        let bounds = if self.data.len() > HASH_THRESHOLD {
            Bounds::of(&self.data[..outer_len])
        } else {
            None
        };
        self.stats.hashed = bounds.is_some();
        log::trace!(
            "triangulating {} vertices, {} holes, hashed: {}",
            self.data.len(),
            hole_indices.len(),
            self.stats.hashed
        );

        self.earcut_linked(outer_i, triangles_out, bounds.as_ref());
    }

    /// create a circular doubly linked list from polygon points in the specified winding order
    fn linked_list(&mut self, start: usize, end: usize, clockwise: bool) -> Option<NodeIndex> {
        let points = self.data.get(start..end).filter(|p| !p.is_empty())?;
        let mut last_i: Option<NodeIndex> = None;

        if clockwise == (signed_area(points) > T::zero()) {
            for (offset, &[x, y]) in points.iter().enumerate() {
                let i = (start + offset) as u32;
                last_i = Some(insert_node(&mut self.nodes, i, x, y, last_i));
            }
        } else {
            for (offset, &[x, y]) in points.iter().enumerate().rev() {
                let i = (start + offset) as u32;
                last_i = Some(insert_node(&mut self.nodes, i, x, y, last_i));
            }
        }

        let last_i = last_i?;
        let last = node!(self.nodes, last_i);
        if last.next_i != last_i && equals(last, node!(self.nodes, last.next_i)) {
            let (_, next_i) = remove_node(&mut self.nodes, last_i);
            return Some(next_i);
        }
        Some(last_i)
    }
}

/// Triangulates a polygon with a fresh [`Earcut`] instance.
pub fn earcut<T: Float, N: Index>(
    data: &[T],
    hole_indices: &[N],
    dim: usize,
) -> Result<Vec<N>, Error> {
    let mut triangles = Vec::new();
    Earcut::new().earcut(data, hole_indices, dim, &mut triangles)?;
    Ok(triangles)
}

/// Checks the flat input layout and returns the number of vertices.
pub(crate) fn vertex_count<N: Index>(
    len: usize,
    hole_indices: &[N],
    dim: usize,
) -> Result<usize, Error> {
    if dim < 2 {
        return Err(Error::InvalidDimension(dim));
    }
    if len % dim != 0 {
        return Err(Error::RaggedCoordinates { len, dim });
    }
    let vertices = len / dim;

    let mut previous = 0;
    for hole in hole_indices {
        let index = hole.into_usize();
        if index > vertices {
            return Err(Error::HoleIndexOutOfRange { index, vertices });
        }
        if index < previous {
            return Err(Error::UnorderedHoleIndices {
                previous,
                next: index,
            });
        }
        previous = index;
    }
    Ok(vertices)
}

/// Vertex ranges of the outer ring followed by every hole ring.
pub(crate) fn ring_ranges<N: Index>(
    hole_indices: &[N],
    vertices: usize,
) -> impl Iterator<Item = Range<usize>> + '_ {
    let starts = iter::once(0).chain(hole_indices.iter().map(|h| h.into_usize()));
    let ends = hole_indices
        .iter()
        .map(|h| h.into_usize())
        .chain(iter::once(vertices));
    starts.zip(ends).map(|(start, end)| start..end)
}
