use thiserror::Error;

/// Errors reported for input that violates the flat polygon layout.
///
/// Degenerate geometry is not an error: it yields fewer (or no) triangles, which
/// [`deviation`](crate::deviation) can detect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid dimension {0}: at least 2 coordinates per vertex are required")]
    InvalidDimension(usize),

    #[error("{len} coordinates cannot be split into vertices of dimension {dim}")]
    RaggedCoordinates { len: usize, dim: usize },

    #[error("hole index {index} is out of range for {vertices} vertices")]
    HoleIndexOutOfRange { index: usize, vertices: usize },

    #[error("hole indices must not decrease: {next} follows {previous}")]
    UnorderedHoleIndices { previous: usize, next: usize },

    #[error("{vertices} vertices exceed the supported maximum of {max}")]
    TooManyVertices { vertices: usize, max: usize },

    #[error("triangle index {index} is out of range for {vertices} vertices")]
    TriangleIndexOutOfRange { index: usize, vertices: usize },

    #[error("ring {ring} has a vertex of dimension {found}, expected {expected}")]
    MixedDimensions {
        ring: usize,
        expected: usize,
        found: usize,
    },

    #[error("polygon has no well-defined plane")]
    DegeneratePlane,
}
