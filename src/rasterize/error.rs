use crate::grid::MAX_RESOLUTION;

/// Errors detected while validating rasterization inputs.
///
/// All of these are reported before any grid work starts; a failed
/// rasterization never returns partial results.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq)]
pub enum RasterError {
    /// The requested resolution is zero or exceeds [`MAX_RESOLUTION`].
    #[error("resolution {0} is outside the supported range [1, {MAX_RESOLUTION}]")]
    ResolutionOutOfRange(u32),

    /// The planner could not factor the resolution into subdivision levels.
    #[error("resolution {0} cannot be factored into subdivision levels; use a power of two or a multiple of a power of four by a factor <= 4")]
    Unfactorable(u32),

    /// The narrow band must be a finite, non-negative distance.
    #[error("band {0} must be finite and >= 0")]
    InvalidBand(f32),

    /// Batches must hold at least one triangle.
    #[error("batch size must be positive")]
    ZeroBatchSize,

    /// Triangle indices must fit the 32-bit index format.
    #[error("mesh has {0} triangles, more than a 32-bit index can address")]
    TooManyTriangles(usize),

    /// An index-buffer entry points outside the vertex buffer.
    #[error("triangle {triangle} references out-of-bounds vertex {vertex}")]
    VertexIndexOutOfBounds {
        /// Index of the offending triangle in the index buffer.
        triangle: usize,
        /// The out-of-bounds vertex index.
        vertex: u32,
    },
}
