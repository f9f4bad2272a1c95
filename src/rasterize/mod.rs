//! Hierarchical triangle-to-voxel rasterization.
//!
//! The pipeline partitions the mesh into batches, seeds one candidate per
//! triangle on the 1³ grid, refines candidates through the subdivision plan
//! with a two-pass scan-free compaction, and reduces the final lists into
//! the dense output grid with atomic minimums. See
//! [`DistanceVolume::rasterize`](crate::DistanceVolume::rasterize) for the
//! entry point.

pub use self::error::RasterError;
pub use self::plan::SubdivisionPlan;

pub(crate) mod accumulator;
pub(crate) mod candidates;
mod driver;
mod error;
mod plan;

use crate::grid::distance_volume::DistanceVolume;
use crate::math::{Point, Real};

/// Selects the auxiliary per-voxel channel produced next to the distances.
///
/// There is deliberately no default: the two channels feed different
/// inside/outside strategies downstream and the caller must pick one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuxMode {
    /// Per-axis ray-crossing flags ([`AuxData::Collide`](crate::AuxData)).
    CollisionAxes,
    /// Highest triangle index achieving each voxel's minimum distance
    /// ([`AuxData::RepTriangle`](crate::AuxData)).
    NearestTriangle,
}

/// Parameters controlling [`DistanceVolume::rasterize`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RasterParameters {
    /// Number of voxels along each axis of the output grid. Must lie in
    /// `[1, 1024]` and be factorable by [`SubdivisionPlan::factorize`].
    pub resolution: u32,
    /// Extra width added to each level's inclusion threshold. Voxels
    /// farther than `band + √3/(2·resolution)` from every triangle keep
    /// the far sentinel.
    pub band: Real,
    /// Number of triangles processed per batch. Smaller batches bound the
    /// peak size of the transient candidate lists; the output is the same
    /// for every valid value.
    pub batch_size: u32,
    /// The auxiliary channel to produce.
    pub aux: AuxMode,
}

impl RasterParameters {
    /// The default number of triangles per batch.
    pub const DEFAULT_BATCH_SIZE: u32 = 131_072;

    /// Parameters with a zero band and the default batch size.
    pub fn new(resolution: u32, aux: AuxMode) -> Self {
        RasterParameters {
            resolution,
            band: 0.0,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            aux,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), RasterError> {
        if !(self.band.is_finite() && self.band >= 0.0) {
            return Err(RasterError::InvalidBand(self.band));
        }
        if self.batch_size == 0 {
            return Err(RasterError::ZeroBatchSize);
        }
        Ok(())
    }
}

/// Rasterizes a triangle mesh into a dense grid of narrow-band distances.
///
/// This is the free-function form of
/// [`DistanceVolume::rasterize`](crate::DistanceVolume::rasterize).
pub fn rasterize_mesh(
    vertices: &[Point<Real>],
    indices: &[[u32; 3]],
    params: &RasterParameters,
) -> Result<DistanceVolume, RasterError> {
    driver::rasterize_mesh(vertices, indices, params)
}
