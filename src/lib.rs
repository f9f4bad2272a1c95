/*!
voxband
========

**voxband** rasterizes triangle meshes embedded in the unit cube into dense
cubic voxel grids of narrow-band distances. For every voxel it produces the
unsigned Euclidean distance from the voxel center to the nearest triangle
(up to a configurable band width), together with one of two auxiliary
channels used by downstream inside/outside classification: per-axis
ray-crossing flags, or the index of a triangle achieving the minimum.

The core is a hierarchical broad phase: per-batch candidate
(triangle, cell) pairs are refined through successive grid subdivisions with
a two-pass, scan-free parallel compaction, then reduced into the shared
dense grid with atomic minimums.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]

pub extern crate nalgebra as na;

pub mod grid;
pub mod query;
pub mod rasterize;

pub use crate::grid::{AuxData, DistanceVolume, FAR_DISTANCE};
pub use crate::rasterize::{AuxMode, RasterError, RasterParameters};

mod real {
    /// The scalar type used throughout this crate.
    pub use f32 as Real;
}

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    pub use super::real::*;
    pub use na::{Point3, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;
}
