use crate::math::{Point, Real};
use crate::rasterize::{self, RasterError, RasterParameters};
use na::Point3;

/// Distance stored for voxels left outside the narrow band.
pub const FAR_DISTANCE: Real = 1.0e9;

/// The auxiliary per-voxel channel of a [`DistanceVolume`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuxData {
    /// One flag per axis, raised when a ray cast from the voxel center along
    /// that axis crosses a nearby triangle within one voxel step. Row-wise
    /// flag parities give downstream code a per-axis inside/outside vote.
    Collide(Vec<[bool; 3]>),
    /// For each voxel, the highest triangle index achieving the voxel's
    /// minimum distance, or `-1` outside the band.
    RepTriangle(Vec<i32>),
}

/// A dense cubic grid of narrow-band distances from voxel centers to the
/// nearest triangle of a mesh.
///
/// Voxels farther than `band + √3/(2·resolution)` from every triangle keep
/// the [`FAR_DISTANCE`] sentinel. The grid is stored row-major: the voxel
/// `(x, y, z)` lives at offset `x + resolution·y + resolution²·z`.
///
/// ```
/// use voxband::na::Point3;
/// use voxband::{AuxMode, DistanceVolume, RasterParameters, FAR_DISTANCE};
///
/// let vertices = vec![
///     Point3::new(0.25, 0.25, 0.25),
///     Point3::new(0.75, 0.25, 0.25),
///     Point3::new(0.25, 0.75, 0.25),
/// ];
/// let mut params = RasterParameters::new(8, AuxMode::CollisionAxes);
/// params.band = 0.1;
///
/// let volume = DistanceVolume::rasterize(&vertices, &[[0, 1, 2]], &params).unwrap();
/// assert!(volume.dist(2, 2, 2) < FAR_DISTANCE);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceVolume {
    pub(crate) resolution: u32,
    pub(crate) dist: Vec<Real>,
    pub(crate) aux: AuxData,
}

impl DistanceVolume {
    /// Rasterizes the given triangle mesh into a dense distance grid.
    ///
    /// `vertices` should lie in the unit cube `[0, 1]³` for meaningful
    /// output; coordinates outside it are legal but produce large distances.
    /// Each entry of `indices` describes one triangle by three indices into
    /// `vertices`.
    pub fn rasterize(
        vertices: &[Point<Real>],
        indices: &[[u32; 3]],
        params: &RasterParameters,
    ) -> Result<Self, RasterError> {
        rasterize::rasterize_mesh(vertices, indices, params)
    }

    /// The number of voxels along each axis of the grid.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// The offset of voxel `(x, y, z)` in the dense row-major arrays.
    pub fn linear_index(&self, x: u32, y: u32, z: u32) -> usize {
        let n = self.resolution as usize;
        x as usize + n * (y as usize + n * z as usize)
    }

    /// The distance stored for voxel `(x, y, z)`.
    pub fn dist(&self, x: u32, y: u32, z: u32) -> Real {
        self.dist[self.linear_index(x, y, z)]
    }

    /// The full distance array, row-major.
    pub fn dist_slice(&self) -> &[Real] {
        &self.dist
    }

    /// The auxiliary channel produced by the rasterization.
    pub fn aux(&self) -> &AuxData {
        &self.aux
    }

    /// Whether voxel `(x, y, z)` was left outside the narrow band.
    pub fn is_far(&self, x: u32, y: u32, z: u32) -> bool {
        self.dist(x, y, z) >= FAR_DISTANCE
    }

    /// The center of voxel `(x, y, z)`, in `[0, 1]³`.
    pub fn voxel_center(&self, x: u32, y: u32, z: u32) -> Point<Real> {
        let inv = 1.0 / self.resolution as Real;
        Point::new(
            (x as Real + 0.5) * inv,
            (y as Real + 0.5) * inv,
            (z as Real + 0.5) * inv,
        )
    }

    /// Iterates over the voxels whose distance was resolved, yielding their
    /// integer coordinates and distance.
    pub fn near_voxels(&self) -> impl Iterator<Item = (Point3<u32>, Real)> + '_ {
        let n = self.resolution as usize;
        self.dist.iter().enumerate().filter_map(move |(lin, &d)| {
            (d < FAR_DISTANCE).then(|| {
                let x = (lin % n) as u32;
                let y = ((lin / n) % n) as u32;
                let z = (lin / (n * n)) as u32;
                (Point3::new(x, y, z), d)
            })
        })
    }
}
