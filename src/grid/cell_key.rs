use crate::math::{Point, Real};
use na::Point3;

const COORD_BITS: u32 = 10;
const COORD_MASK: u32 = (1 << COORD_BITS) - 1;

/// The largest grid resolution addressable by a [`CellKey`].
pub const MAX_RESOLUTION: u32 = 1 << COORD_BITS;

/// The integer coordinates of a grid cell packed into a single 32-bit key.
///
/// Each coordinate occupies 10 bits, so keys address cubic grids up to
/// [`MAX_RESOLUTION`]³ cells. Packing and unpacking are exact inverses for
/// coordinates in `[0, MAX_RESOLUTION)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CellKey(u32);

impl CellKey {
    /// Packs the given cell coordinates into a key.
    #[inline]
    pub fn pack(x: u32, y: u32, z: u32) -> Self {
        debug_assert!(x < MAX_RESOLUTION && y < MAX_RESOLUTION && z < MAX_RESOLUTION);
        CellKey(x | (y << COORD_BITS) | (z << (2 * COORD_BITS)))
    }

    /// The key of the cell at the grid origin.
    #[inline]
    pub fn origin() -> Self {
        CellKey(0)
    }

    /// Recovers the cell coordinates stored in this key.
    #[inline]
    pub fn unpack(self) -> Point3<u32> {
        Point3::new(
            self.0 & COORD_MASK,
            (self.0 >> COORD_BITS) & COORD_MASK,
            (self.0 >> (2 * COORD_BITS)) & COORD_MASK,
        )
    }

    /// The key of the `(i, j, k)`-th child of this cell once every axis of
    /// the grid is subdivided `s`-fold.
    #[inline]
    pub fn child(self, s: u32, i: u32, j: u32, k: u32) -> Self {
        let xyz = self.unpack();
        Self::pack(xyz.x * s + i, xyz.y * s + j, xyz.z * s + k)
    }

    /// The center of this cell on a grid of resolution `n`, in `[0, 1]³`.
    #[inline]
    pub fn center(self, n: u32) -> Point<Real> {
        let xyz = self.unpack();
        let inv = 1.0 / n as Real;
        Point::new(
            (xyz.x as Real + 0.5) * inv,
            (xyz.y as Real + 0.5) * inv,
            (xyz.z as Real + 0.5) * inv,
        )
    }

    /// The offset of this cell in a dense row-major array of `n³` cells.
    #[inline]
    pub fn to_linear(self, n: u32) -> usize {
        let xyz = self.unpack();
        let n = n as usize;
        xyz.x as usize + n * (xyz.y as usize + n * xyz.z as usize)
    }

    /// The packed 32-bit representation of this key.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Rebuilds a key from its packed 32-bit representation.
    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        CellKey(raw)
    }
}
