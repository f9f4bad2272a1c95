use crate::grid::MAX_RESOLUTION;
use crate::rasterize::RasterError;
use arrayvec::ArrayVec;

/// Largest number of refinement levels: 4⁵ covers [`MAX_RESOLUTION`].
const MAX_LEVELS: usize = 5;

/// An ordered factorization of the target resolution into per-level
/// subdivision factors.
///
/// The factorization is greedy: a prefix of factor-4 levels, with the
/// remainder (at most 4) as the last level. Every power of two up to
/// [`MAX_RESOLUTION`] is factorable, as are products of a power of four
/// and a factor of at most 4 (e.g. 12 = 4·3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubdivisionPlan {
    factors: ArrayVec<u32, MAX_LEVELS>,
}

impl SubdivisionPlan {
    /// Factorizes `resolution`, failing fast when it is out of range or not
    /// expressible by the greedy strategy.
    pub fn factorize(resolution: u32) -> Result<Self, RasterError> {
        if resolution == 0 || resolution > MAX_RESOLUTION {
            return Err(RasterError::ResolutionOutOfRange(resolution));
        }

        let mut factors = ArrayVec::new();
        let mut n = resolution;
        while n > 4 {
            if n % 4 != 0 {
                return Err(RasterError::Unfactorable(resolution));
            }
            factors.push(4);
            n /= 4;
        }
        factors.push(n);

        Ok(SubdivisionPlan { factors })
    }

    /// The per-level subdivision factors, applied in order.
    pub fn factors(&self) -> &[u32] {
        &self.factors
    }

    /// The product of all factors, i.e. the final grid resolution.
    pub fn resolution(&self) -> u32 {
        self.factors.iter().product()
    }
}
