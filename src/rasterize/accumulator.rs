use crate::grid::distance_volume::{AuxData, DistanceVolume, FAR_DISTANCE};
use crate::math::{Point, Real, Vector};
use crate::query::{point_triangle_dist2, ray_triangle_toi};
use crate::rasterize::candidates::CandidateList;
use crate::rasterize::AuxMode;
use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
use rayon::prelude::*;
use std::array;

/// The dense accumulation grids shared by every batch.
///
/// Distances are stored as the bit patterns of non-negative floats, whose
/// integer order matches their float order, so the narrow-phase minimum is
/// a plain integer `fetch_min`. All updates are monotone (distances only
/// decrease, collide flags only rise, representative indices only grow),
/// which makes relaxed atomics sufficient; the host-side barrier between
/// phases is the end of each parallel pass.
pub(crate) struct DistanceAccumulator {
    resolution: u32,
    dist: Vec<AtomicU32>,
    aux: AuxAccumulator,
}

enum AuxAccumulator {
    Collide(Vec<[AtomicBool; 3]>),
    RepTriangle(Vec<AtomicI32>),
}

impl DistanceAccumulator {
    pub fn new(resolution: u32, mode: AuxMode) -> Self {
        let len = (resolution as usize).pow(3);
        let far = FAR_DISTANCE.to_bits();

        DistanceAccumulator {
            resolution,
            dist: (0..len).map(|_| AtomicU32::new(far)).collect(),
            aux: match mode {
                AuxMode::CollisionAxes => AuxAccumulator::Collide(
                    (0..len)
                        .map(|_| array::from_fn(|_| AtomicBool::new(false)))
                        .collect(),
                ),
                AuxMode::NearestTriangle => {
                    AuxAccumulator::RepTriangle((0..len).map(|_| AtomicI32::new(-1)).collect())
                }
            },
        }
    }

    /// Narrow-phase pass: folds every candidate's center-to-triangle
    /// distance into the grid and, in collide mode, marks the axes whose
    /// ray from the voxel center crosses the triangle within one voxel
    /// step.
    pub fn reduce_min(&self, tris: &[[Point<Real>; 3]], list: &CandidateList) {
        let res = self.resolution;
        let step = 1.0 / res as Real;

        list.idx
            .par_iter()
            .zip(&list.cells)
            .for_each(|(&tri, &cell)| {
                let lin = cell.to_linear(res);
                let center = cell.center(res);
                let [a, b, c] = &tris[tri as usize];
                let d = point_triangle_dist2(a, b, c, &center).sqrt();

                let _ = self.dist[lin].fetch_min(d.to_bits(), Ordering::Relaxed);

                if let AuxAccumulator::Collide(flags) = &self.aux {
                    for axis in 0..3 {
                        let mut dir = Vector::zeros();
                        dir[axis] = 1.0;
                        if let Some(toi) = ray_triangle_toi(a, b, c, &center, &dir) {
                            if toi <= step {
                                flags[lin][axis].store(true, Ordering::Relaxed);
                            }
                        }
                    }
                }
            });
    }

    /// Representative-index pass. Must only run once every `reduce_min`
    /// call has completed, so the stored minimum is final when the equality
    /// below reads it.
    pub fn reduce_rep(&self, tris: &[[Point<Real>; 3]], list: &CandidateList) {
        let AuxAccumulator::RepTriangle(rep) = &self.aux else {
            return;
        };
        let res = self.resolution;

        list.idx
            .par_iter()
            .zip(&list.cells)
            .for_each(|(&tri, &cell)| {
                let lin = cell.to_linear(res);
                let center = cell.center(res);
                let [a, b, c] = &tris[tri as usize];
                let d = point_triangle_dist2(a, b, c, &center).sqrt();

                // Exact bit equality against the reduced minimum; an epsilon
                // here would lose the highest-index tie-break.
                if d.to_bits() == self.dist[lin].load(Ordering::Relaxed) {
                    let _ = rep[lin].fetch_max(tri as i32, Ordering::Relaxed);
                }
            });
    }

    pub fn into_volume(self) -> DistanceVolume {
        DistanceVolume {
            resolution: self.resolution,
            dist: self
                .dist
                .into_iter()
                .map(|d| Real::from_bits(d.into_inner()))
                .collect(),
            aux: match self.aux {
                AuxAccumulator::Collide(flags) => AuxData::Collide(
                    flags
                        .into_iter()
                        .map(|axes| axes.map(AtomicBool::into_inner))
                        .collect(),
                ),
                AuxAccumulator::RepTriangle(rep) => AuxData::RepTriangle(
                    rep.into_iter().map(AtomicI32::into_inner).collect(),
                ),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::DistanceAccumulator;
    use crate::grid::{AuxData, CellKey, FAR_DISTANCE};
    use crate::rasterize::candidates::CandidateList;
    use crate::rasterize::AuxMode;
    use approx::assert_relative_eq;
    use na::Point3;

    fn z_plane(height: f32) -> [Point3<f32>; 3] {
        [
            Point3::new(-1.0, -1.0, height),
            Point3::new(3.0, -1.0, height),
            Point3::new(-1.0, 3.0, height),
        ]
    }

    #[test]
    fn keeps_the_minimum_over_candidates() {
        let tris = [z_plane(0.0), z_plane(0.4)];
        let list = CandidateList {
            idx: vec![0, 1],
            cells: vec![CellKey::pack(0, 0, 0); 2],
        };

        let accumulator = DistanceAccumulator::new(2, AuxMode::NearestTriangle);
        accumulator.reduce_min(&tris, &list);
        let volume = accumulator.into_volume();

        // The voxel center sits at z = 0.25: triangle 1 wins.
        assert_relative_eq!(volume.dist(0, 0, 0), 0.15);
        assert_eq!(volume.dist(1, 1, 1), FAR_DISTANCE);
    }

    #[test]
    fn representative_ties_break_to_the_highest_index() {
        let tris = [z_plane(0.0), z_plane(0.0), z_plane(0.0)];
        let list = CandidateList {
            idx: vec![2, 0, 1],
            cells: vec![CellKey::pack(0, 0, 0); 3],
        };

        let accumulator = DistanceAccumulator::new(2, AuxMode::NearestTriangle);
        accumulator.reduce_min(&tris, &list);
        accumulator.reduce_rep(&tris, &list);
        let volume = accumulator.into_volume();

        match volume.aux() {
            AuxData::RepTriangle(rep) => {
                assert_eq!(rep[0], 2);
                assert_eq!(rep[7], -1);
            }
            AuxData::Collide(_) => unreachable!(),
        }
    }

    #[test]
    fn collide_flags_mark_nearby_axis_crossings() {
        // A z-facing wall right above the voxel center at (0.25, 0.25, 0.25).
        let tris = [z_plane(0.4)];
        let list = CandidateList {
            idx: vec![0],
            cells: vec![CellKey::pack(0, 0, 0)],
        };

        let accumulator = DistanceAccumulator::new(2, AuxMode::CollisionAxes);
        accumulator.reduce_min(&tris, &list);
        let volume = accumulator.into_volume();

        match volume.aux() {
            AuxData::Collide(flags) => {
                // Crossing at t = 0.15 < 0.5 along +z only.
                assert_eq!(flags[0], [false, false, true]);
            }
            AuxData::RepTriangle(_) => unreachable!(),
        }
    }
}
