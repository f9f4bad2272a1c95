use crate::grid::CellKey;
use crate::math::{Point, Real};
use crate::query::point_triangle_dist2;
use core::ops::Range;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use rayon::prelude::*;

/// Conservative half-diagonal of a unit cell, slightly above √3/2. Dividing
/// by the level resolution gives the largest center-to-corner distance of a
/// cell, so a triangle within `band` of any point of a cell always passes
/// the inclusion test.
pub(crate) const CELL_HALF_DIAGONAL: Real = 0.87;

/// Number of refinement tasks sharing one compaction counter.
const TILE_LEN: u64 = 512;

/// Parallel arrays of (triangle index, cell key) pairs at one refinement
/// level. Order within the list carries no meaning and duplicates are not
/// removed.
#[derive(Clone, Debug, Default)]
pub(crate) struct CandidateList {
    pub idx: Vec<u32>,
    pub cells: Vec<CellKey>,
}

impl CandidateList {
    /// Level-0 candidates: every triangle of `tris` paired with the single
    /// root cell of the 1³ grid.
    pub fn seed(tris: Range<u32>) -> Self {
        let cells = vec![CellKey::origin(); tris.len()];
        CandidateList {
            idx: tris.collect(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.idx.len()
    }
}

/// Replaces a candidate list at resolution `coarse_res` by the list at
/// resolution `coarse_res · subdiv`, keeping exactly the (triangle, child
/// cell) pairs whose center-to-triangle distance is below the level's
/// inclusion threshold.
///
/// One task is launched per (candidate, child) pair and tasks are grouped
/// into tiles of [`TILE_LEN`]. The probe pass counts each tile's survivors
/// and race-assigns the tile a disjoint slab of the output by adding into a
/// shared total; the fill pass re-runs the same predicate over the same tile
/// geometry and writes survivors into the slab. No prefix sum is needed
/// because slab order is immaterial.
pub(crate) fn refine(
    tris: &[[Point<Real>; 3]],
    list: &CandidateList,
    coarse_res: u32,
    subdiv: u32,
    band: Real,
) -> CandidateList {
    let s = subdiv as u64;
    let s3 = s * s * s;
    let tasks = list.len() as u64 * s3;
    let fine_res = coarse_res * subdiv;

    if tasks > u64::from(u32::MAX) {
        log::warn!(
            "{} refinement tasks at resolution {} exceed 32-bit addressing; \
             using 64-bit task indices",
            tasks,
            fine_res
        );
    }

    let thresh = CELL_HALF_DIAGONAL / fine_res as Real + band;
    let thresh2 = thresh * thresh;

    // Both passes share this predicate and the tile geometry below, so the
    // per-tile survivor counts of the two passes are identical.
    let survives = |task: u64| -> Option<(u32, CellKey)> {
        let cand = (task / s3) as usize;
        let child = task % s3;
        let i = (child % s) as u32;
        let j = ((child / s) % s) as u32;
        let k = (child / (s * s)) as u32;

        let cell = list.cells[cand].child(subdiv, i, j, k);
        let center = cell.center(fine_res);
        let [a, b, c] = &tris[list.idx[cand] as usize];

        (point_triangle_dist2(a, b, c, &center) < thresh2).then_some((list.idx[cand], cell))
    };

    let num_tiles = tasks.div_ceil(TILE_LEN) as usize;
    let tile_tasks = |tile: usize| -> Range<u64> {
        let start = tile as u64 * TILE_LEN;
        start..(start + TILE_LEN).min(tasks)
    };

    // Probe pass. The offset each tile receives depends on the order in
    // which tiles reach the shared counter; the slabs stay disjoint either
    // way, and the list is order-insensitive.
    let total = AtomicUsize::new(0);
    let tile_offsets: Vec<usize> = (0..num_tiles)
        .into_par_iter()
        .map(|tile| {
            let count = tile_tasks(tile).filter(|&t| survives(t).is_some()).count();
            total.fetch_add(count, Ordering::Relaxed)
        })
        .collect();

    let refined = total.into_inner();
    let out_idx: Vec<AtomicU32> = (0..refined).map(|_| AtomicU32::new(0)).collect();
    let out_cells: Vec<AtomicU32> = (0..refined).map(|_| AtomicU32::new(0)).collect();

    // Fill pass: each survivor takes the next slot of its tile's slab.
    (0..num_tiles).into_par_iter().for_each(|tile| {
        let mut slot = tile_offsets[tile];
        for task in tile_tasks(tile) {
            if let Some((tri, cell)) = survives(task) {
                out_idx[slot].store(tri, Ordering::Relaxed);
                out_cells[slot].store(cell.raw(), Ordering::Relaxed);
                slot += 1;
            }
        }
    });

    CandidateList {
        idx: out_idx.into_iter().map(AtomicU32::into_inner).collect(),
        cells: out_cells
            .into_iter()
            .map(|cell| CellKey::from_raw(cell.into_inner()))
            .collect(),
    }
}

#[cfg(test)]
mod test {
    use super::{refine, CandidateList, CELL_HALF_DIAGONAL};
    use crate::grid::CellKey;
    use crate::query::point_triangle_dist2;
    use na::Point3;

    fn plane_triangle() -> [[Point3<f32>; 3]; 1] {
        [[
            Point3::new(0.0, 0.0, 0.5),
            Point3::new(1.0, 0.0, 0.5),
            Point3::new(0.0, 1.0, 0.5),
        ]]
    }

    #[test]
    fn matches_exhaustive_enumeration() {
        let tris = plane_triangle();
        let band = 0.05;
        let subdiv = 4;

        let refined = refine(&tris, &CandidateList::seed(0..1), 1, subdiv, band);

        let thresh = CELL_HALF_DIAGONAL / subdiv as f32 + band;
        let mut expected = Vec::new();
        for z in 0..subdiv {
            for y in 0..subdiv {
                for x in 0..subdiv {
                    let cell = CellKey::pack(x, y, z);
                    let [a, b, c] = &tris[0];
                    let d2 = point_triangle_dist2(a, b, c, &cell.center(subdiv));
                    if d2 < thresh * thresh {
                        expected.push(cell);
                    }
                }
            }
        }

        assert!(!expected.is_empty());
        let mut got = refined.cells.clone();
        got.sort_by_key(|cell| cell.raw());
        expected.sort_by_key(|cell| cell.raw());
        assert_eq!(got, expected);
        assert!(refined.idx.iter().all(|&t| t == 0));
    }

    #[test]
    fn refining_an_empty_list_is_empty() {
        let tris = plane_triangle();
        let refined = refine(&tris, &CandidateList::default(), 1, 4, 0.1);
        assert_eq!(refined.len(), 0);
    }

    #[test]
    fn two_levels_cover_the_triangle_plane() {
        let tris = plane_triangle();
        let mut list = CandidateList::seed(0..1);
        list = refine(&tris, &list, 1, 4, 0.0);
        list = refine(&tris, &list, 4, 4, 0.0);

        // Every cell crossed by the triangle plane must survive; the cell
        // at (0, 0, 7) has its center 0.5/16 away from z = 0.5.
        assert!(list
            .cells
            .iter()
            .any(|cell| *cell == CellKey::pack(0, 0, 7)));
        assert!(list
            .cells
            .iter()
            .any(|cell| *cell == CellKey::pack(0, 0, 8)));
    }
}
