use crate::grid::distance_volume::DistanceVolume;
use crate::math::{Point, Real};
use crate::rasterize::accumulator::DistanceAccumulator;
use crate::rasterize::candidates::{refine, CandidateList};
use crate::rasterize::plan::SubdivisionPlan;
use crate::rasterize::{AuxMode, RasterError, RasterParameters};
use core::ops::Range;

/// Rasterizes the mesh batch by batch into a shared dense grid.
///
/// Each batch seeds one candidate per triangle on the 1³ grid, refines the
/// list through every level of the plan, and reduces the final list into
/// the accumulator. Batch-local candidate lists are dropped at batch end,
/// so the peak memory is driven by the largest per-batch refinement, not by
/// the mesh size.
pub(crate) fn rasterize_mesh(
    vertices: &[Point<Real>],
    indices: &[[u32; 3]],
    params: &RasterParameters,
) -> Result<DistanceVolume, RasterError> {
    params.validate()?;
    let plan = SubdivisionPlan::factorize(params.resolution)?;
    let tris = gather_triangles(vertices, indices)?;

    let accumulator = DistanceAccumulator::new(params.resolution, params.aux);

    for batch in batch_ranges(tris.len() as u32, params.batch_size) {
        let list = refine_batch(&tris, &plan, params.band, batch);
        accumulator.reduce_min(&tris, &list);
    }

    // The representative-index equality compares against the fully settled
    // minimum, so its sweep only starts once every batch has min-reduced.
    // Re-deriving each batch's final list keeps candidate memory batch-local.
    if params.aux == AuxMode::NearestTriangle {
        for batch in batch_ranges(tris.len() as u32, params.batch_size) {
            let list = refine_batch(&tris, &plan, params.band, batch);
            accumulator.reduce_rep(&tris, &list);
        }
    }

    Ok(accumulator.into_volume())
}

fn refine_batch(
    tris: &[[Point<Real>; 3]],
    plan: &SubdivisionPlan,
    band: Real,
    batch: Range<u32>,
) -> CandidateList {
    let mut list = CandidateList::seed(batch);
    let mut res = 1;
    for &subdiv in plan.factors() {
        list = refine(tris, &list, res, subdiv, band);
        res *= subdiv;
        log::debug!("{} candidates at resolution {}", list.len(), res);
    }
    list
}

fn batch_ranges(num_tris: u32, batch_size: u32) -> impl Iterator<Item = Range<u32>> {
    (0..num_tris)
        .step_by(batch_size as usize)
        .map(move |start| start..(start + batch_size).min(num_tris))
}

fn gather_triangles(
    vertices: &[Point<Real>],
    indices: &[[u32; 3]],
) -> Result<Vec<[Point<Real>; 3]>, RasterError> {
    if indices.len() > u32::MAX as usize {
        return Err(RasterError::TooManyTriangles(indices.len()));
    }

    indices
        .iter()
        .enumerate()
        .map(|(triangle, tri)| {
            let mut pts = [Point::origin(); 3];
            for (dst, &vertex) in pts.iter_mut().zip(tri) {
                *dst = *vertices
                    .get(vertex as usize)
                    .ok_or(RasterError::VertexIndexOutOfBounds { triangle, vertex })?;
            }
            Ok(pts)
        })
        .collect()
}
