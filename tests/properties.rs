use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voxband::na::Point3;
use voxband::query::point_triangle_dist2;
use voxband::{AuxData, AuxMode, DistanceVolume, RasterParameters, FAR_DISTANCE};

fn random_mesh(num_tris: usize, seed: u64) -> (Vec<Point3<f32>>, Vec<[u32; 3]>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut vertices = Vec::with_capacity(num_tris * 3);
    let mut indices = Vec::with_capacity(num_tris);

    for t in 0..num_tris {
        for _ in 0..3 {
            vertices.push(Point3::new(
                rng.gen_range(0.1..0.9),
                rng.gen_range(0.1..0.9),
                rng.gen_range(0.1..0.9),
            ));
        }
        let base = (t * 3) as u32;
        indices.push([base, base + 1, base + 2]);
    }

    (vertices, indices)
}

fn brute_force_dist(tris: &[[Point3<f32>; 3]], pt: &Point3<f32>) -> f32 {
    tris.iter()
        .map(|[a, b, c]| point_triangle_dist2(a, b, c, pt).sqrt())
        .fold(f32::INFINITY, f32::min)
}

fn gather(vertices: &[Point3<f32>], indices: &[[u32; 3]]) -> Vec<[Point3<f32>; 3]> {
    indices
        .iter()
        .map(|tri| tri.map(|v| vertices[v as usize]))
        .collect()
}

#[test]
fn agrees_with_brute_force_within_the_band() {
    let resolution = 16;
    let band = 0.25;
    let (vertices, indices) = random_mesh(24, 42);
    let tris = gather(&vertices, &indices);

    let mut params = RasterParameters::new(resolution, AuxMode::CollisionAxes);
    params.band = band;
    let volume = DistanceVolume::rasterize(&vertices, &indices, &params).unwrap();

    // Every voxel within band + half a cell diagonal of a triangle is
    // guaranteed to resolve to the true minimum; anything the rasterizer
    // resolved beyond that must still be an actual candidate distance.
    let guaranteed = band + 3.0f32.sqrt() / (2.0 * resolution as f32);
    let mut checked = 0;

    for z in 0..resolution {
        for y in 0..resolution {
            for x in 0..resolution {
                let truth = brute_force_dist(&tris, &volume.voxel_center(x, y, z));
                let got = volume.dist(x, y, z);

                if truth <= guaranteed - 1.0e-4 {
                    assert_relative_eq!(got, truth, epsilon = 1.0e-5);
                    checked += 1;
                } else if got < FAR_DISTANCE {
                    assert!(got >= truth - 1.0e-5);
                }
            }
        }
    }

    assert!(checked > 0);
}

#[test]
fn widening_the_band_only_adds_voxels() {
    let (vertices, indices) = random_mesh(12, 7);

    let mut narrow = RasterParameters::new(16, AuxMode::CollisionAxes);
    narrow.band = 0.05;
    let mut wide = narrow;
    wide.band = 0.25;

    let narrow = DistanceVolume::rasterize(&vertices, &indices, &narrow).unwrap();
    let wide = DistanceVolume::rasterize(&vertices, &indices, &wide).unwrap();

    let mut narrow_count = 0;
    let mut wide_count = 0;
    for (n, w) in narrow.dist_slice().iter().zip(wide.dist_slice()) {
        if *n < FAR_DISTANCE {
            // A resolved distance does not depend on the band.
            assert_eq!(n, w);
            narrow_count += 1;
        }
        if *w < FAR_DISTANCE {
            wide_count += 1;
        }
    }

    assert!(narrow_count > 0);
    assert!(wide_count >= narrow_count);
}

#[test]
fn output_is_independent_of_batch_size() {
    let (vertices, indices) = random_mesh(10, 3);

    let mut reference = RasterParameters::new(8, AuxMode::NearestTriangle);
    reference.band = 0.2;
    let reference_volume = DistanceVolume::rasterize(&vertices, &indices, &reference).unwrap();

    for batch_size in [1, 3, 7] {
        let mut params = reference;
        params.batch_size = batch_size;
        let volume = DistanceVolume::rasterize(&vertices, &indices, &params).unwrap();
        assert_eq!(volume, reference_volume);
    }
}

#[test]
fn repeated_runs_are_deterministic() {
    let (vertices, indices) = random_mesh(16, 11);

    let mut params = RasterParameters::new(16, AuxMode::NearestTriangle);
    params.band = 0.15;

    let first = DistanceVolume::rasterize(&vertices, &indices, &params).unwrap();
    let second = DistanceVolume::rasterize(&vertices, &indices, &params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn representative_index_achieves_the_minimum() {
    let (vertices, indices) = random_mesh(16, 23);
    let tris = gather(&vertices, &indices);

    let mut params = RasterParameters::new(8, AuxMode::NearestTriangle);
    params.band = 0.3;
    let volume = DistanceVolume::rasterize(&vertices, &indices, &params).unwrap();

    let AuxData::RepTriangle(rep) = volume.aux() else {
        unreachable!();
    };

    for z in 0..8 {
        for y in 0..8 {
            for x in 0..8 {
                let lin = volume.linear_index(x, y, z);
                if volume.is_far(x, y, z) {
                    assert_eq!(rep[lin], -1);
                    continue;
                }

                let t = rep[lin];
                assert!(t >= 0);
                let [a, b, c] = &tris[t as usize];
                let d = point_triangle_dist2(a, b, c, &volume.voxel_center(x, y, z)).sqrt();
                assert_eq!(d, volume.dist(x, y, z));
            }
        }
    }
}
