//! Surface point sampling for morph sources.
//!
//! Extracts a representative, deduplicated point cloud from a mesh: the
//! distinct mesh vertices first (to preserve sharp features), then
//! triangle-area-weighted surface samples projected onto the bounding sphere
//! with a little jitter. The output is sorted by distance from the
//! bounding-sphere center, the ordering the morph matcher's correspondence
//! heuristic relies on.

use std::collections::HashSet;

use rand::Rng;

use super::core::Vec3;
use super::mesh::PolyMesh;
use super::shape::default_tetra_points;

/// Hard lower and upper bounds on the sampled point count.
pub const MIN_SAMPLES: usize = 24;
pub const MAX_SAMPLES: usize = 150;

/// Samples per unit of target density.
const SAMPLES_PER_DENSITY: usize = 4;

/// Jitter applied to surface samples, as a fraction of the bounding radius.
const SAMPLE_JITTER: f64 = 0.02;

/// Rounding precision used to deduplicate nearby points.
const DEDUP_PRECISION: f64 = 1000.0;

fn dedup_key(p: Vec3) -> (i64, i64, i64) {
    (
        (p.x * DEDUP_PRECISION).round() as i64,
        (p.y * DEDUP_PRECISION).round() as i64,
        (p.z * DEDUP_PRECISION).round() as i64,
    )
}

/// Sample a point cloud from `mesh`'s surface.
///
/// `target_density` is typically the mesh's target face count; the output
/// size is `clamp(4 × target_density, 24, 150)` points at most, never fewer
/// than 4, with every coordinate finite. Sampling is bounded: after ten
/// failed attempts per missing point the cloud is returned short rather than
/// looping forever.
pub fn sample_surface<R: Rng + ?Sized>(
    mesh: &PolyMesh,
    target_density: u32,
    rng: &mut R,
) -> Vec<Vec3> {
    let target = (target_density as usize * SAMPLES_PER_DENSITY).clamp(MIN_SAMPLES, MAX_SAMPLES);
    let (center, radius) = mesh.bounding_sphere();

    let mut seen = HashSet::new();
    let mut points: Vec<Vec3> = Vec::with_capacity(target);

    // Distinct mesh vertices first, so sharp features survive the morph.
    for p in &mesh.positions {
        let v = Vec3::from_array(*p);
        if !v.is_finite() {
            continue;
        }
        if seen.insert(dedup_key(v)) {
            points.push(v);
        }
    }

    if points.is_empty() {
        log::warn!("mesh has no usable vertices, sampling a default tetrahedron");
        for v in default_tetra_points(center, radius * 0.5) {
            if seen.insert(dedup_key(v)) {
                points.push(v);
            }
        }
    }

    // Stratified surface samples until the target count is reached.
    let areas = cumulative_areas(mesh);
    let remaining = target.saturating_sub(points.len());
    let mut attempts = 0;
    let max_attempts = remaining * 10;

    while points.len() < target && attempts < max_attempts {
        attempts += 1;
        let Some(sample) = sample_triangle_point(mesh, &areas, rng) else {
            continue;
        };

        // Project onto the bounding sphere, then jitter slightly so samples
        // do not collapse onto a perfectly regular shell.
        let Some(direction) = (sample - center).normalized() else {
            continue;
        };
        let jitter = Vec3::new(
            (rng.random::<f64>() - 0.5) * SAMPLE_JITTER * radius,
            (rng.random::<f64>() - 0.5) * SAMPLE_JITTER * radius,
            (rng.random::<f64>() - 0.5) * SAMPLE_JITTER * radius,
        );
        let surface_point = center + direction * radius + jitter;
        if !surface_point.is_finite() {
            continue;
        }

        if seen.insert(dedup_key(surface_point)) {
            points.push(surface_point);
        }
    }

    // Downstream hull reconstruction needs a non-degenerate cloud.
    if points.len() < 4 {
        for v in default_tetra_points(center, radius * 0.5) {
            if seen.insert(dedup_key(v)) {
                points.push(v);
            }
        }
    }

    points.retain(|p| p.is_finite());
    points.sort_by(|a, b| {
        a.distance(center)
            .partial_cmp(&b.distance(center))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    points.truncate(MAX_SAMPLES);
    points
}

/// Cumulative triangle areas, for area-weighted face selection.
fn cumulative_areas(mesh: &PolyMesh) -> Vec<f64> {
    let mut total = 0.0;
    let mut cumulative = Vec::with_capacity(mesh.triangle_count());
    for face in 0..mesh.triangle_count() {
        let area = mesh.face_area(face);
        if area.is_finite() {
            total += area;
        }
        cumulative.push(total);
    }
    cumulative
}

/// Uniform random point on the mesh surface: pick a triangle with probability
/// proportional to its area, then a uniform point inside it via the square
/// root barycentric trick.
fn sample_triangle_point<R: Rng + ?Sized>(
    mesh: &PolyMesh,
    cumulative: &[f64],
    rng: &mut R,
) -> Option<Vec3> {
    let total = *cumulative.last()?;
    if !(total.is_finite() && total > 0.0) {
        return None;
    }

    let pick = rng.random::<f64>() * total;
    let face = cumulative.partition_point(|&a| a < pick).min(cumulative.len() - 1);

    let a = mesh.position(mesh.indices[face * 3]);
    let b = mesh.position(mesh.indices[face * 3 + 1]);
    let c = mesh.position(mesh.indices[face * 3 + 2]);

    let r1 = rng.random::<f64>().sqrt();
    let r2 = rng.random::<f64>();
    let point = a * (1.0 - r1) + b * (r1 * (1.0 - r2)) + c * (r1 * r2);
    point.is_finite().then_some(point)
}
