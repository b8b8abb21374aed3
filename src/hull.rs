//! Convex hull construction.
//!
//! The general meshing path: an unordered point cloud goes in, a closed
//! triangulated boundary comes out. Hull construction itself is delegated to
//! the `chull` crate; this module filters degenerate input, converts the
//! result into a [`PolyMesh`] and provides the fallback tetrahedron every
//! recovery path substitutes when construction fails.

use chull::ConvexHullWrapper;
use thiserror::Error;

use super::core::Vec3;
use super::mesh::PolyMesh;
use super::shape::{PlatonicSolid, default_tetra_points};

#[derive(Debug, Error)]
pub enum HullError {
    #[error("convex hull needs at least 4 finite points, got {got}")]
    TooFewPoints { got: usize },
    #[error("convex hull construction failed: {0}")]
    Construction(String),
    #[error("convex hull produced a degenerate mesh: {0}")]
    Degenerate(String),
}

/// Triangulated convex hull of `points`.
///
/// Non-finite points are filtered out before construction. Fails on fewer
/// than 4 usable points, on hull construction errors (collinear or coplanar
/// input) and on degenerate output.
pub fn convex_hull(points: &[Vec3]) -> Result<PolyMesh, HullError> {
    let usable: Vec<Vec<f64>> = points
        .iter()
        .filter(|p| p.is_finite())
        .map(|p| vec![p.x, p.y, p.z])
        .collect();

    if usable.len() < 4 {
        return Err(HullError::TooFewPoints { got: usable.len() });
    }

    let hull = ConvexHullWrapper::try_new(&usable, None)
        .map_err(|e| HullError::Construction(format!("{e:?}")))?;
    let (vertices, indices) = hull.vertices_indices();

    let positions: Vec<[f64; 3]> = vertices
        .iter()
        .map(|v| [v[0], v[1], v[2]])
        .collect();

    // chull's triangle order depends on hash-map iteration, so identical
    // input can yield permuted index buffers. Canonicalize: rotate each
    // triangle smallest-corner-first (winding preserved), then sort.
    let mut triangles: Vec<[u32; 3]> = indices
        .chunks_exact(3)
        .map(|t| canonical_triangle([t[0] as u32, t[1] as u32, t[2] as u32]))
        .collect();
    triangles.sort_unstable();
    let indices: Vec<u32> = triangles.into_iter().flatten().collect();

    let mesh = PolyMesh::new(positions, indices);
    mesh.validate().map_err(HullError::Degenerate)?;
    Ok(mesh)
}

const fn canonical_triangle([a, b, c]: [u32; 3]) -> [u32; 3] {
    if a <= b && a <= c {
        [a, b, c]
    } else if b <= a && b <= c {
        [b, c, a]
    } else {
        [c, a, b]
    }
}

/// Minimal valid mesh: a tetrahedron around `center` with circumradius on
/// the order of `radius`.
#[must_use]
pub fn fallback_tetrahedron(center: Vec3, radius: f64) -> PolyMesh {
    let radius = if radius.is_finite() && radius > 0.0 { radius } else { 0.5 };
    let center = if center.is_finite() { center } else { Vec3::ZERO };
    PolyMesh::from_points(
        &default_tetra_points(center, radius * 0.5),
        PlatonicSolid::Tetrahedron.triangle_indices(),
    )
}

/// Hull construction with local recovery: on any failure, log a warning and
/// substitute the fallback tetrahedron instead of propagating the error.
#[must_use]
pub fn convex_hull_or_fallback(points: &[Vec3], center: Vec3, radius: f64) -> PolyMesh {
    match convex_hull(points) {
        Ok(mesh) => mesh,
        Err(err) => {
            log::warn!("convex hull of {} points failed ({err}), using fallback tetrahedron", points.len());
            fallback_tetrahedron(center, radius)
        }
    }
}
