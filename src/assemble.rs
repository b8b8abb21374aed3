//! Mesh assembly: from a target face count to a renderable [`PolyMesh`].
//!
//! Dispatches on [`ShapeKind`]: Platonic solids use their exact vertex and
//! triangle tables, everything else goes through vertex synthesis and convex
//! hull reconstruction. Degenerate outcomes are replaced by the fallback
//! tetrahedron, never propagated. The assembled mesh always carries per-vertex
//! face attributes for downstream face labeling.

use rand::Rng;

use super::core::Vec3;
use super::hull::{convex_hull_or_fallback, fallback_tetrahedron};
use super::mesh::PolyMesh;
use super::shape::{PlatonicSolid, RandomParams, ShapeKind, synthesize};

/// Output of [`assemble`]: the mesh plus the modulation bundle used by the
/// procedural path, for the caller to persist.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub mesh: PolyMesh,
    pub params: Option<RandomParams>,
}

/// Build a mesh for `face_count` faces at radius `scale`.
///
/// `params` seeds the procedural path so a persisted shape regenerates
/// identically; pass `None` to draw fresh randomization from `rng`.
/// Face counts below 4 produce small primitive stand-ins (point, rod, plate)
/// built as hulls of thin point sets.
pub fn assemble<R: Rng + ?Sized>(
    face_count: u32,
    scale: f64,
    params: Option<&RandomParams>,
    rng: &mut R,
) -> Assembly {
    let face_count = face_count.max(1);

    let mut assembly = match face_count {
        1..=3 => Assembly { mesh: small_count_mesh(face_count, scale), params: None },
        _ => match ShapeKind::from_face_count(face_count) {
            ShapeKind::Platonic(solid) => Assembly { mesh: platonic_mesh(solid, scale), params: None },
            ShapeKind::Procedural(_) => {
                let synthesis = synthesize(face_count, scale, params, rng);
                let mesh = convex_hull_or_fallback(&synthesis.points, Vec3::ZERO, scale);
                Assembly { mesh, params: synthesis.params }
            }
        },
    };

    assembly.mesh.attach_face_attributes();
    assembly
}

fn platonic_mesh(solid: PlatonicSolid, scale: f64) -> PolyMesh {
    let mesh = PolyMesh::from_points(&solid.vertices(scale), solid.triangle_indices());
    debug_assert!(mesh.validate().is_ok());
    mesh
}

/// Stand-in shapes for face counts 1–3: a tiny ball, a thin rod and a flat
/// triangular plate, all built as hulls so downstream code sees ordinary
/// closed meshes.
fn small_count_mesh(face_count: u32, scale: f64) -> PolyMesh {
    let points: Vec<Vec3> = match face_count {
        1 => octahedral_points(Vec3::ZERO, scale * 0.1),
        2 => {
            let r = scale * 0.05;
            let mut pts = octahedral_points(Vec3::new(0.0, scale, 0.0), r);
            pts.extend(octahedral_points(Vec3::new(0.0, -scale, 0.0), r));
            pts
        }
        _ => {
            let h = scale * 3.0_f64.sqrt() / 2.0;
            let t = scale * 0.02;
            let corners = [
                Vec3::new(scale, 0.0, 0.0),
                Vec3::new(-scale * 0.5, h, 0.0),
                Vec3::new(-scale * 0.5, -h, 0.0),
            ];
            corners
                .iter()
                .flat_map(|c| [*c + Vec3::new(0.0, 0.0, t), *c + Vec3::new(0.0, 0.0, -t)])
                .collect()
        }
    };

    match super::hull::convex_hull(&points) {
        Ok(mesh) => mesh,
        Err(err) => {
            log::warn!("small-count stand-in for {face_count} faces failed ({err})");
            fallback_tetrahedron(Vec3::ZERO, scale)
        }
    }
}

fn octahedral_points(center: Vec3, radius: f64) -> Vec<Vec3> {
    PlatonicSolid::Octahedron
        .vertices(radius)
        .into_iter()
        .map(|p| p + center)
        .collect()
}
