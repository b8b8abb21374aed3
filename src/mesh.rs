//! Triangle mesh structure and derived buffers.
//!
//! [`PolyMesh`] is the unit of exchange with the external renderer: a flat
//! position buffer, a triangle index buffer and optional per-vertex face
//! attributes (one incident face's centroid and index, used for face
//! labeling). [`EdgeSet`] is the deduplicated undirected wireframe derived
//! deterministically from the index buffer.

use std::collections::BTreeSet;

use super::core::Vec3;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    /// Per-vertex centroid of one incident face, when attached.
    pub face_centers: Option<Vec<[f64; 3]>>,
    /// Per-vertex index of one incident face, when attached.
    pub face_ids: Option<Vec<u32>>,
}

impl PolyMesh {
    /// Create a mesh from positions and triangle indices only.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self { positions, indices, face_centers: None, face_ids: None }
    }

    /// Create a mesh from vertex points and triangle indices.
    #[must_use]
    pub fn from_points(points: &[Vec3], indices: Vec<u32>) -> Self {
        Self::new(points.iter().map(|p| p.to_array()).collect(), indices)
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertex position as a [`Vec3`].
    #[must_use]
    pub fn position(&self, index: u32) -> Vec3 {
        Vec3::from_array(self.positions[index as usize])
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len() as u32;
        self.indices.iter().all(|&i| i < n)
    }

    /// Returns true if indices represent a triangle list.
    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.indices.len() % 3 == 0
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.has_triangle_indices() {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if self.positions.len() < 3 || self.indices.is_empty() {
            return Err("mesh is degenerate (fewer than 3 vertices or no triangles)".to_string());
        }
        Ok(())
    }

    /// Average of all vertex positions.
    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        if self.positions.is_empty() {
            return Vec3::ZERO;
        }
        let sum = self
            .positions
            .iter()
            .fold(Vec3::ZERO, |acc, p| acc + Vec3::from_array(*p));
        sum / self.positions.len() as f64
    }

    /// Bounding sphere as (center, radius): vertex centroid plus the maximum
    /// vertex distance from it. Degenerate meshes get a unit sphere.
    #[must_use]
    pub fn bounding_sphere(&self) -> (Vec3, f64) {
        let center = self.centroid();
        let radius = self
            .positions
            .iter()
            .map(|p| center.distance(Vec3::from_array(*p)))
            .fold(0.0_f64, f64::max);
        if center.is_finite() && radius.is_finite() && radius > 0.0 {
            (center, radius)
        } else {
            (Vec3::ZERO, 1.0)
        }
    }

    /// Centroid of triangle `face` (average of its three corners).
    #[must_use]
    pub fn face_centroid(&self, face: usize) -> Vec3 {
        let a = self.position(self.indices[face * 3]);
        let b = self.position(self.indices[face * 3 + 1]);
        let c = self.position(self.indices[face * 3 + 2]);
        (a + b + c) / 3.0
    }

    /// Area of triangle `face`.
    #[must_use]
    pub fn face_area(&self, face: usize) -> f64 {
        let a = self.position(self.indices[face * 3]);
        let b = self.position(self.indices[face * 3 + 1]);
        let c = self.position(self.indices[face * 3 + 2]);
        (b - a).cross(c - a).length() * 0.5
    }

    /// Attach per-vertex face attributes: for every vertex, the centroid and
    /// index of one of its incident faces (the last one wins; which face a
    /// shared vertex gets is unspecified). Vertices no face references get a
    /// zero centroid and face index 0.
    pub fn attach_face_attributes(&mut self) {
        let n = self.positions.len();
        let mut centers = vec![[0.0; 3]; n];
        let mut ids = vec![0u32; n];

        for face in 0..self.triangle_count() {
            let centroid = self.face_centroid(face).to_array();
            for corner in 0..3 {
                let v = self.indices[face * 3 + corner] as usize;
                centers[v] = centroid;
                ids[v] = face as u32;
            }
        }

        self.face_centers = Some(centers);
        self.face_ids = Some(ids);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EdgeSet
// ─────────────────────────────────────────────────────────────────────────────

/// Deduplicated undirected edge list derived from a mesh's triangles.
///
/// Each edge is stored once under its canonical `(min, max)` key, in sorted
/// order, so deriving the set twice from the same mesh yields identical
/// output and each shared edge is drawn exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EdgeSet {
    edges: Vec<(u32, u32)>,
}

impl EdgeSet {
    #[must_use]
    pub fn from_mesh(mesh: &PolyMesh) -> Self {
        let mut unique = BTreeSet::new();
        for tri in mesh.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                unique.insert((a.min(b), a.max(b)));
            }
        }
        Self { edges: unique.into_iter().collect() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges as canonical `(min, max)` vertex-index pairs.
    #[must_use]
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Flat line-segment buffer for the renderer: two endpoint positions per
    /// edge.
    #[must_use]
    pub fn line_positions(&self, mesh: &PolyMesh) -> Vec<[f64; 3]> {
        let mut out = Vec::with_capacity(self.edges.len() * 2);
        for &(a, b) in &self.edges {
            out.push(mesh.positions[a as usize]);
            out.push(mesh.positions[b as usize]);
        }
        out
    }
}
