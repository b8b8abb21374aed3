//! Vertex synthesis for polyhedral shapes.
//!
//! Two code paths produce the corner points of a target polyhedron:
//!
//! - **Platonic solids** (4, 6, 8, 12 or 20 faces) use exact closed-form
//!   constructions. Every vertex lies on the circumsphere of radius `scale`.
//! - **Everything else** derives a vertex budget from Euler's polyhedron
//!   formula, places that many points with a spherical Fibonacci (golden
//!   angle) distribution and modulates them with a small bundle of sinusoidal
//!   parameters so the same bundle reproduces the same shape.
//!
//! The modulation bundle ([`RandomParams`]) is an explicit value: callers own
//! persistence and pass it back in to regenerate a saved shape. The module
//! keeps no hidden state.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::core::Vec3;

/// Golden ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Golden angle in radians, `π(3 − √5)`.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Face count above which synthesized vertices get positional jitter.
const JITTER_FACE_THRESHOLD: u32 = 20;

/// Jitter bound as a fraction of `scale`.
const JITTER_FRACTION: f64 = 0.1;

/// Number of sine waves in a [`RandomParams`] bundle.
const WAVE_COUNT: usize = 3;

/// Upper bound on the frequency-weighted amplitude sum used by the hull
/// synthesis path. A wave's curvature grows with the square of its frequency;
/// keeping `Σ aᵢ·i²` under this bound keeps the modulated profile convex, so
/// the hull retains (nearly) every synthesized vertex.
const MODULATION_CAP: f64 = 0.4;

// ─────────────────────────────────────────────────────────────────────────────
// Platonic solids
// ─────────────────────────────────────────────────────────────────────────────

/// The five convex regular polyhedra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatonicSolid {
    Tetrahedron,
    Cube,
    Octahedron,
    Dodecahedron,
    Icosahedron,
}

impl PlatonicSolid {
    /// Map a face count to the solid it names, if any.
    #[must_use]
    pub const fn from_face_count(faces: u32) -> Option<Self> {
        match faces {
            4 => Some(Self::Tetrahedron),
            6 => Some(Self::Cube),
            8 => Some(Self::Octahedron),
            12 => Some(Self::Dodecahedron),
            20 => Some(Self::Icosahedron),
            _ => None,
        }
    }

    #[must_use]
    pub const fn face_count(self) -> u32 {
        match self {
            Self::Tetrahedron => 4,
            Self::Cube => 6,
            Self::Octahedron => 8,
            Self::Dodecahedron => 12,
            Self::Icosahedron => 20,
        }
    }

    #[must_use]
    pub const fn vertex_count(self) -> u32 {
        match self {
            Self::Tetrahedron => 4,
            Self::Cube => 8,
            Self::Octahedron => 6,
            Self::Dodecahedron => 20,
            Self::Icosahedron => 12,
        }
    }

    /// Exact vertex coordinates, circumsphere radius `scale`.
    #[must_use]
    pub fn vertices(self, scale: f64) -> Vec<Vec3> {
        match self {
            Self::Tetrahedron => {
                let a = scale / 3.0_f64.sqrt();
                vec![
                    Vec3::new(a, a, a),
                    Vec3::new(-a, -a, a),
                    Vec3::new(-a, a, -a),
                    Vec3::new(a, -a, -a),
                ]
            }
            Self::Cube => {
                let a = scale / 3.0_f64.sqrt();
                vec![
                    Vec3::new(-a, -a, -a),
                    Vec3::new(a, -a, -a),
                    Vec3::new(a, a, -a),
                    Vec3::new(-a, a, -a),
                    Vec3::new(-a, -a, a),
                    Vec3::new(a, -a, a),
                    Vec3::new(a, a, a),
                    Vec3::new(-a, a, a),
                ]
            }
            Self::Octahedron => {
                let a = scale;
                vec![
                    Vec3::new(a, 0.0, 0.0),
                    Vec3::new(-a, 0.0, 0.0),
                    Vec3::new(0.0, a, 0.0),
                    Vec3::new(0.0, -a, 0.0),
                    Vec3::new(0.0, 0.0, a),
                    Vec3::new(0.0, 0.0, -a),
                ]
            }
            Self::Icosahedron => {
                // Three orthogonal golden rectangles; |(1, φ, 0)| = √(φ√5).
                let a = scale / (PHI * 5.0_f64.sqrt()).sqrt();
                let b = a * PHI;
                vec![
                    Vec3::new(-a, b, 0.0),
                    Vec3::new(a, b, 0.0),
                    Vec3::new(-a, -b, 0.0),
                    Vec3::new(a, -b, 0.0),
                    Vec3::new(0.0, -a, b),
                    Vec3::new(0.0, a, b),
                    Vec3::new(0.0, -a, -b),
                    Vec3::new(0.0, a, -b),
                    Vec3::new(b, 0.0, -a),
                    Vec3::new(b, 0.0, a),
                    Vec3::new(-b, 0.0, -a),
                    Vec3::new(-b, 0.0, a),
                ]
            }
            Self::Dodecahedron => {
                // Unit cube corners plus the three golden-ratio cross terms.
                let b = scale / 3.0_f64.sqrt();
                let c = b / PHI;
                let d = b * PHI;
                vec![
                    Vec3::new(-b, -b, -b),
                    Vec3::new(-b, -b, b),
                    Vec3::new(-b, b, -b),
                    Vec3::new(-b, b, b),
                    Vec3::new(b, -b, -b),
                    Vec3::new(b, -b, b),
                    Vec3::new(b, b, -b),
                    Vec3::new(b, b, b),
                    Vec3::new(0.0, -c, -d),
                    Vec3::new(0.0, -c, d),
                    Vec3::new(0.0, c, -d),
                    Vec3::new(0.0, c, d),
                    Vec3::new(-c, -d, 0.0),
                    Vec3::new(-c, d, 0.0),
                    Vec3::new(c, -d, 0.0),
                    Vec3::new(c, d, 0.0),
                    Vec3::new(-d, 0.0, -c),
                    Vec3::new(d, 0.0, -c),
                    Vec3::new(-d, 0.0, c),
                    Vec3::new(d, 0.0, c),
                ]
            }
        }
    }

    /// Hand-enumerated triangle table matching [`Self::vertices`] ordering.
    ///
    /// Quad faces are split in two, pentagon faces fan-triangulated from one
    /// corner. Winding affects only rendering, not correctness.
    #[must_use]
    pub fn triangle_indices(self) -> Vec<u32> {
        match self {
            Self::Tetrahedron => vec![0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2],
            Self::Cube => vec![
                0, 1, 2, 0, 2, 3, // z = -a
                4, 6, 5, 4, 7, 6, // z = +a
                0, 5, 1, 0, 4, 5, // y = -a
                3, 2, 6, 3, 6, 7, // y = +a
                0, 3, 7, 0, 7, 4, // x = -a
                1, 2, 6, 1, 6, 5, // x = +a
            ],
            Self::Octahedron => vec![
                0, 2, 4, 2, 1, 4, 1, 3, 4, 3, 0, 4, //
                2, 0, 5, 1, 2, 5, 3, 1, 5, 0, 3, 5,
            ],
            Self::Icosahedron => vec![
                0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, //
                1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1, 8, //
                3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, //
                4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
            ],
            Self::Dodecahedron => vec![
                3, 11, 7, 3, 7, 15, 3, 15, 13, //
                7, 19, 17, 7, 17, 6, 7, 6, 15, //
                17, 4, 8, 17, 8, 10, 17, 10, 6, //
                8, 0, 16, 8, 16, 2, 8, 2, 10, //
                0, 12, 1, 0, 1, 18, 0, 18, 16, //
                6, 10, 2, 6, 2, 13, 6, 13, 15, //
                2, 16, 18, 2, 18, 3, 2, 3, 13, //
                18, 1, 9, 18, 9, 11, 18, 11, 3, //
                4, 14, 12, 4, 12, 0, 4, 0, 8, //
                11, 9, 5, 11, 5, 19, 11, 19, 7, //
                19, 5, 14, 19, 14, 4, 19, 4, 17, //
                1, 12, 14, 1, 14, 5, 1, 5, 9,
            ],
        }
    }
}

/// Shape dispatch: either an exact Platonic construction or the procedural
/// path for an arbitrary face count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Platonic(PlatonicSolid),
    Procedural(u32),
}

impl ShapeKind {
    #[must_use]
    pub const fn from_face_count(faces: u32) -> Self {
        match PlatonicSolid::from_face_count(faces) {
            Some(solid) => Self::Platonic(solid),
            None => Self::Procedural(faces),
        }
    }

    #[must_use]
    pub const fn face_count(self) -> u32 {
        match self {
            Self::Platonic(solid) => solid.face_count(),
            Self::Procedural(faces) => faces,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Euler vertex budget
// ─────────────────────────────────────────────────────────────────────────────

/// A consistent (vertices, edges, edges-per-face) triple for a face count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBudget {
    pub vertices: u32,
    pub edges: u32,
    pub edges_per_face: u32,
}

/// Estimate a vertex budget for `faces` faces via Euler's formula.
///
/// Tries triangle, quad and pentagon dominated configurations
/// (`F·p = 2E`, `V = 2 + E − F`), keeps those satisfying `3F ≤ 2E` and
/// `E ≤ 3V − 6`, and picks the one whose convex hull of `V` points in convex
/// position (a closed triangulation, so `2V − 4` triangles) lands closest to
/// the requested face count. The synthesis path caps its modulation so the
/// generated points actually stay in convex position.
#[must_use]
pub fn vertex_budget_for_faces(faces: u32) -> VertexBudget {
    let faces = u64::from(faces);
    let mut best: Option<(u64, VertexBudget)> = None;

    for edges_per_face in 3..=5u64 {
        let edges = (faces * edges_per_face).div_ceil(2);
        let vertices = (2 + edges).saturating_sub(faces);

        let valid = vertices > 0
            && edges > 0
            && 3 * faces <= 2 * edges
            && edges + 6 <= 3 * vertices
            && 2 * edges >= edges_per_face * faces;
        if !valid {
            continue;
        }

        let hull_faces = 2 * vertices - 4;
        let error = hull_faces.abs_diff(faces);
        let candidate = VertexBudget {
            vertices: u32::try_from(vertices).unwrap_or(u32::MAX),
            edges: u32::try_from(edges).unwrap_or(u32::MAX),
            edges_per_face: edges_per_face as u32,
        };
        match best {
            Some((best_error, _)) if best_error <= error => {}
            _ => best = Some((error, candidate)),
        }
    }

    // Every face count >= 4 admits the triangle configuration; smaller counts
    // fall back to the tetrahedron budget.
    best.map_or(
        VertexBudget { vertices: 4, edges: 6, edges_per_face: 3 },
        |(_, budget)| budget,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Procedural distributions
// ─────────────────────────────────────────────────────────────────────────────

/// Place `count` points near-uniformly on a sphere of radius `scale` using
/// the golden-angle spiral.
#[must_use]
pub fn fibonacci_sphere(count: u32, scale: f64) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![Vec3::new(0.0, scale, 0.0)];
    }

    let mut points = Vec::with_capacity(count as usize);
    for i in 0..count {
        let t = f64::from(i) / f64::from(count - 1);
        let inclination = (2.0 * t - 1.0).clamp(-1.0, 1.0).acos() - std::f64::consts::FRAC_PI_2;
        let azimuth = GOLDEN_ANGLE * f64::from(i);

        // Y is the pole axis, matching the height modulation downstream.
        let x = inclination.cos() * azimuth.cos();
        let y = inclination.sin();
        let z = inclination.cos() * azimuth.sin();
        points.push(Vec3::new(x * scale, y * scale, z * scale));
    }
    points
}

/// Sinusoidal shape-modulation bundle.
///
/// Three sine waves of increasing frequency perturb the radial and height
/// profile of a procedurally generated shape. Persisting and re-supplying the
/// same bundle reproduces the same shape deterministically; `jitter_seed`
/// covers the positional jitter applied at high face counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomParams {
    pub radial_amplitudes: Vec<f64>,
    pub height_amplitudes: Vec<f64>,
    pub phases: Vec<f64>,
    #[serde(default)]
    pub jitter_seed: u64,
}

impl RandomParams {
    /// Draw a fresh bundle: amplitudes in `[0, 0.5)`, phases in `[0, 2π)`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut draw =
            |max: f64| -> Vec<f64> { (0..WAVE_COUNT).map(|_| rng.random::<f64>() * max).collect() };
        let radial_amplitudes = draw(0.5);
        let height_amplitudes = draw(0.5);
        let phases = draw(std::f64::consts::TAU);
        Self {
            radial_amplitudes,
            height_amplitudes,
            phases,
            jitter_seed: rng.random::<u64>(),
        }
    }

    /// Radial multiplier and height offset at azimuthal angle `angle`.
    #[must_use]
    fn modulation(&self, angle: f64) -> (f64, f64) {
        let mut radial = 1.0;
        let mut height = 0.0;
        for (i, phase) in self.phases.iter().enumerate() {
            let freq = (i + 1) as f64;
            let wave = (freq * angle + phase).sin();
            if let Some(amp) = self.radial_amplitudes.get(i) {
                radial += amp * wave;
            }
            if let Some(amp) = self.height_amplitudes.get(i) {
                height += amp * wave;
            }
        }
        (radial, height)
    }

    /// Copy of the bundle with amplitudes scaled so the frequency-weighted
    /// sum `Σ aᵢ·i²` of each wave family stays within [`MODULATION_CAP`].
    /// Mild bundles pass through unchanged; phases and jitter seed always do.
    fn capped_for_hull(&self) -> Self {
        let weighted = |amps: &[f64]| -> f64 {
            amps.iter()
                .enumerate()
                .map(|(i, a)| a.abs() * ((i + 1) * (i + 1)) as f64)
                .sum()
        };
        let factor = |total: f64| {
            if total > MODULATION_CAP { MODULATION_CAP / total } else { 1.0 }
        };

        let radial_factor = factor(weighted(&self.radial_amplitudes));
        let height_factor = factor(weighted(&self.height_amplitudes));
        if radial_factor >= 1.0 && height_factor >= 1.0 {
            return self.clone();
        }

        Self {
            radial_amplitudes: self.radial_amplitudes.iter().map(|a| a * radial_factor).collect(),
            height_amplitudes: self.height_amplitudes.iter().map(|a| a * height_factor).collect(),
            phases: self.phases.clone(),
            jitter_seed: self.jitter_seed,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Synthesis
// ─────────────────────────────────────────────────────────────────────────────

/// Output of [`synthesize`]: the vertex set plus the modulation bundle the
/// procedural path used (None for Platonic solids).
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub points: Vec<Vec3>,
    pub params: Option<RandomParams>,
}

/// Default tetrahedron-equivalent point set, the fallback every degenerate
/// path substitutes.
#[must_use]
pub fn default_tetra_points(center: Vec3, radius: f64) -> Vec<Vec3> {
    let a = radius;
    vec![
        center + Vec3::new(a, a, a),
        center + Vec3::new(-a, -a, a),
        center + Vec3::new(-a, a, -a),
        center + Vec3::new(a, -a, -a),
    ]
}

/// Synthesize the vertex set of a polyhedron with (approximately)
/// `face_count` faces on a sphere of radius `scale`.
///
/// Platonic face counts return the exact construction. The procedural path
/// sizes itself with [`vertex_budget_for_faces`], distributes points with
/// [`fibonacci_sphere`], modulates them with `params` (drawing a fresh bundle
/// from `rng` when absent) and, above 20 faces, jitters positions by at most
/// 10% of `scale` to break the spiral's symmetry.
///
/// Never returns fewer than 4 points, and never returns a non-finite
/// coordinate; degenerate outcomes are replaced by the default tetrahedron.
pub fn synthesize<R: Rng + ?Sized>(
    face_count: u32,
    scale: f64,
    params: Option<&RandomParams>,
    rng: &mut R,
) -> Synthesis {
    match ShapeKind::from_face_count(face_count.max(1)) {
        ShapeKind::Platonic(solid) => Synthesis { points: solid.vertices(scale), params: None },
        ShapeKind::Procedural(faces) => {
            let params = params.cloned().unwrap_or_else(|| RandomParams::generate(rng));
            let points = synthesize_procedural(faces, scale, &params);
            Synthesis { points, params: Some(params) }
        }
    }
}

fn synthesize_procedural(faces: u32, scale: f64, params: &RandomParams) -> Vec<Vec3> {
    // The hull of V points in convex position has 2V - 4 triangles, so the
    // budget's vertex count is what keeps the final face count near `faces`.
    let budget = vertex_budget_for_faces(faces);
    let count = budget.vertices.max(4);
    let params = params.capped_for_hull();

    let mut points: Vec<Vec3> = fibonacci_sphere(count, scale)
        .into_iter()
        .map(|p| {
            let angle = p.x.atan2(p.z);
            let (radial, height) = params.modulation(angle);
            let y = p.y + height * (scale - p.y.abs());
            Vec3::new(p.x * radial, y, p.z * radial)
        })
        .collect();

    if faces > JITTER_FACE_THRESHOLD {
        let mut jitter_rng = StdRng::seed_from_u64(params.jitter_seed);
        for p in &mut points {
            let j = JITTER_FRACTION * scale;
            *p = *p
                + Vec3::new(
                    (jitter_rng.random::<f64>() - 0.5) * j,
                    (jitter_rng.random::<f64>() - 0.5) * j,
                    (jitter_rng.random::<f64>() - 0.5) * j,
                );
        }
    }

    points.retain(|p| p.is_finite());
    if points.len() < 4 {
        log::warn!("synthesis for {faces} faces collapsed to {} usable points", points.len());
        return default_tetra_points(Vec3::ZERO, scale * 0.5);
    }
    points
}

// ─────────────────────────────────────────────────────────────────────────────
// Ring lattice
// ─────────────────────────────────────────────────────────────────────────────

/// Vertices organized into latitude rings, single points at both poles.
///
/// Produced by [`ring_vertices`] and consumed by
/// [`crate::faces::triangulate_rings`].
#[derive(Debug, Clone)]
pub struct RingLattice {
    pub points: Vec<Vec3>,
    pub ring_sizes: Vec<u32>,
}

/// Generate a ringed vertex lattice following a sphere profile, radially and
/// vertically modulated by `params`.
#[must_use]
pub fn ring_vertices(face_count: u32, scale: f64, params: &RandomParams) -> RingLattice {
    let sides = face_count.max(3);
    let num_rings = (sides / 8).max(2);

    let mut points = Vec::new();
    let mut ring_sizes = Vec::with_capacity(num_rings as usize + 1);

    for ring in 0..=num_rings {
        let ring_y = f64::from(ring) / f64::from(num_rings) * 2.0 - 1.0;
        let ring_radius = (1.0 - ring_y * ring_y).max(0.0).sqrt();
        if ring == 0 || ring == num_rings {
            points.push(Vec3::new(0.0, ring_y * scale, 0.0));
            ring_sizes.push(1);
            continue;
        }

        for i in 0..sides {
            let angle = f64::from(i) / f64::from(sides) * std::f64::consts::TAU;
            let (radial, height) = params.modulation(angle);
            let radius = ring_radius * radial;
            points.push(Vec3::new(
                angle.cos() * radius * scale,
                (ring_y + height * (1.0 - ring_y.abs())) * scale,
                angle.sin() * radius * scale,
            ));
        }
        ring_sizes.push(sides);
    }

    RingLattice { points, ring_sizes }
}
