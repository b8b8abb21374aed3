//! Point matching, easing and morph animation.
//!
//! A morph is an animated transition between two mesh topologies: both meshes
//! are reduced to point clouds of the same size, paired index-to-index by a
//! canonical spherical ordering, and linearly interpolated with a blended
//! easing curve while the surface is re-triangulated through the convex hull
//! every frame. When progress reaches 1 the animation snaps to the exact
//! target mesh, so the final shape is never a hull approximation.
//!
//! The ordering heuristic is deliberately not an optimal assignment; visual
//! plausibility, not exactness, is the goal.

use thiserror::Error;

use super::core::{Spherical, Vec3};
use super::hull::convex_hull;
use super::mesh::{EdgeSet, PolyMesh};

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// RGB color with channels in `[0, 1]`, interpolated in lockstep with
/// morph progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must be of the form #rrggbb, got {0:?}")]
    Malformed(String),
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError::Malformed(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| ColorParseError::Malformed(hex.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as a `#rrggbb` hex string.
    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Convert from HSL (`hue` in degrees, `saturation`/`lightness` in
    /// `[0, 1]`).
    #[must_use]
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        Self::new(r + m, g + m, b + m)
    }

    /// Linear per-channel interpolation.
    #[must_use]
    pub fn lerp(self, rhs: Self, t: f64) -> Self {
        Self::new(
            self.r + (rhs.r - self.r) * t,
            self.g + (rhs.g - self.g) * t,
            self.b + (rhs.b - self.b) * t,
        )
    }
}

/// A gradient as used by the renderer: start and end color.
pub type Gradient = (Color, Color);

fn lerp_gradient(a: Gradient, b: Gradient, t: f64) -> Gradient {
    (a.0.lerp(b.0, t), a.1.lerp(b.1, t))
}

// ─────────────────────────────────────────────────────────────────────────────
// Easing
// ─────────────────────────────────────────────────────────────────────────────

/// Classic cubic ease-in-out.
#[must_use]
pub fn ease_in_out_cubic(x: f64) -> f64 {
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

/// 6th-order smootherstep, `6x⁵ − 15x⁴ + 10x³`.
#[must_use]
pub fn smootherstep(x: f64) -> f64 {
    x * x * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// Cubic ease and smootherstep, mixed by smootherstep itself. Smoother at
/// both ends than either curve alone.
#[must_use]
pub fn smooth_blend(x: f64) -> f64 {
    let smoothed = smootherstep(x);
    let cubic = ease_in_out_cubic(x);
    let blend = smootherstep(x);
    cubic * (1.0 - blend) + smoothed * blend
}

// ─────────────────────────────────────────────────────────────────────────────
// Point matching
// ─────────────────────────────────────────────────────────────────────────────

/// Sort-key quantization matching the matcher's angular tie tolerance.
const SORT_QUANTUM: f64 = 1000.0;

/// Pair two point clouds for interpolation.
///
/// Both sets are truncated to the shorter length, aligned by centroid and
/// mean-radius scale, and sorted by spherical coordinates (radius, then polar
/// angle, then azimuth) around their own centers. The returned clouds are the
/// original points in sorted order; index `i` of one corresponds to index `i`
/// of the other.
#[must_use]
pub fn match_points(source: &[Vec3], target: &[Vec3]) -> (Vec<Vec3>, Vec<Vec3>) {
    let count = source.len().min(target.len());
    if count == 0 {
        return (Vec::new(), Vec::new());
    }
    let source = &source[..count];
    let target = &target[..count];

    let source_center = centroid(source);
    let target_center = centroid(target);
    let source_scale = mean_distance(source, source_center);
    let target_scale = mean_distance(target, target_center);
    let scale_ratio = if source_scale > f64::EPSILON { target_scale / source_scale } else { 1.0 };

    let ordered = |points: &[Vec3], center: Vec3, scale: f64| -> Vec<Vec3> {
        let mut order: Vec<usize> = (0..count).collect();
        let keys: Vec<Spherical> = points
            .iter()
            .map(|&p| Spherical::from_vec3((p - center) * scale))
            .collect();
        order.sort_by(|&a, &b| spherical_order(keys[a], keys[b]));
        order.into_iter().map(|i| points[i]).collect()
    };

    (
        ordered(source, source_center, scale_ratio),
        ordered(target, target_center, 1.0),
    )
}

fn centroid(points: &[Vec3]) -> Vec3 {
    points.iter().fold(Vec3::ZERO, |acc, &p| acc + p) / points.len() as f64
}

fn mean_distance(points: &[Vec3], center: Vec3) -> f64 {
    points.iter().map(|&p| p.distance(center)).sum::<f64>() / points.len() as f64
}

/// Total order on spherical keys: quantized radius, then quantized polar
/// angle, then azimuth. Quantization stands in for the tie tolerance while
/// keeping the comparator a valid total order.
fn spherical_order(a: Spherical, b: Spherical) -> std::cmp::Ordering {
    let q = |v: f64| (v * SORT_QUANTUM).round() as i64;
    q(a.radius)
        .cmp(&q(b.radius))
        .then_with(|| q(a.phi).cmp(&q(b.phi)))
        .then_with(|| a.theta.total_cmp(&b.theta))
}

// ─────────────────────────────────────────────────────────────────────────────
// Morph state
// ─────────────────────────────────────────────────────────────────────────────

/// Phase of an active morph.
///
/// `MatchingTopology` interpolates the sampled point clouds and re-hulls
/// every frame; `Finalizing` swaps to the exact target mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphPhase {
    MatchingTopology,
    Finalizing,
}

/// One frame of morph output for the renderer.
#[derive(Debug, Clone)]
pub struct MorphFrame {
    pub mesh: PolyMesh,
    pub edges: EdgeSet,
    pub colors: Gradient,
    pub completed: bool,
}

/// State of one in-flight morph, owned exclusively by the frame loop that
/// created it and replaced wholesale when a new morph begins.
#[derive(Debug, Clone)]
pub struct MorphState {
    source_points: Vec<Vec3>,
    target_points: Vec<Vec3>,
    progress: f64,
    phase: MorphPhase,
    target_face_count: u32,
    target_mesh: PolyMesh,
    source_colors: Gradient,
    target_colors: Gradient,
}

impl MorphState {
    /// Begin a morph between two already-matched point clouds toward
    /// `target_mesh`. The clouds are truncated to a common length.
    #[must_use]
    pub fn new(
        source_points: Vec<Vec3>,
        target_points: Vec<Vec3>,
        target_face_count: u32,
        target_mesh: PolyMesh,
        source_colors: Gradient,
        target_colors: Gradient,
    ) -> Self {
        let count = source_points.len().min(target_points.len());
        let mut source_points = source_points;
        let mut target_points = target_points;
        source_points.truncate(count);
        target_points.truncate(count);

        Self {
            source_points,
            target_points,
            progress: 0.0,
            phase: MorphPhase::MatchingTopology,
            target_face_count,
            target_mesh,
            source_colors,
            target_colors,
        }
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn phase(&self) -> MorphPhase {
        self.phase
    }

    #[must_use]
    pub fn target_face_count(&self) -> u32 {
        self.target_face_count
    }

    #[must_use]
    pub fn source_len(&self) -> usize {
        self.source_points.len()
    }

    #[must_use]
    pub fn target_len(&self) -> usize {
        self.target_points.len()
    }

    /// Advance the morph by `delta` seconds at `speed` progress units per
    /// second and produce the frame to display.
    ///
    /// Progress never decreases and is clamped to exactly 1.0. While matching
    /// topology the interpolated cloud is re-triangulated through the convex
    /// hull; any reconstruction failure aborts the morph by snapping to the
    /// exact target mesh. A completed morph keeps returning the target.
    pub fn advance(&mut self, delta: f64, speed: f64) -> MorphFrame {
        let step = (delta * speed).max(0.0);
        self.progress = (self.progress + step).min(1.0);

        if self.progress >= 1.0 {
            return self.finalize();
        }

        let eased = smooth_blend(self.progress);
        let points: Vec<Vec3> = self
            .source_points
            .iter()
            .zip(&self.target_points)
            .map(|(&s, &t)| s.lerp(t, eased))
            .collect();

        match convex_hull(&points) {
            Ok(mut mesh) => {
                mesh.attach_face_attributes();
                let edges = EdgeSet::from_mesh(&mesh);
                MorphFrame {
                    mesh,
                    edges,
                    colors: lerp_gradient(self.source_colors, self.target_colors, eased),
                    completed: false,
                }
            }
            Err(err) => {
                log::warn!(
                    "morph re-triangulation failed at progress {:.3} ({err}), snapping to target",
                    self.progress
                );
                self.progress = 1.0;
                self.finalize()
            }
        }
    }

    /// Phase 2: emit the exact target mesh rather than a hull approximation.
    fn finalize(&mut self) -> MorphFrame {
        self.phase = MorphPhase::Finalizing;
        MorphFrame {
            mesh: self.target_mesh.clone(),
            edges: EdgeSet::from_mesh(&self.target_mesh),
            colors: self.target_colors,
            completed: true,
        }
    }

    /// Consume the state, yielding the exact target mesh.
    #[must_use]
    pub fn into_target_mesh(self) -> PolyMesh {
        self.target_mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::PlatonicSolid;

    #[test]
    fn test_color_hex_roundtrip() {
        let c = Color::from_hex("#4facfe").unwrap();
        assert_eq!(c.to_hex(), "#4facfe");
        assert_eq!(Color::from_hex("666666").unwrap().to_hex(), "#666666");
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#12345g").is_err());
    }

    #[test]
    fn test_color_lerp_endpoints() {
        let a = Color::new(0.0, 0.5, 1.0);
        let b = Color::new(1.0, 0.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_color_from_hsl_primaries() {
        let red = Color::from_hsl(0.0, 1.0, 0.5);
        assert!((red.r - 1.0).abs() < 1e-9 && red.g.abs() < 1e-9);
        let green = Color::from_hsl(120.0, 1.0, 0.5);
        assert!((green.g - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_easing_endpoints_and_monotonicity() {
        for f in [ease_in_out_cubic, smootherstep, smooth_blend] {
            assert!(f(0.0).abs() < 1e-12);
            assert!((f(1.0) - 1.0).abs() < 1e-12);
            let mut prev = 0.0;
            for i in 1..=100 {
                let x = f64::from(i) / 100.0;
                let y = f(x);
                assert!(y >= prev - 1e-12, "easing not monotone at {x}");
                prev = y;
            }
        }
    }

    #[test]
    fn test_match_points_length_invariant() {
        let a = PlatonicSolid::Cube.vertices(1.5);
        let b = PlatonicSolid::Icosahedron.vertices(1.0);
        let (s, t) = match_points(&a, &b);
        assert_eq!(s.len(), t.len());
        assert_eq!(s.len(), a.len().min(b.len()));

        let (s2, t2) = match_points(&b, &a);
        assert_eq!(s2.len(), t2.len());
        assert_eq!(s2.len(), 8);

        let (e1, e2) = match_points(&[], &a);
        assert!(e1.is_empty() && e2.is_empty());
    }

    #[test]
    fn test_match_points_preserves_originals() {
        let a = PlatonicSolid::Tetrahedron.vertices(1.5);
        let b = PlatonicSolid::Tetrahedron.vertices(0.5);
        let (s, t) = match_points(&a, &b);

        // Output is a permutation of the inputs, not their normalized copies.
        for p in &s {
            assert!(a.iter().any(|q| q.distance(*p) < 1e-12));
        }
        for p in &t {
            assert!(b.iter().any(|q| q.distance(*p) < 1e-12));
        }
    }

    fn tetra_to_cube_state() -> MorphState {
        let tetra = PlatonicSolid::Tetrahedron;
        let cube = PlatonicSolid::Cube;
        let source = tetra.vertices(1.5);
        let target = cube.vertices(1.5);
        let (s, t) = match_points(&source, &target);
        let target_mesh = PolyMesh::from_points(&cube.vertices(1.5), cube.triangle_indices());
        MorphState::new(s, t, 6, target_mesh, (Color::WHITE, Color::WHITE), (Color::WHITE, Color::WHITE))
    }

    #[test]
    fn test_morph_progress_monotone_and_clamped() {
        let mut state = tetra_to_cube_state();
        let mut prev = state.progress();
        for _ in 0..200 {
            let frame = state.advance(0.016, 0.8);
            assert!(state.progress() >= prev);
            assert!(state.progress() <= 1.0);
            assert!(frame.mesh.validate().is_ok());
            prev = state.progress();
        }
        assert_eq!(state.progress(), 1.0);
        assert_eq!(state.phase(), MorphPhase::Finalizing);
    }

    #[test]
    fn test_morph_zero_delta_holds() {
        let mut state = tetra_to_cube_state();
        state.advance(0.5, 0.8);
        let p = state.progress();
        state.advance(0.0, 0.8);
        assert_eq!(state.progress(), p);
    }

    #[test]
    fn test_morph_completes_to_exact_target() {
        let mut state = tetra_to_cube_state();
        let frame = state.advance(10.0, 0.8);
        assert!(frame.completed);
        assert_eq!(state.phase(), MorphPhase::Finalizing);

        let cube = PlatonicSolid::Cube;
        let exact = PolyMesh::from_points(&cube.vertices(1.5), cube.triangle_indices());
        assert_eq!(frame.mesh.positions, exact.positions);
        assert_eq!(frame.mesh.indices, exact.indices);
    }

    #[test]
    fn test_degenerate_cloud_snaps_to_target() {
        // Collinear clouds make every interpolated hull fail; the morph must
        // force-complete on the exact target instead of erroring out.
        let line: Vec<Vec3> = (0..8).map(|i| Vec3::new(f64::from(i) * 0.1, 0.0, 0.0)).collect();
        let cube = PlatonicSolid::Cube;
        let target = PolyMesh::from_points(&cube.vertices(1.5), cube.triangle_indices());
        let mut state = MorphState::new(
            line.clone(),
            line,
            6,
            target.clone(),
            (Color::WHITE, Color::WHITE),
            (Color::WHITE, Color::WHITE),
        );

        let frame = state.advance(0.016, 0.8);
        assert!(frame.completed);
        assert_eq!(state.progress(), 1.0);
        assert_eq!(state.phase(), MorphPhase::Finalizing);
        assert_eq!(frame.mesh.positions, target.positions);
        assert_eq!(frame.mesh.indices, target.indices);
    }

    #[test]
    fn test_morph_color_lockstep() {
        let tetra = PlatonicSolid::Tetrahedron;
        let source = tetra.vertices(1.5);
        let (s, t) = match_points(&source, &source);
        let mesh = PolyMesh::from_points(&source, tetra.triangle_indices());
        let start = (Color::new(0.0, 0.0, 0.0), Color::new(0.0, 0.0, 0.0));
        let end = (Color::WHITE, Color::WHITE);
        let mut state = MorphState::new(s, t, 4, mesh, start, end);

        let frame = state.advance(10.0, 1.0);
        assert_eq!(frame.colors, end);
    }
}
