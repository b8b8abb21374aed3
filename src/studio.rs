//! Frame-driven studio driver.
//!
//! Owns the currently displayed mesh and the in-flight [`MorphState`], and
//! wires the pipeline together: a face-count request assembles the target
//! mesh, samples both surfaces, matches the clouds and installs a fresh
//! morph; every `tick` advances it and hands the renderer its buffers.
//! Everything is synchronous and single-threaded; the morph state is replaced
//! wholesale, never mutated from more than one control path.
//!
//! Randomization parameters are an explicit value: [`Studio::random_params`]
//! exposes the bundle for the host to persist, and
//! [`Studio::set_random_params`] feeds a saved bundle back in so a reloaded
//! page shows the same procedural shape.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::assemble::assemble;
use super::mesh::{EdgeSet, PolyMesh};
use super::morph::{Color, Gradient, MorphState, match_points};
use super::sampler::sample_surface;
use super::shape::RandomParams;

/// Tunables for the studio loop.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Circumsphere radius of generated shapes.
    pub scale: f64,
    /// Morph progress per second for interactive changes.
    pub interactive_speed: f64,
    /// Morph progress per second in auto-cycling show mode.
    pub show_speed: f64,
    /// Inclusive face-count range show mode draws from.
    pub show_face_range: (u32, u32),
    /// Initial gradient.
    pub gradient: Gradient,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            scale: 1.5,
            interactive_speed: 0.8,
            show_speed: 1.2,
            show_face_range: (4, 100),
            gradient: (Color::new(0.4, 0.4, 0.4), Color::WHITE),
        }
    }
}

/// Per-tick output for the renderer.
#[derive(Debug, Clone)]
pub struct Frame {
    pub mesh: PolyMesh,
    pub edges: EdgeSet,
    pub colors: Gradient,
    /// True while a morph is still in flight.
    pub morphing: bool,
}

/// The studio state machine: `Idle → Morphing → Idle`, with show mode
/// chaining a fresh random morph at every completion.
#[derive(Debug)]
pub struct Studio {
    config: StudioConfig,
    rng: StdRng,
    face_count: u32,
    params: Option<RandomParams>,
    current: PolyMesh,
    colors: Gradient,
    morph: Option<MorphState>,
    show_mode: bool,
}

impl Studio {
    /// Default face count on first load (a tetrahedron).
    pub const DEFAULT_FACE_COUNT: u32 = 4;

    #[must_use]
    pub fn new(config: StudioConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Construct with a caller-supplied generator, for deterministic tests.
    #[must_use]
    pub fn with_rng(config: StudioConfig, mut rng: StdRng) -> Self {
        let assembly = assemble(Self::DEFAULT_FACE_COUNT, config.scale, None, &mut rng);
        let colors = config.gradient;
        Self {
            config,
            rng,
            face_count: Self::DEFAULT_FACE_COUNT,
            params: assembly.params,
            current: assembly.mesh,
            colors,
            morph: None,
            show_mode: false,
        }
    }

    /// Restore a persisted session: last face count plus the randomization
    /// bundle that shaped it. A `None` bundle falls back to fresh
    /// randomization, so stale or absent storage is harmless.
    #[must_use]
    pub fn from_saved(config: StudioConfig, face_count: u32, params: Option<RandomParams>) -> Self {
        let mut rng = StdRng::from_os_rng();
        let face_count = face_count.max(1);
        let assembly = assemble(face_count, config.scale, params.as_ref(), &mut rng);
        let colors = config.gradient;
        Self {
            config,
            rng,
            face_count,
            // A Platonic restore assembles without params; keep the saved
            // bundle for the next procedural request, as request_face_count
            // does.
            params: assembly.params.or(params),
            current: assembly.mesh,
            colors,
            morph: None,
            show_mode: false,
        }
    }

    #[must_use]
    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    #[must_use]
    pub fn current_mesh(&self) -> &PolyMesh {
        &self.current
    }

    #[must_use]
    pub fn is_morphing(&self) -> bool {
        self.morph.is_some()
    }

    /// The randomization bundle behind the current procedural shape, for the
    /// host to persist. None while a Platonic solid is displayed.
    #[must_use]
    pub fn random_params(&self) -> Option<&RandomParams> {
        self.params.as_ref()
    }

    /// Replace the randomization bundle (for example one loaded from
    /// storage). Takes effect on the next face-count request.
    pub fn set_random_params(&mut self, params: Option<RandomParams>) {
        self.params = params;
    }

    #[must_use]
    pub fn show_mode(&self) -> bool {
        self.show_mode
    }

    /// Toggle the auto-cycling show. Enabling it while idle starts a random
    /// morph immediately; an in-flight morph simply chains at completion.
    pub fn set_show_mode(&mut self, enabled: bool) {
        self.show_mode = enabled;
        if enabled && self.morph.is_none() {
            self.start_show_morph();
        }
    }

    /// Request a new target face count, optionally with a target gradient.
    ///
    /// The face count is clamped to at least 1. Any morph already in flight
    /// is discarded and replaced wholesale; its partial geometry needs no
    /// teardown.
    pub fn request_face_count(&mut self, face_count: u32, colors: Option<Gradient>) {
        let face_count = face_count.max(1);
        let assembly = assemble(face_count, self.config.scale, self.params.as_ref(), &mut self.rng);

        let source_cloud = sample_surface(&self.current, self.face_count, &mut self.rng);
        let target_cloud = sample_surface(&assembly.mesh, face_count, &mut self.rng);
        let (matched_source, matched_target) = match_points(&source_cloud, &target_cloud);

        self.morph = Some(MorphState::new(
            matched_source,
            matched_target,
            face_count,
            assembly.mesh,
            self.colors,
            colors.unwrap_or(self.colors),
        ));
        self.face_count = face_count;
        if assembly.params.is_some() {
            self.params = assembly.params;
        }
    }

    /// Regenerate the current face count with fresh randomization.
    pub fn randomize(&mut self) {
        self.params = None;
        self.request_face_count(self.face_count, None);
    }

    /// Advance the animation by `delta` seconds and produce the frame to
    /// display. With no morph in flight this returns the settled mesh.
    pub fn tick(&mut self, delta: f64) -> Frame {
        let Some(morph) = self.morph.as_mut() else {
            return self.idle_frame();
        };

        let speed = if self.show_mode {
            self.config.show_speed
        } else {
            self.config.interactive_speed
        };
        let morph_frame = morph.advance(delta, speed);

        if morph_frame.completed {
            self.current = morph_frame.mesh.clone();
            self.colors = morph_frame.colors;
            self.morph = None;
            if self.show_mode {
                self.start_show_morph();
            }
        }

        Frame {
            mesh: morph_frame.mesh,
            edges: morph_frame.edges,
            colors: morph_frame.colors,
            morphing: self.morph.is_some(),
        }
    }

    fn idle_frame(&self) -> Frame {
        Frame {
            mesh: self.current.clone(),
            edges: EdgeSet::from_mesh(&self.current),
            colors: self.colors,
            morphing: false,
        }
    }

    fn start_show_morph(&mut self) {
        let (lo, hi) = self.config.show_face_range;
        let faces = self.rng.random_range(lo..=hi.max(lo));
        let colors = (self.random_show_color(), self.random_show_color());
        self.request_face_count(faces, Some(colors));
    }

    fn random_show_color(&mut self) -> Color {
        Color::from_hsl(
            self.rng.random::<f64>() * 360.0,
            0.3 + self.rng.random::<f64>() * 0.4,
            0.3 + self.rng.random::<f64>() * 0.4,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::PlatonicSolid;

    fn studio(seed: u64) -> Studio {
        Studio::with_rng(StudioConfig::default(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_starts_with_exact_tetrahedron() {
        let s = studio(1);
        assert_eq!(s.face_count(), 4);
        assert_eq!(s.current_mesh().vertex_count(), 4);
        assert!(!s.is_morphing());

        let expected = PlatonicSolid::Tetrahedron.vertices(1.5);
        for v in &expected {
            assert!(
                s.current_mesh()
                    .positions
                    .iter()
                    .any(|p| crate::core::Vec3::from_array(*p).distance(*v) < 1e-12)
            );
        }
    }

    #[test]
    fn test_request_starts_morph() {
        let mut s = studio(2);
        s.request_face_count(6, None);
        assert!(s.is_morphing());
        assert_eq!(s.face_count(), 6);

        let frame = s.tick(0.016);
        assert!(frame.mesh.validate().is_ok());
    }

    #[test]
    fn test_morph_runs_to_exact_cube() {
        let mut s = studio(3);
        s.request_face_count(6, None);

        // 0.8 progress/s: two seconds of frames is more than enough.
        let mut last = s.tick(0.016);
        for _ in 0..125 {
            last = s.tick(0.016);
            if !last.morphing {
                break;
            }
        }
        assert!(!last.morphing);

        let cube = PolyMesh::from_points(
            &PlatonicSolid::Cube.vertices(1.5),
            PlatonicSolid::Cube.triangle_indices(),
        );
        assert_eq!(s.current_mesh().positions, cube.positions);
        assert_eq!(s.current_mesh().indices, cube.indices);
    }

    #[test]
    fn test_new_request_replaces_morph() {
        let mut s = studio(4);
        s.request_face_count(6, None);
        s.tick(0.016);
        s.request_face_count(20, None);
        assert_eq!(s.face_count(), 20);

        let frame = s.tick(10.0);
        assert!(!frame.morphing);
        assert_eq!(s.current_mesh().triangle_count(), 20);
    }

    #[test]
    fn test_zero_face_request_clamped() {
        let mut s = studio(5);
        s.request_face_count(0, None);
        assert_eq!(s.face_count(), 1);
        let frame = s.tick(10.0);
        assert!(frame.mesh.validate().is_ok());
    }

    #[test]
    fn test_show_mode_chains_morphs() {
        let mut s = studio(6);
        s.set_show_mode(true);
        assert!(s.is_morphing());

        // Run past the first completion; show mode must chain another morph.
        let mut completions = 0;
        let mut was_morphing = true;
        for _ in 0..1000 {
            let frame = s.tick(0.016);
            if was_morphing && !frame.morphing {
                completions += 1;
            }
            was_morphing = frame.morphing;
        }
        // Chained morphs mean the loop keeps morphing; completion frames in
        // show mode immediately install the next target.
        assert!(s.is_morphing() || completions == 0);
        assert!(s.face_count() >= 4 && s.face_count() <= 100);
    }

    #[test]
    fn test_platonic_restore_keeps_saved_bundle() {
        let mut rng = StdRng::seed_from_u64(20);
        let params = RandomParams::generate(&mut rng);

        let mut s = Studio::from_saved(StudioConfig::default(), 6, Some(params.clone()));
        assert_eq!(s.random_params(), Some(&params));

        // The retained bundle shapes the next procedural request.
        s.request_face_count(37, None);
        s.tick(1e6);
        let mut check_rng = StdRng::seed_from_u64(99);
        let expected = assemble(37, 1.5, Some(&params), &mut check_rng).mesh;
        assert_eq!(s.current_mesh().positions, expected.positions);
        assert_eq!(s.current_mesh().indices, expected.indices);
    }

    #[test]
    fn test_saved_params_reproduce_shape() {
        let mut s = studio(7);
        s.request_face_count(37, None);
        s.tick(10.0);
        let params = s.random_params().cloned().expect("procedural shape has params");
        let face_count = s.face_count();

        let restored_a = Studio::from_saved(StudioConfig::default(), face_count, Some(params.clone()));
        let restored_b = Studio::from_saved(StudioConfig::default(), face_count, Some(params));
        assert_eq!(
            restored_a.current_mesh().positions,
            restored_b.current_mesh().positions
        );
        assert_eq!(s.current_mesh().positions, restored_a.current_mesh().positions);
    }
}
