//! Procedural polyhedron generation and morphing.
//!
//! `polystudio` turns a single integer — a target face count — into a
//! renderable triangulated polyhedron, and animates smooth transitions
//! between any two such shapes:
//!
//! - [`shape`]: vertex synthesis (exact Platonic solids, Fibonacci-sphere
//!   procedural shapes with sinusoidal modulation, latitude-ring lattices).
//! - [`faces`] and [`hull`]: triangulation, by hand-enumerated tables, ring
//!   strips or convex hull reconstruction.
//! - [`mesh`]: the `PolyMesh` buffers handed to a renderer, wireframe edge
//!   extraction and per-vertex face attributes.
//! - [`sampler`] and [`morph`]: surface point clouds, correspondence
//!   matching and the eased two-phase morph animation.
//! - [`studio`]: the synchronous frame-driven driver tying it all together.
//!
//! The crate is renderer-agnostic: it produces position and index buffers
//! plus colors, and leaves drawing, input and persistence to the host.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]

pub mod assemble;
pub mod core;
pub mod faces;
pub mod hull;
pub mod mesh;
pub mod morph;
pub mod sampler;
pub mod shape;
pub mod studio;

pub use crate::core::{Spherical, Vec3};
pub use assemble::{Assembly, assemble};
pub use faces::{triangulate_lattice, triangulate_rings};
pub use hull::{HullError, convex_hull, convex_hull_or_fallback, fallback_tetrahedron};
pub use mesh::{EdgeSet, PolyMesh};
pub use morph::{
    Color, ColorParseError, Gradient, MorphFrame, MorphPhase, MorphState, ease_in_out_cubic,
    match_points, smooth_blend, smootherstep,
};
pub use sampler::{MAX_SAMPLES, MIN_SAMPLES, sample_surface};
pub use shape::{
    PlatonicSolid, RandomParams, RingLattice, ShapeKind, Synthesis, VertexBudget,
    fibonacci_sphere, ring_vertices, synthesize, vertex_budget_for_faces,
};
pub use studio::{Frame, Studio, StudioConfig};

#[cfg(test)]
mod tests;
