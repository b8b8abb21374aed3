//! Triangulation of ring-organized vertex lattices.
//!
//! Platonic solids carry hand-enumerated triangle tables
//! ([`crate::shape::PlatonicSolid::triangle_indices`]) and arbitrary point
//! clouds go through the convex hull ([`crate::hull`]); this module covers
//! the third deriver: vertices organized into latitude rings, stitched band
//! by band with quad splits and pole fans.

use super::shape::RingLattice;

/// Triangulate a ringed lattice described by its per-ring vertex counts.
///
/// Rings are laid out consecutively in the vertex buffer. Single-point rings
/// (the poles) are fan-connected to their neighbor ring; bands between rings
/// of equal size are split into alternating triangle pairs. Bands between
/// unequal multi-point rings wrap indices modulo the ring size, which keeps
/// the output well-formed for any input.
#[must_use]
pub fn triangulate_rings(ring_sizes: &[u32]) -> Vec<u32> {
    let mut indices = Vec::new();
    let mut offset = 0u32;

    for pair in ring_sizes.windows(2) {
        let (n1, n2) = (pair[0], pair[1]);
        let base1 = offset;
        let base2 = offset + n1;

        match (n1, n2) {
            (0, _) | (_, 0) | (1, 1) => {}
            (1, n) => {
                // North pole fan.
                for i in 0..n {
                    indices.extend([base1, base2 + i, base2 + (i + 1) % n]);
                }
            }
            (n, 1) => {
                // South pole fan.
                for i in 0..n {
                    indices.extend([base1 + i, base2, base1 + (i + 1) % n]);
                }
            }
            _ => {
                let n = n1.max(n2);
                for i in 0..n {
                    let a = base1 + i % n1;
                    let b = base1 + (i + 1) % n1;
                    let c = base2 + i % n2;
                    let d = base2 + (i + 1) % n2;
                    indices.extend([a, b, c]);
                    indices.extend([b, d, c]);
                }
            }
        }

        offset = base2;
    }

    indices
}

/// Triangulate a [`RingLattice`] produced by [`crate::shape::ring_vertices`].
#[must_use]
pub fn triangulate_lattice(lattice: &RingLattice) -> Vec<u32> {
    triangulate_rings(&lattice.ring_sizes)
}
