//! End-to-end session tests through the public API only.

use rand::SeedableRng;
use rand::rngs::StdRng;

use polystudio::{
    EdgeSet, PlatonicSolid, PolyMesh, RandomParams, Studio, StudioConfig, assemble, sample_surface,
};

fn studio(seed: u64) -> Studio {
    Studio::with_rng(StudioConfig::default(), StdRng::seed_from_u64(seed))
}

#[test]
fn fresh_studio_shows_a_tetrahedron() {
    let s = studio(1);
    assert_eq!(s.face_count(), 4);
    assert!(!s.is_morphing());
    assert!(s.current_mesh().validate().is_ok());
    assert!(s.random_params().is_none());
}

#[test]
fn interactive_session_cycles_through_shapes() {
    let mut s = studio(2);

    for faces in [6u32, 15, 20, 72, 3] {
        s.request_face_count(faces, None);
        let mut settled = false;
        for _ in 0..600 {
            let frame = s.tick(0.016);
            frame.mesh.validate().expect("frame mesh valid");
            assert_eq!(frame.edges, EdgeSet::from_mesh(&frame.mesh));
            if !frame.morphing {
                settled = true;
                break;
            }
        }
        assert!(settled, "request for {faces} faces never settled");
    }
}

#[test]
fn shuffle_changes_procedural_geometry() {
    let mut s = studio(3);
    s.request_face_count(37, None);
    s.tick(1e6);
    let before = s.current_mesh().positions.clone();

    s.randomize();
    s.tick(1e6);
    let after = s.current_mesh().positions.clone();

    assert_ne!(before, after, "shuffle kept the same geometry");
    assert_eq!(s.face_count(), 37);
}

#[test]
fn persisted_bundle_restores_the_same_shape() {
    let mut s = studio(4);
    s.request_face_count(53, None);
    s.tick(1e6);

    let saved_faces = s.face_count();
    let saved_json =
        serde_json::to_string(s.random_params().expect("procedural params")).expect("serialize");

    let loaded: RandomParams = serde_json::from_str(&saved_json).expect("deserialize");
    let restored = Studio::from_saved(StudioConfig::default(), saved_faces, Some(loaded));

    assert_eq!(restored.face_count(), saved_faces);
    assert_eq!(restored.current_mesh().positions, s.current_mesh().positions);
    assert_eq!(restored.current_mesh().indices, s.current_mesh().indices);
}

#[test]
fn show_mode_runs_unattended() {
    let mut s = studio(5);
    s.set_show_mode(true);

    for _ in 0..2000 {
        let frame = s.tick(0.016);
        frame.mesh.validate().expect("show frame valid");
    }
    // Show mode chains one morph after another, never going idle.
    assert!(s.is_morphing());

    s.set_show_mode(false);
    for _ in 0..2000 {
        if !s.tick(0.016).morphing {
            break;
        }
    }
    assert!(!s.is_morphing());
}

#[test]
fn sampling_an_assembled_platonic_keeps_its_corners() {
    let mut rng = StdRng::seed_from_u64(6);
    let mesh = assemble(12, 1.5, None, &mut rng).mesh;
    let cloud = sample_surface(&mesh, 12, &mut rng);

    assert!(cloud.len() >= PlatonicSolid::Dodecahedron.vertex_count() as usize);
    for p in &mesh.positions {
        let v = polystudio::Vec3::from_array(*p);
        assert!(cloud.iter().any(|q| q.distance(v) < 1e-9), "missing corner {v:?}");
    }
}

#[test]
fn meshes_expose_face_attributes_for_shading() {
    let mut rng = StdRng::seed_from_u64(7);
    for faces in [6u32, 41] {
        let mesh: PolyMesh = assemble(faces, 1.5, None, &mut rng).mesh;
        let centers = mesh.face_centers.as_ref().expect("face centers attached");
        let ids = mesh.face_ids.as_ref().expect("face ids attached");
        assert_eq!(centers.len(), mesh.vertex_count());
        assert_eq!(ids.len(), mesh.vertex_count());
        assert!(ids.iter().all(|&id| (id as usize) < mesh.triangle_count().max(1)));
    }
}
