use framecut_core::{BeamName, PartId};
use framecut_designer::{
    build_frame, scale_reference, DerivedModel, Mesh3D, PartNameMap, ReferenceDimensions,
    ReferenceModel,
};
use nalgebra::Point3;
use proptest::prelude::*;

const T: f64 = 22.0;

fn reference() -> (ReferenceModel, ReferenceDimensions) {
    let beams = build_frame(523.0, 400.0, T).unwrap();
    (
        ReferenceModel::from_beams(&beams),
        ReferenceDimensions::new(523.0, 400.0, T),
    )
}

fn fit(width: f64, height: f64, depth: f64) -> DerivedModel {
    let (model, dims) = reference();
    scale_reference(&model, &dims, &PartNameMap::default(), width, height, depth).unwrap()
}

fn contains_point(mesh: &Mesh3D, p: Point3<f32>, tolerance: f32) -> bool {
    mesh.positions.iter().any(|q| (q - p).norm() < tolerance)
}

#[test]
fn test_scaled_frame_matches_procedural_frame() {
    let (w, h) = (900.0, 650.0);
    let derived = fit(w, h, T);
    let procedural = build_frame(w, h, T).unwrap();

    for beam in &procedural {
        let part = derived.part(&PartId::Beam(beam.name)).unwrap();
        let scaled = part.world_mesh();
        let built = beam.world_mesh();
        for p in &built.positions {
            assert!(
                contains_point(&scaled, *p, 1e-2),
                "{} lost vertex {}",
                beam.name,
                p
            );
        }
        for p in &scaled.positions {
            assert!(
                contains_point(&built, *p, 1e-2),
                "{} gained vertex {}",
                beam.name,
                p
            );
        }
    }
}

#[test]
fn test_shrinking_keeps_corners_rigid() {
    let (w, h) = (150.0, 120.0);
    let derived = fit(w, h, T);
    let t = T as f32;
    let (hw, hh) = (w as f32 / 2.0, h as f32 / 2.0);

    let top = derived.part(&PartId::Beam(BeamName::Top)).unwrap().world_mesh();
    for corner in [
        Point3::new(hw, hh, t / 2.0),
        Point3::new(-hw, hh, t / 2.0),
        Point3::new(hw - t, hh - t, t / 2.0),
        Point3::new(-hw + t, hh - t, -t / 2.0),
    ] {
        assert!(contains_point(&top, corner, 1e-2), "missing {corner}");
    }

    let left = derived.part(&PartId::Beam(BeamName::Left)).unwrap().world_mesh();
    assert!(contains_point(&left, Point3::new(-hw, -hh, t / 2.0), 1e-2));
    assert!(contains_point(&left, Point3::new(-hw + t, -hh + t, t / 2.0), 1e-2));
}

#[test]
fn test_same_dimensions_round_trip() {
    let (model, _) = reference();
    let derived = fit(523.0, 400.0, T);
    for part in model.parts() {
        let id = PartId::parse(&part.name);
        let scaled = derived.part(&id).unwrap();
        assert!((scaled.position - part.position).norm() < 1e-3);
        for (a, b) in scaled.mesh.positions.iter().zip(&part.mesh.positions) {
            assert!((a - b).norm() < 1e-3);
        }
    }
}

#[test]
fn test_depth_scales_uniformly() {
    let derived = fit(600.0, 400.0, 2.0 * T);
    let (min, max) = derived.bounds();
    assert!(((max.z - min.z) as f64 - 2.0 * T).abs() < 1e-3);
    // the short in-plane axis keeps the reference thickness
    let top = derived.part(&PartId::Beam(BeamName::Top)).unwrap();
    assert!((top.mesh.size().y as f64 - T).abs() < 1e-3);
}

#[test]
fn test_ordered_ids_follow_priority() {
    let derived = fit(600.0, 400.0, T);
    let names: Vec<String> = derived.ordered_ids().iter().map(|p| p.to_string()).collect();
    assert_eq!(names, vec!["TOP", "LEFT", "BOTTOM", "RIGHT"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_bounds_match_target(
        w in 100.0f64..3000.0,
        h in 100.0f64..3000.0,
        d in 5.0f64..80.0,
    ) {
        let derived = fit(w, h, d);
        let (min, max) = derived.bounds();
        let tolerance = 1e-4 * w.max(h).max(d) + 1e-3;
        prop_assert!(((max.x - min.x) as f64 - w).abs() < tolerance);
        prop_assert!(((max.y - min.y) as f64 - h).abs() < tolerance);
        prop_assert!(((max.z - min.z) as f64 - d).abs() < tolerance);
        prop_assert!((min.x as f64 + w / 2.0).abs() < tolerance);
        prop_assert!((min.y as f64 + h / 2.0).abs() < tolerance);
    }

    #[test]
    fn prop_scaling_is_idempotent(w in 200.0f64..1500.0, h in 200.0f64..1500.0) {
        let (model, dims) = reference();
        let names = PartNameMap::default();
        let once = scale_reference(&model, &dims, &names, w, h, T).unwrap();
        let _other = scale_reference(&model, &dims, &names, h, w, T).unwrap();
        let twice = scale_reference(&model, &dims, &names, w, h, T).unwrap();
        prop_assert_eq!(once, twice);
    }
}
