use framecut_core::BeamName;
use framecut_designer::profile::signed_area;
use framecut_designer::{build_frame, Beam};
use nalgebra::Point2;
use proptest::prelude::*;

fn beam(beams: &[Beam; 4], name: BeamName) -> &Beam {
    beams.iter().find(|b| b.name == name).unwrap()
}

fn shares_point(a: &[Point2<f64>], p: Point2<f64>) -> bool {
    a.iter().any(|q| (q - p).norm() < 1e-9)
}

fn distance_to_segment(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let t = ((p - a).dot(&ab) / ab.norm_squared()).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

#[test]
fn test_adjacent_beams_meet_on_the_diagonal() {
    let (w, h, t) = (523.0, 400.0, 22.0);
    let beams = build_frame(w, h, t).unwrap();

    let corners = [
        (BeamName::Top, BeamName::Right, 1.0, 1.0),
        (BeamName::Right, BeamName::Bottom, 1.0, -1.0),
        (BeamName::Bottom, BeamName::Left, -1.0, -1.0),
        (BeamName::Left, BeamName::Top, -1.0, 1.0),
    ];
    for (a, b, sx, sy) in corners {
        let outer = Point2::new(sx * w / 2.0, sy * h / 2.0);
        let inner = Point2::new(sx * (w / 2.0 - t), sy * (h / 2.0 - t));
        for name in [a, b] {
            let outline = beam(&beams, name).world_outline();
            assert!(shares_point(&outline, outer), "{name} misses {outer}");
            assert!(shares_point(&outline, inner), "{name} misses {inner}");
        }
    }
}

#[test]
fn test_beams_tile_the_frame_ring() {
    let (w, h, t) = (800.0, 1200.0, 40.0);
    let beams = build_frame(w, h, t).unwrap();
    let total: f64 = beams
        .iter()
        .map(|b| signed_area(&b.world_outline()))
        .sum();
    let ring = w * h - (w - 2.0 * t) * (h - 2.0 * t);
    assert!((total - ring).abs() < 1e-6);
}

#[test]
fn test_holes_clear_the_miters() {
    let beams = build_frame(523.0, 400.0, 22.0).unwrap();
    for beam in &beams {
        let outline = &beam.profile.outline;
        assert_eq!(beam.holes().len(), 4);
        for hole in beam.holes() {
            let n = outline.len();
            let clearance = (0..n)
                .map(|i| distance_to_segment(hole.center, outline[i], outline[(i + 1) % n]))
                .fold(f64::INFINITY, f64::min);
            assert!(
                clearance > hole.radius,
                "{} hole at {} is {} from the outline",
                beam.name,
                hole.center,
                clearance
            );
        }
    }
}

#[test]
fn test_rebuild_is_deterministic() {
    let first = build_frame(640.0, 480.0, 18.0).unwrap();
    let second = build_frame(640.0, 480.0, 18.0).unwrap();
    assert_eq!(first, second);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_frame_fills_its_bounds(
        t in 5.0f64..60.0,
        w_extra in 1.0f64..2000.0,
        h_extra in 1.0f64..2000.0,
    ) {
        let w = 4.1 * t + w_extra;
        let h = 4.1 * t + h_extra;
        let beams = build_frame(w, h, t).unwrap();

        for beam in &beams {
            prop_assert_eq!(beam.holes().len(), 4);
            for angle in beam.profile.end_cut_angles() {
                prop_assert!((angle - 45.0).abs() < 1e-6);
            }
        }

        let world: Vec<_> = beams.iter().map(|b| b.world_mesh()).collect();
        let min_x = world.iter().map(|m| m.bounds_min.x).fold(f32::INFINITY, f32::min) as f64;
        let max_y = world.iter().map(|m| m.bounds_max.y).fold(f32::NEG_INFINITY, f32::max) as f64;
        let max_z = world.iter().map(|m| m.bounds_max.z).fold(f32::NEG_INFINITY, f32::max) as f64;
        let tolerance = 1e-4 * w.max(h);
        prop_assert!((min_x + w / 2.0).abs() < tolerance);
        prop_assert!((max_y - h / 2.0).abs() < tolerance);
        prop_assert!((max_z - t / 2.0).abs() < tolerance);
    }
}
