//! # Beam Profiles
//!
//! Flat outlines of the four frame beams in beam-local coordinates, centered
//! on the origin. Each outline is a trapezoid: the long edge lies on the
//! outside of the frame, both ends are cut at 45 degrees so that adjacent
//! beams meet on the frame diagonal.
//!
//! Every beam carries one pair of round fastener holes per end, on its
//! centerline.

use framecut_core::{
    BeamName, Orientation, HOLE_EDGE_OFFSET_FACTOR, HOLE_RADIUS_FACTOR, HOLE_SPACING_FACTOR,
};
use lyon::math::point;
use lyon::path::Path;
use nalgebra::{Point2, Vector2};
use std::f64::consts::TAU;

/// Segments used to approximate a hole circle
pub const HOLE_SEGMENTS: usize = 24;

/// A round through-hole in beam-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perforation {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Perforation {
    /// Clockwise polygon approximating the hole
    pub fn polygon(&self, segments: usize) -> Vec<Point2<f64>> {
        (0..segments)
            .map(|i| {
                let angle = -TAU * i as f64 / segments as f64;
                self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
            })
            .collect()
    }
}

/// Hole placement rules for a given beam thickness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileLayout {
    pub thickness: f64,
}

impl ProfileLayout {
    pub fn new(thickness: f64) -> Self {
        Self { thickness }
    }

    /// Distance from a beam end to the centre of its hole pair
    pub fn edge_offset(&self) -> f64 {
        HOLE_EDGE_OFFSET_FACTOR * self.thickness
    }

    pub fn hole_radius(&self) -> f64 {
        HOLE_RADIUS_FACTOR * self.thickness
    }

    pub fn hole_spacing(&self) -> f64 {
        HOLE_SPACING_FACTOR * self.thickness
    }

    /// Hole centres along the long axis, measured from the beam centre, ascending
    pub fn hole_offsets(&self, length: f64) -> [f64; 4] {
        let pair = length / 2.0 - self.edge_offset();
        let half = self.hole_spacing() / 2.0;
        [-pair - half, -pair + half, pair - half, pair + half]
    }

    pub fn perforations(&self, beam: BeamName, length: f64) -> Vec<Perforation> {
        self.hole_offsets(length)
            .into_iter()
            .map(|offset| Perforation {
                center: match beam.orientation() {
                    Orientation::Horizontal => Point2::new(offset, 0.0),
                    Orientation::Vertical => Point2::new(0.0, offset),
                },
                radius: self.hole_radius(),
            })
            .collect()
    }
}

/// Counter-clockwise outer outline of a beam of the given length
pub fn beam_outline(beam: BeamName, length: f64, thickness: f64) -> [Point2<f64>; 4] {
    let l = length / 2.0;
    let t = thickness / 2.0;
    let inner = l - thickness;
    match beam {
        BeamName::Top => [
            Point2::new(-l, t),
            Point2::new(-inner, -t),
            Point2::new(inner, -t),
            Point2::new(l, t),
        ],
        BeamName::Bottom => [
            Point2::new(-l, -t),
            Point2::new(l, -t),
            Point2::new(inner, t),
            Point2::new(-inner, t),
        ],
        BeamName::Left => [
            Point2::new(-t, -l),
            Point2::new(t, -inner),
            Point2::new(t, inner),
            Point2::new(-t, l),
        ],
        BeamName::Right => [
            Point2::new(t, -l),
            Point2::new(t, l),
            Point2::new(-t, inner),
            Point2::new(-t, -inner),
        ],
    }
}

/// A beam outline with its holes
#[derive(Debug, Clone, PartialEq)]
pub struct BeamProfile {
    pub beam: BeamName,
    pub outline: Vec<Point2<f64>>,
    pub holes: Vec<Perforation>,
}

impl BeamProfile {
    pub fn new(beam: BeamName, length: f64, thickness: f64) -> Self {
        Self {
            beam,
            outline: beam_outline(beam, length, thickness).to_vec(),
            holes: ProfileLayout::new(thickness).perforations(beam, length),
        }
    }

    /// Outline first, then every hole polygon; all closed
    pub fn contours(&self) -> Vec<Vec<Point2<f64>>> {
        std::iter::once(self.outline.clone())
            .chain(self.holes.iter().map(|h| h.polygon(HOLE_SEGMENTS)))
            .collect()
    }

    /// Lyon path of every contour, for even-odd filling
    pub fn to_path(&self) -> Path {
        let mut builder = Path::builder();
        for contour in self.contours() {
            let mut iter = contour.iter();
            let Some(first) = iter.next() else { continue };
            builder.begin(point(first.x as f32, first.y as f32));
            for p in iter {
                builder.line_to(point(p.x as f32, p.y as f32));
            }
            builder.end(true);
        }
        builder.build()
    }

    /// Angles (degrees) between each end cut and the long axis
    pub fn end_cut_angles(&self) -> Vec<f64> {
        let axis = match self.beam.orientation() {
            Orientation::Horizontal => Vector2::x(),
            Orientation::Vertical => Vector2::y(),
        };
        let n = self.outline.len();
        (0..n)
            .filter_map(|i| {
                let edge = self.outline[(i + 1) % n] - self.outline[i];
                let along = edge.dot(&axis).abs();
                let across = edge.perp(&axis).abs();
                (across > 1e-9).then(|| across.atan2(along).to_degrees())
            })
            .collect()
    }
}

/// Signed area of a closed polygon; positive when counter-clockwise
pub fn signed_area(polygon: &[Point2<f64>]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}
