//! Outline geometry and toroidal-space helpers.
//!
//! Every entity carries an [`Outline`]: one or more point rings in local
//! space. For hit-testing the rings are rotated by the entity's heading and
//! translated to its position. Two entities collide when any closed ring of
//! one overlaps any closed ring of the other.
//!
//! Rings with fewer than three points (line debris) have no area and never
//! collide, but are still drawn.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::WORLD_SIZE;

/// Wraps a single coordinate into `[0, WORLD_SIZE)`.
#[must_use]
pub fn wrap_coordinate(value: f32) -> f32 {
    let wrapped = value.rem_euclid(WORLD_SIZE);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= WORLD_SIZE {
        0.0
    } else {
        wrapped
    }
}

/// Wraps a position onto the torus.
#[must_use]
pub fn wrap(position: Vec2) -> Vec2 {
    Vec2::new(wrap_coordinate(position.x), wrap_coordinate(position.y))
}

/// Builds a velocity vector from a speed and a direction angle (radians).
#[must_use]
pub fn from_polar(speed: f32, direction: f32) -> Vec2 {
    Vec2::from_angle(direction) * speed
}

/// Normalizes an angle into `(-PI, PI]`.
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Collision and drawing outline in local entity space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    rings: Vec<Vec<Vec2>>,
}

impl Outline {
    /// An outline with nothing to draw or hit.
    #[must_use]
    pub fn empty() -> Self {
        Self { rings: Vec::new() }
    }

    /// A single ring built from `(x, y)` pairs.
    #[must_use]
    pub fn polygon(points: &[(f32, f32)]) -> Self {
        Self::empty().with_ring(points)
    }

    /// Adds another ring.
    #[must_use]
    pub fn with_ring(mut self, points: &[(f32, f32)]) -> Self {
        self.rings
            .push(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect());
        self
    }

    /// Returns a copy scaled uniformly about the local origin.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            rings: self
                .rings
                .iter()
                .map(|ring| ring.iter().map(|p| *p * factor).collect())
                .collect(),
        }
    }

    /// The local-space rings.
    #[must_use]
    pub fn rings(&self) -> &[Vec<Vec2>] {
        &self.rings
    }

    /// True when there are no rings at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(Vec::is_empty)
    }

    /// True when at least one ring encloses area and can therefore collide.
    #[must_use]
    pub fn is_solid(&self) -> bool {
        self.rings.iter().any(|ring| ring.len() >= 3)
    }

    /// Distance from the local origin to the farthest vertex.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.rings
            .iter()
            .flatten()
            .map(|p| p.length())
            .fold(0.0, f32::max)
    }

    /// Transforms the outline into world space.
    #[must_use]
    pub fn to_world(&self, position: Vec2, rotation: f32) -> Vec<Vec<Vec2>> {
        let turn = Vec2::from_angle(rotation);
        self.rings
            .iter()
            .map(|ring| ring.iter().map(|p| turn.rotate(*p) + position).collect())
            .collect()
    }
}

/// True when any closed ring of `a` overlaps any closed ring of `b`.
#[must_use]
pub fn rings_overlap(a: &[Vec<Vec2>], b: &[Vec<Vec2>]) -> bool {
    a.iter()
        .any(|ra| b.iter().any(|rb| polygons_overlap(ra, rb)))
}

/// Overlap test for two simple (possibly concave) polygons.
///
/// Polygons overlap when an edge of one crosses an edge of the other, or when
/// one lies entirely inside the other.
#[must_use]
pub fn polygons_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    for (a1, a2) in edges(a) {
        for (b1, b2) in edges(b) {
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    contains_point(a, b[0]) || contains_point(b, a[0])
}

/// Even-odd point-in-polygon test.
#[must_use]
pub fn contains_point(polygon: &[Vec2], point: Vec2) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    for (p, q) in edges(polygon) {
        if (p.y > point.y) != (q.y > point.y) {
            let x_cross = p.x + (point.y - p.y) / (q.y - p.y) * (q.x - p.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

fn edges(ring: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    ring.iter()
        .copied()
        .zip(ring.iter().copied().cycle().skip(1))
}

fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
