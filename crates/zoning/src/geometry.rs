//! Convex overlap tests for footprint quads, obstruction strips, and area
//! triangles. All shapes are flat world-space polygons over `Vec2`.

use bevy::prelude::*;

use crate::config::GEOM_EPS;

/// A convex quadrilateral, corners in winding order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [Vec2; 4],
}

impl Quad {
    pub fn new(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Self {
        Self {
            corners: [a, b, c, d],
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.corners[0] + self.corners[1] + self.corners[2] + self.corners[3]) * 0.25
    }

    pub fn aabb(&self) -> (Vec2, Vec2) {
        let mut min = self.corners[0];
        let mut max = self.corners[0];
        for corner in &self.corners[1..] {
            min = min.min(*corner);
            max = max.max(*corner);
        }
        (min, max)
    }

    /// Separating-axis overlap test against another convex quad. Shapes that
    /// only touch along a shared edge do not count as overlapping.
    pub fn intersects(&self, other: &Quad) -> bool {
        convex_overlap(&self.corners, &other.corners)
    }

    pub fn intersects_triangle(&self, tri: &[Vec2; 3]) -> bool {
        convex_overlap(&self.corners, tri)
    }

    /// Whether a disc overlaps this quad.
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        // Separating axis over the quad's edge normals plus the axis from
        // the nearest corner to the circle center.
        let mut axes: [Vec2; 5] = [Vec2::ZERO; 5];
        for i in 0..4 {
            let edge = self.corners[(i + 1) % 4] - self.corners[i];
            axes[i] = edge.perp();
        }
        let mut nearest = self.corners[0];
        let mut best = f32::MAX;
        for corner in &self.corners {
            let d = corner.distance_squared(center);
            if d < best {
                best = d;
                nearest = *corner;
            }
        }
        axes[4] = center - nearest;

        for axis in axes {
            let len = axis.length();
            if len <= f32::EPSILON {
                continue;
            }
            let axis = axis / len;
            let (min_q, max_q) = project(&self.corners, axis);
            let c = center.dot(axis);
            if max_q <= c - radius + GEOM_EPS || c + radius <= min_q + GEOM_EPS {
                return false;
            }
        }
        true
    }
}

fn project(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for p in points {
        let d = p.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

/// Separating-axis test between two convex polygons.
fn convex_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    for (poly, other) in [(a, b), (b, a)] {
        for i in 0..poly.len() {
            let edge = poly[(i + 1) % poly.len()] - poly[i];
            let axis = edge.perp();
            let len = axis.length();
            if len <= f32::EPSILON {
                continue;
            }
            let axis = axis / len;
            let (min_a, max_a) = project(poly, axis);
            let (min_b, max_b) = project(other, axis);
            if max_a <= min_b + GEOM_EPS || max_b <= min_a + GEOM_EPS {
                return false;
            }
        }
    }
    true
}
