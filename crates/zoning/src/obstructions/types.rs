//! Obstruction geometry records and the spatial indices that serve them.
//!
//! Both indices are uniform bucket grids over the zoning world, queryable by
//! axis-aligned bounds. Collaborators populate them; the scanner only reads.

use bevy::prelude::*;

use crate::config::{BUCKET_SIZE, WORLD_EXTENT, WORLD_HALF_EXTENT};
use crate::geometry::Quad;

const BUCKETS_PER_AXIS: usize = (WORLD_EXTENT / BUCKET_SIZE) as usize + 1;
const TOTAL_BUCKETS: usize = BUCKETS_PER_AXIS * BUCKETS_PER_AXIS;

// =============================================================================
// Linear obstructions (network edges)
// =============================================================================

/// Composition flags for a network edge.
pub const EDGE_BLOCKS_ZONING: u16 = 0b00_0001;
pub const EDGE_TUNNEL: u16 = 0b00_0010;
pub const EDGE_ELEVATED: u16 = 0b00_0100;
pub const EDGE_EXCLUSIVE: u16 = 0b00_1000;
pub const EDGE_ZONING_LEFT: u16 = 0b01_0000;
pub const EDGE_ZONING_RIGHT: u16 = 0b10_0000;

/// Region around an edge's owning object inside which road-adjacency flags
/// are not applied, so circular objects don't claim rectangular frontage.
#[derive(Debug, Clone, Copy)]
pub enum IgnoreZone {
    Circle { center: Vec2, radius: f32 },
    Quad(Quad),
}

impl IgnoreZone {
    pub fn overlaps(&self, cell: &Quad) -> bool {
        match self {
            IgnoreZone::Circle { center, radius } => cell.intersects_circle(*center, *radius),
            IgnoreZone::Quad(quad) => cell.intersects(quad),
        }
    }
}

/// A linear obstruction: one network edge as a cubic Bezier swept to a
/// half-width strip.
#[derive(Debug, Clone)]
pub struct NetEdge {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
    pub half_width: f32,
    /// World-space clearance under an elevated edge.
    pub elevation: f32,
    pub flags: u16,
    pub ignore: Option<IgnoreZone>,
}

impl NetEdge {
    pub fn straight(from: Vec2, to: Vec2, half_width: f32, flags: u16) -> Self {
        let p1 = from + (to - from) / 3.0;
        let p2 = from + (to - from) * 2.0 / 3.0;
        Self {
            p0: from,
            p1,
            p2,
            p3: to,
            half_width,
            elevation: 0.0,
            flags,
            ignore: None,
        }
    }

    #[inline]
    pub fn has(&self, flags: u16) -> bool {
        self.flags & flags != 0
    }

    /// Evaluate the cubic Bezier at parameter t in [0, 1].
    pub fn evaluate(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let uu = u * u;
        let tt = t * t;
        u * uu * self.p0 + 3.0 * uu * t * self.p1 + 3.0 * u * tt * self.p2 + t * tt * self.p3
    }

    /// Tangent (first derivative) at parameter t.
    pub fn tangent(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        3.0 * u * u * (self.p1 - self.p0)
            + 6.0 * u * t * (self.p2 - self.p1)
            + 3.0 * t * t * (self.p3 - self.p2)
    }

    /// Quad strip covering the curve between t0 and t1 at this edge's half
    /// width.
    pub fn strip_quad(&self, t0: f32, t1: f32) -> Quad {
        let a = self.evaluate(t0);
        let b = self.evaluate(t1);
        let na = self.tangent(t0).perp().normalize_or_zero() * self.half_width;
        let nb = self.tangent(t1).perp().normalize_or_zero() * self.half_width;
        Quad::new(a - na, b - nb, b + nb, a + na)
    }

    /// Conservative bounds: the control-point hull expanded by half width.
    pub fn aabb(&self) -> (Vec2, Vec2) {
        let pad = Vec2::splat(self.half_width);
        let min = self.p0.min(self.p1).min(self.p2).min(self.p3) - pad;
        let max = self.p0.max(self.p1).max(self.p2).max(self.p3) + pad;
        (min, max)
    }
}

// =============================================================================
// Area obstructions (triangulated polygons)
// =============================================================================

pub const AREA_PHYSICAL: u16 = 0b001;
pub const AREA_PROTECTED: u16 = 0b010;
pub const AREA_BLOCKS_ZONING: u16 = 0b100;

/// One triangle of an area obstruction's triangulation.
#[derive(Debug, Clone, Copy)]
pub struct AreaTriangle {
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
    pub flags: u16,
}

impl AreaTriangle {
    pub fn new(a: Vec2, b: Vec2, c: Vec2, flags: u16) -> Self {
        Self { a, b, c, flags }
    }

    #[inline]
    pub fn has(&self, flags: u16) -> bool {
        self.flags & flags != 0
    }

    /// Physical geometry always blocks; protected areas block only when they
    /// carry the explicit zoning marker.
    pub fn blocks_zoning(&self) -> bool {
        self.has(AREA_PHYSICAL) || (self.has(AREA_PROTECTED) && self.has(AREA_BLOCKS_ZONING))
    }

    pub fn corners(&self) -> [Vec2; 3] {
        [self.a, self.b, self.c]
    }

    pub fn aabb(&self) -> (Vec2, Vec2) {
        (self.a.min(self.b).min(self.c), self.a.max(self.b).max(self.c))
    }
}

// =============================================================================
// Bucket indices
// =============================================================================

fn flat_index(bx: i32, by: i32) -> Option<usize> {
    if bx >= 0 && by >= 0 && (bx as usize) < BUCKETS_PER_AXIS && (by as usize) < BUCKETS_PER_AXIS {
        Some(by as usize * BUCKETS_PER_AXIS + bx as usize)
    } else {
        None
    }
}

fn bucket_coord(v: f32) -> i32 {
    ((v + WORLD_HALF_EXTENT) / BUCKET_SIZE).floor() as i32
}

fn insert_bounds(buckets: &mut [Vec<u32>], record: u32, min: Vec2, max: Vec2) {
    let min_bx = bucket_coord(min.x);
    let min_by = bucket_coord(min.y);
    let max_bx = bucket_coord(max.x);
    let max_by = bucket_coord(max.y);
    for by in min_by..=max_by {
        for bx in min_bx..=max_bx {
            if let Some(idx) = flat_index(bx, by) {
                buckets[idx].push(record);
            }
        }
    }
}

fn query_bounds(buckets: &[Vec<u32>], min: Vec2, max: Vec2) -> Vec<u32> {
    let min_bx = bucket_coord(min.x);
    let min_by = bucket_coord(min.y);
    let max_bx = bucket_coord(max.x);
    let max_by = bucket_coord(max.y);
    let mut result = Vec::new();
    for by in min_by..=max_by {
        for bx in min_bx..=max_bx {
            if let Some(idx) = flat_index(bx, by) {
                result.extend_from_slice(&buckets[idx]);
            }
        }
    }
    result.sort_unstable();
    result.dedup();
    result
}

#[derive(Resource)]
pub struct NetObstructionIndex {
    pub edges: Vec<NetEdge>,
    buckets: Vec<Vec<u32>>,
}

impl Default for NetObstructionIndex {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            buckets: (0..TOTAL_BUCKETS).map(|_| Vec::new()).collect(),
        }
    }
}

impl NetObstructionIndex {
    pub fn insert(&mut self, edge: NetEdge) {
        let record = self.edges.len() as u32;
        let (min, max) = edge.aabb();
        insert_bounds(&mut self.buckets, record, min, max);
        self.edges.push(edge);
    }

    pub fn query_rect(&self, min: Vec2, max: Vec2) -> Vec<u32> {
        query_bounds(&self.buckets, min, max)
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}

#[derive(Resource)]
pub struct AreaObstructionIndex {
    pub triangles: Vec<AreaTriangle>,
    buckets: Vec<Vec<u32>>,
}

impl Default for AreaObstructionIndex {
    fn default() -> Self {
        Self {
            triangles: Vec::new(),
            buckets: (0..TOTAL_BUCKETS).map(|_| Vec::new()).collect(),
        }
    }
}

impl AreaObstructionIndex {
    pub fn insert(&mut self, tri: AreaTriangle) {
        let record = self.triangles.len() as u32;
        let (min, max) = tri.aabb();
        insert_bounds(&mut self.buckets, record, min, max);
        self.triangles.push(tri);
    }

    pub fn query_rect(&self, min: Vec2, max: Vec2) -> Vec<u32> {
        query_bounds(&self.buckets, min, max)
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}
