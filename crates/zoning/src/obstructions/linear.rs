//! Linear-obstruction pass: network edges against a block footprint.

use crate::block::ZoneBlock;
use crate::config::CURVE_CUTS;
use crate::grid::{CELL_BLOCKED, CELL_ROAD_LEFT, CELL_ROAD_RIGHT};

use super::bisect_cells;
use super::types::{
    NetEdge, NetObstructionIndex, EDGE_BLOCKS_ZONING, EDGE_ELEVATED, EDGE_EXCLUSIVE, EDGE_TUNNEL,
    EDGE_ZONING_LEFT, EDGE_ZONING_RIGHT,
};

/// Marks cells of `block` covered by zoning-blocking network edges.
///
/// Tunneled and non-blocking edges are rejected outright. Elevated,
/// non-exclusive edges only clamp the buildable height of covered cells —
/// they never set or clear the blocked flag. Everything else blocks, and
/// zoning-enabled road edges facing the block additionally tag road
/// adjacency unless the edge's ignore zone covers the cell.
pub fn scan_net_edges(block: &mut ZoneBlock, index: &NetObstructionIndex) {
    let (min, max) = block.world_aabb();
    let footprint = block.footprint_quad();
    for record in index.query_rect(min, max) {
        let edge = &index.edges[record as usize];
        if edge.has(EDGE_TUNNEL) || !edge.has(EDGE_BLOCKS_ZONING) {
            continue;
        }
        let clamp_only = edge.has(EDGE_ELEVATED) && !edge.has(EDGE_EXCLUSIVE);
        for cut in 0..CURVE_CUTS {
            let t0 = cut as f32 / CURVE_CUTS as f32;
            let t1 = (cut + 1) as f32 / CURVE_CUTS as f32;
            let strip = edge.strip_quad(t0, t1);
            if !strip.intersects(&footprint) {
                continue;
            }
            apply_strip(block, edge, t0, t1, clamp_only);
        }
    }
}

fn apply_strip(block: &mut ZoneBlock, edge: &NetEdge, t0: f32, t1: f32, clamp_only: bool) {
    let frame = block.frame;
    let strip = edge.strip_quad(t0, t1);
    let strip_center = strip.center();
    let tangent = edge.tangent((t0 + t1) * 0.5);
    let cols = (block.valid.x_min, block.valid.x_max);
    let rows = (block.valid.z_min, block.valid.z_max);

    let mut touched: Vec<(usize, usize)> = Vec::new();
    bisect_cells(
        &frame,
        cols,
        rows,
        &|quad| strip.intersects(quad),
        &mut |col, row| touched.push((col, row)),
    );

    for (col, row) in touched {
        if clamp_only {
            let elevation = edge.elevation;
            let cell = block.cell_mut(col, row);
            cell.height = cell.height.min(elevation);
            continue;
        }

        let cell_center = frame.cell_center(col, row);
        // Which side of the edge the cell lies on decides whether the
        // edge's zoning-enabled side faces the block at all.
        let side = tangent.perp_dot(cell_center - strip_center);
        let faces_block = if side > 0.0 {
            edge.has(EDGE_ZONING_LEFT)
        } else {
            edge.has(EDGE_ZONING_RIGHT)
        };
        let exempt = match &edge.ignore {
            Some(zone) => zone.overlaps(&frame.cell_quad(col, row)),
            None => false,
        };

        let to_road = strip_center - cell_center;
        let road_on_left = frame.direction.perp_dot(to_road) > 0.0;

        let cell = block.cell_mut(col, row);
        cell.set(CELL_BLOCKED);
        if faces_block && !exempt {
            if road_on_left {
                cell.set(CELL_ROAD_LEFT);
            } else {
                cell.set(CELL_ROAD_RIGHT);
            }
        }
    }
}
