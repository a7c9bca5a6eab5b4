//! Area-obstruction pass: triangulated protected/physical areas against a
//! block footprint.

use crate::block::ZoneBlock;
use crate::grid::CELL_BLOCKED;

use super::bisect_cells;
use super::types::AreaObstructionIndex;

/// Marks cells of `block` covered by blocking area triangles.
pub fn scan_area_triangles(block: &mut ZoneBlock, index: &AreaObstructionIndex) {
    let (min, max) = block.world_aabb();
    let footprint = block.footprint_quad();
    let frame = block.frame;
    let cols = (block.valid.x_min, block.valid.x_max);
    let rows = (block.valid.z_min, block.valid.z_max);

    for record in index.query_rect(min, max) {
        let tri = index.triangles[record as usize];
        if !tri.blocks_zoning() {
            continue;
        }
        let corners = tri.corners();
        if !footprint.intersects_triangle(&corners) {
            continue;
        }

        let mut touched: Vec<(usize, usize)> = Vec::new();
        bisect_cells(
            &frame,
            cols,
            rows,
            &|quad| quad.intersects_triangle(&corners),
            &mut |col, row| touched.push((col, row)),
        );
        for (col, row) in touched {
            block.cell_mut(col, row).set(CELL_BLOCKED);
        }
    }
}
