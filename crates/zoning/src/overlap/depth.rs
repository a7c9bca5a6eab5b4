//! Depth-reduction: trims how far a flag propagates down each column based
//! on the depths of neighboring columns, borrowing edge columns from linked
//! neighbor blocks.

use crate::block::{BlockId, ZoneBlock, ZoneBlockStore};
use crate::grid::{ZoneTypeMeta, CELL_BLOCKED, CELL_OCCUPIED};
use crate::parcels::ParcelRegistry;

/// First row from the front at which `target` (or blocked) stops the column,
/// optionally also requiring the front cell's zone to continue unbroken.
fn column_depth(block: &ZoneBlock, col: usize, target: u16, zone_continuity: bool) -> usize {
    let front_zone = block.cell(col, 0).zone;
    for row in 0..block.depth() {
        let cell = block.cell(col, row);
        if cell.has(target | CELL_BLOCKED) {
            return row;
        }
        if zone_continuity && cell.zone != front_zone {
            return row;
        }
    }
    block.depth()
}

/// Depths of the two columns of a linked neighbor block that sit just past
/// one of our lateral edges, nearest first. `None` when the neighbor is
/// absent or younger than us (the local edge column stands in then); a
/// neighbor too narrow to supply the far column contributes depth zero.
fn borrowed_depths(
    store: &ZoneBlockStore,
    neighbor: Option<BlockId>,
    own_order: u32,
    nearest_col_from_far_edge: bool,
    target: u16,
    zone_continuity: bool,
) -> Option<[usize; 2]> {
    let neighbor = store.get(neighbor?)?;
    if neighbor.build_order >= own_order {
        return None;
    }
    let width = neighbor.width();
    let (near_col, far_col) = if nearest_col_from_far_edge {
        (width - 1, width.checked_sub(2))
    } else {
        (0, if width >= 2 { Some(1) } else { None })
    };
    let near = column_depth(neighbor, near_col, target, zone_continuity);
    let far = match far_col {
        Some(col) => column_depth(neighbor, col, target, zone_continuity),
        None => 0,
    };
    Some([near, far])
}

#[derive(Clone, Copy)]
enum Outward {
    Left,
    Right,
}

/// Runs depth-reduction for one block against its lateral neighbors.
///
/// Narrow parcels skip the neighbor-based trimming entirely; their valid
/// area is still committed when the target is the blocked flag so the final
/// footprint stays meaningful.
pub fn depth_reduce(
    store: &mut ZoneBlockStore,
    id: BlockId,
    left: Option<BlockId>,
    right: Option<BlockId>,
    target: u16,
    registry: &ParcelRegistry,
    zone_meta: Option<&ZoneTypeMeta>,
) {
    if registry.is_narrow_parcel(id) {
        if target == CELL_BLOCKED {
            if let Some(block) = store.get_mut(id) {
                let bounds = block.unblocked_bounds();
                block.valid = block.valid.intersect(&bounds);
            }
        }
        return;
    }

    let zone_continuity = target == CELL_OCCUPIED;
    let (own_order, width) = match store.get(id) {
        Some(block) => (block.build_order, block.width()),
        None => return,
    };
    let left_borrow = borrowed_depths(store, left, own_order, true, target, zone_continuity);
    let right_borrow = borrowed_depths(store, right, own_order, false, target, zone_continuity);

    let Some(block) = store.get_mut(id) else {
        return;
    };

    for i in 0..width.div_ceil(2) {
        reduce_column(block, i, Outward::Left, left_borrow, target, zone_meta);
        let mirror = width - 1 - i;
        if mirror != i {
            reduce_column(block, mirror, Outward::Right, right_borrow, target, zone_meta);
        }
    }

    if target == CELL_BLOCKED {
        let bounds = block.unblocked_bounds();
        block.valid = block.valid.intersect(&bounds);
    }
}

fn reduce_column(
    block: &mut ZoneBlock,
    col: usize,
    outward: Outward,
    borrow: Option<[usize; 2]>,
    target: u16,
    zone_meta: Option<&ZoneTypeMeta>,
) {
    let zone_continuity = target == CELL_OCCUPIED;
    if let Some(meta) = zone_meta {
        // Narrow-capable zones keep their full occupancy depth.
        if meta.supports_narrow_lots(block.cell(col, 0).zone) {
            return;
        }
    }

    let width = block.width();
    let in_block = |offset: usize| -> Option<usize> {
        match outward {
            Outward::Left => col.checked_sub(offset),
            Outward::Right => {
                let idx = col + offset;
                (idx < width).then_some(idx)
            }
        }
    };

    let depth_at = |block: &ZoneBlock, c: usize| column_depth(block, c, target, zone_continuity);

    let near = match in_block(1) {
        Some(c) => Some(depth_at(block, c)),
        None => borrow.map(|b| b[0]),
    };
    let far = match in_block(2) {
        Some(c) => Some(depth_at(block, c)),
        None => match in_block(1) {
            // One step still inside: the far column is the neighbor's
            // nearest.
            Some(_) => borrow.map(|b| b[0]),
            None => borrow.map(|b| b[1]),
        },
    };

    // No neighbor on this side contributes: the column keeps its own depth.
    let Some(near) = near else {
        return;
    };
    let far = far.unwrap_or(near);

    let current = depth_at(block, col);
    let adopted = if near != far && near != 0 {
        near
    } else {
        let near_delta = (near as isize - current as isize).abs();
        let far_delta = (far as isize - current as isize).abs();
        if near_delta <= far_delta {
            near
        } else {
            far
        }
    };
    let new_depth = current.min(adopted);

    for row in new_depth..block.depth() {
        let cell = block.cell_mut(col, row);
        if cell.has(target) {
            break;
        }
        cell.set(target);
    }
}
