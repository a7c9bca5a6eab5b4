//! Pairwise cell arbitration between two overlapping blocks.
//!
//! Both blocks' footprints are recursively bisected until each side has
//! collapsed to a single cell; a priority rule then decides which cell wins
//! and the mode decides what happens to the loser.

use crate::block::{BlockId, ZoneBlock, ZoneBlockStore};
use crate::config::{CELL_SIZE, GEOM_EPS, LATTICE_EPS};
use crate::grid::{
    ZoneType, CELL_BLOCKED, CELL_OCCUPIED, CELL_OVERRIDDEN, CELL_REDUNDANT, CELL_SHARED,
    CELL_UPDATING, CELL_VISIBLE,
};
use crate::parcels::ParcelRegistry;

/// What a pairwise pass writes to losing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairMode {
    /// Phase 1: losers are marked redundant.
    Redundancy,
    /// Phase 2: losers are blocked; redundancy asymmetry joins the priority
    /// chain.
    Blocking,
    /// Phase 5: the winner copies its zoning onto the loser and marks it
    /// shared.
    Sharing,
}

/// One side of a cell-level priority decision.
struct PrioritySide {
    flags: u16,
    zone: ZoneType,
    /// Rows between this cell and its block's rear boundary.
    remaining_depth: usize,
    build_order: u32,
}

impl PrioritySide {
    fn of(block: &ZoneBlock, col: usize, row: usize) -> Self {
        let cell = block.cell(col, row);
        Self {
            flags: cell.flags,
            zone: cell.zone,
            remaining_depth: block.depth() - row,
            build_order: block.build_order,
        }
    }
}

/// Whether side `a` beats side `b`.
fn first_wins(a: &PrioritySide, b: &PrioritySide, mode: PairMode) -> bool {
    if mode == PairMode::Blocking {
        // A side still carrying a redundancy marker from the first phase
        // already lost once; the clean side wins.
        let a_red = a.flags & CELL_REDUNDANT != 0;
        let b_red = b.flags & CELL_REDUNDANT != 0;
        if a_red != b_red {
            return !a_red;
        }
    }

    let a_updating = a.flags & CELL_UPDATING != 0;
    let b_updating = b.flags & CELL_UPDATING != 0;
    if a_updating != b_updating {
        return a_updating;
    }

    if mode == PairMode::Blocking
        && a.zone == b.zone
        && (a.flags | b.flags) & CELL_OVERRIDDEN == 0
        && a.remaining_depth != b.remaining_depth
    {
        // Identically-zoned contenders: the side with more depth left to
        // fill yields to the one closer to its rear.
        return a.remaining_depth < b.remaining_depth;
    }

    let a_visible = a.flags & CELL_VISIBLE != 0;
    let b_visible = b.flags & CELL_VISIBLE != 0;
    if a_visible != b_visible {
        return a_visible;
    }

    a.build_order <= b.build_order
}

/// Whether two blocks' cell lattices coincide, making them eligible for the
/// cell-sharing pass (corner lots and the like).
pub fn can_share_cells(a: &ZoneBlock, b: &ZoneBlock) -> bool {
    let dot = a.frame.direction.dot(b.frame.direction);
    let cross = a.frame.direction.perp_dot(b.frame.direction);
    let parallel = dot.abs() > 1.0 - GEOM_EPS && cross.abs() < GEOM_EPS;
    let perpendicular = cross.abs() > 1.0 - GEOM_EPS && dot.abs() < GEOM_EPS;
    if !parallel && !perpendicular {
        return false;
    }

    let delta = b.frame.origin_corner() - a.frame.origin_corner();
    let lateral = delta.dot(a.frame.right()) / CELL_SIZE;
    let depth = delta.dot(a.frame.direction) / CELL_SIZE;
    let on_lattice = |v: f32| (v - v.round()).abs() < LATTICE_EPS;
    on_lattice(lateral) && on_lattice(depth)
}

/// Resolves every intersecting cell pair between two blocks of a group.
pub fn resolve_pair(
    store: &mut ZoneBlockStore,
    a_id: BlockId,
    b_id: BlockId,
    mode: PairMode,
    registry: &ParcelRegistry,
) {
    let a_parcel = registry.is_parcel(a_id);
    let b_parcel = registry.is_parcel(b_id);
    // Two parcels never influence each other's cells.
    if a_parcel && b_parcel {
        return;
    }
    let Some((a, b)) = store.pair_mut(a_id, b_id) else {
        return;
    };
    let a_cols = (a.valid.x_min, a.valid.x_max);
    let a_rows = (a.valid.z_min, a.valid.z_max);
    let b_cols = (b.valid.x_min, b.valid.x_max);
    let b_rows = (b.valid.z_min, b.valid.z_max);
    bisect_pair(
        a, b, a_cols, a_rows, b_cols, b_rows, mode, a_parcel, b_parcel,
    );
}

#[allow(clippy::too_many_arguments)]
fn bisect_pair(
    a: &mut ZoneBlock,
    b: &mut ZoneBlock,
    a_cols: (usize, usize),
    a_rows: (usize, usize),
    b_cols: (usize, usize),
    b_rows: (usize, usize),
    mode: PairMode,
    a_parcel: bool,
    b_parcel: bool,
) {
    if a_cols.0 >= a_cols.1 || a_rows.0 >= a_rows.1 || b_cols.0 >= b_cols.1 || b_rows.0 >= b_rows.1
    {
        return;
    }
    let quad_a = a.frame.range_quad(a_cols, a_rows);
    let quad_b = b.frame.range_quad(b_cols, b_rows);
    if !quad_a.intersects(&quad_b) {
        return;
    }

    if a_cols.1 - a_cols.0 > 1 {
        let mid = (a_cols.0 + a_cols.1) / 2;
        bisect_pair(
            a,
            b,
            (a_cols.0, mid),
            a_rows,
            b_cols,
            b_rows,
            mode,
            a_parcel,
            b_parcel,
        );
        bisect_pair(
            a,
            b,
            (mid, a_cols.1),
            a_rows,
            b_cols,
            b_rows,
            mode,
            a_parcel,
            b_parcel,
        );
    } else if b_cols.1 - b_cols.0 > 1 {
        let mid = (b_cols.0 + b_cols.1) / 2;
        bisect_pair(
            a,
            b,
            a_cols,
            a_rows,
            (b_cols.0, mid),
            b_rows,
            mode,
            a_parcel,
            b_parcel,
        );
        bisect_pair(
            a,
            b,
            a_cols,
            a_rows,
            (mid, b_cols.1),
            b_rows,
            mode,
            a_parcel,
            b_parcel,
        );
    } else if a_rows.1 - a_rows.0 > 1 {
        let mid = (a_rows.0 + a_rows.1) / 2;
        bisect_pair(
            a,
            b,
            a_cols,
            (a_rows.0, mid),
            b_cols,
            b_rows,
            mode,
            a_parcel,
            b_parcel,
        );
        bisect_pair(
            a,
            b,
            a_cols,
            (mid, a_rows.1),
            b_cols,
            b_rows,
            mode,
            a_parcel,
            b_parcel,
        );
    } else if b_rows.1 - b_rows.0 > 1 {
        let mid = (b_rows.0 + b_rows.1) / 2;
        bisect_pair(
            a,
            b,
            a_cols,
            a_rows,
            b_cols,
            (b_rows.0, mid),
            mode,
            a_parcel,
            b_parcel,
        );
        bisect_pair(
            a,
            b,
            a_cols,
            a_rows,
            b_cols,
            (mid, b_rows.1),
            mode,
            a_parcel,
            b_parcel,
        );
    } else {
        resolve_cells(
            a,
            b,
            (a_cols.0, a_rows.0),
            (b_cols.0, b_rows.0),
            mode,
            a_parcel,
            b_parcel,
        );
    }
}

fn resolve_cells(
    a: &mut ZoneBlock,
    b: &mut ZoneBlock,
    (a_col, a_row): (usize, usize),
    (b_col, b_row): (usize, usize),
    mode: PairMode,
    a_parcel: bool,
    b_parcel: bool,
) {
    match mode {
        PairMode::Redundancy => {
            // A parcel cell is never marked redundant; the opposing side is
            // stripped of its zoning instead.
            if a_parcel {
                b.cell_mut(b_col, b_row).zone = ZoneType::None;
                return;
            }
            if b_parcel {
                a.cell_mut(a_col, a_row).zone = ZoneType::None;
                return;
            }
            let win = first_wins(
                &PrioritySide::of(a, a_col, a_row),
                &PrioritySide::of(b, b_col, b_row),
                mode,
            );
            if win {
                b.cell_mut(b_col, b_row).set(CELL_REDUNDANT);
            } else {
                a.cell_mut(a_col, a_row).set(CELL_REDUNDANT);
            }
        }
        PairMode::Blocking => {
            // A parcel never loses a blocking decision, and it never blocks
            // the opposing cell either: the loser is stripped instead.
            if a_parcel {
                b.cell_mut(b_col, b_row).zone = ZoneType::None;
                return;
            }
            if b_parcel {
                a.cell_mut(a_col, a_row).zone = ZoneType::None;
                return;
            }
            let win = first_wins(
                &PrioritySide::of(a, a_col, a_row),
                &PrioritySide::of(b, b_col, b_row),
                mode,
            );
            if win {
                b.cell_mut(b_col, b_row).set(CELL_BLOCKED);
            } else {
                a.cell_mut(a_col, a_row).set(CELL_BLOCKED);
            }
        }
        PairMode::Sharing => {
            // The cell under a parcel is surrendered outright: stripped,
            // shared, and blocked for the rest of the cycle.
            if a_parcel {
                let cell = b.cell_mut(b_col, b_row);
                cell.zone = ZoneType::None;
                cell.set(CELL_REDUNDANT | CELL_BLOCKED | CELL_SHARED);
                return;
            }
            if b_parcel {
                let cell = a.cell_mut(a_col, a_row);
                cell.zone = ZoneType::None;
                cell.set(CELL_REDUNDANT | CELL_BLOCKED | CELL_SHARED);
                return;
            }
            let win = first_wins(
                &PrioritySide::of(a, a_col, a_row),
                &PrioritySide::of(b, b_col, b_row),
                mode,
            );
            if win {
                let winner = *a.cell(a_col, a_row);
                share_onto(b, b_col, b_row, winner.zone, winner.flags);
            } else {
                let winner = *b.cell(b_col, b_row);
                share_onto(a, a_col, a_row, winner.zone, winner.flags);
            }
        }
    }
}

fn share_onto(loser: &mut ZoneBlock, col: usize, row: usize, zone: ZoneType, winner_flags: u16) {
    let cell = loser.cell_mut(col, row);
    if cell.has(CELL_SHARED) {
        return;
    }
    cell.zone = zone;
    let copied = winner_flags & (CELL_OVERRIDDEN | CELL_OCCUPIED);
    cell.clear(CELL_OVERRIDDEN | CELL_OCCUPIED);
    cell.set(copied | CELL_SHARED);
}
