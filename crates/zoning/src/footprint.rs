//! Footprint normalizer for parcel-owned blocks.
//!
//! Runs once per affected parcel block at the start of a resolution cycle,
//! before obstruction scanning. Cells outside the parcel's declared lot are
//! forced into the blocked, unzoned state; cells inside are reset (narrow
//! lots) or left to their upstream flags (wide lots).

use crate::block::ZoneBlock;
use crate::grid::{ValidArea, CELL_BLOCKED, CELL_OCCUPIED};
use crate::parcels::ParcelLot;

/// Trims a parcel-owned block to its lot footprint.
///
/// Wide lots (more than one cell across) keep their in-lot cell state as
/// written by upstream mutation and skip all further per-cell geometry
/// checks this cycle. Narrow lots reset in-lot cells to a clean slate and
/// continue on to obstruction scanning.
pub fn normalize_block(block: &mut ZoneBlock, lot: ParcelLot) {
    let narrow = lot.is_narrow();
    for row in 0..block.depth() {
        for col in 0..block.width() {
            let in_lot = col < lot.lot_width && row < lot.lot_depth;
            let cell = block.cell_mut(col, row);
            if in_lot {
                if narrow {
                    cell.clear(CELL_OCCUPIED | CELL_BLOCKED);
                }
            } else {
                cell.force_blocked();
            }
        }
    }
    block.valid = ValidArea::new(0, lot.lot_width, 0, lot.lot_depth);
}
