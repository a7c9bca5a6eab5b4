//! The five ordered phases of group resolution, plus the final commit.
//!
//! Every phase runs to completion over the whole group before the next
//! starts; later phases read flags written by earlier ones. Groups are
//! disjoint, so distinct groups never observe each other's writes.

use crate::block::ZoneBlockStore;
use crate::grid::{ZoneTypeMeta, CELL_BLOCKED, CELL_OCCUPIED, CELL_REDUNDANT};
use crate::parcels::ParcelRegistry;

use super::depth::depth_reduce;
use super::pairing::{can_share_cells, resolve_pair, PairMode};
use super::types::OverlapGroup;

/// Resolves one overlap group: redundancy marking, blocking, redundancy
/// cleanup, occupied-cell depth, cell sharing, then the final valid-area
/// commit.
pub fn resolve_group(
    store: &mut ZoneBlockStore,
    group: &OverlapGroup,
    registry: &ParcelRegistry,
    zone_meta: &ZoneTypeMeta,
) {
    // Phase 1: pairwise redundancy marking, then neighbor depth smoothing.
    for entry in &group.entries {
        for other in &entry.overlaps {
            resolve_pair(store, entry.block, *other, PairMode::Redundancy, registry);
        }
    }
    for entry in &group.entries {
        depth_reduce(
            store,
            entry.block,
            entry.left,
            entry.right,
            CELL_REDUNDANT,
            registry,
            None,
        );
    }

    // Phase 2: pairwise blocking, then depth smoothing on the blocked flag.
    // This pass is the one that commits each block's valid area.
    for entry in &group.entries {
        for other in &entry.overlaps {
            resolve_pair(store, entry.block, *other, PairMode::Blocking, registry);
        }
    }
    for entry in &group.entries {
        depth_reduce(
            store,
            entry.block,
            entry.left,
            entry.right,
            CELL_BLOCKED,
            registry,
            None,
        );
    }

    // Phase 3: align leftover redundancy markers with the blocked state.
    for entry in &group.entries {
        depth_reduce(
            store,
            entry.block,
            entry.left,
            entry.right,
            CELL_REDUNDANT,
            registry,
            None,
        );
    }

    // Phase 4: occupied-cell depth, honoring narrow-lot zone exemptions.
    for entry in &group.entries {
        depth_reduce(
            store,
            entry.block,
            entry.left,
            entry.right,
            CELL_OCCUPIED,
            registry,
            Some(zone_meta),
        );
    }

    // Phase 5: cell sharing between lattice-aligned pairs.
    for entry in &group.entries {
        for other in &entry.overlaps {
            let eligible = match (store.get(entry.block), store.get(*other)) {
                (Some(a), Some(b)) => can_share_cells(a, b),
                _ => false,
            };
            if eligible {
                resolve_pair(store, entry.block, *other, PairMode::Sharing, registry);
            }
        }
    }

    // Final commit: redundancy is a resolution-internal marker and never
    // survives the cycle.
    for entry in &group.entries {
        if let Some(block) = store.get_mut(entry.block) {
            for cell in &mut block.cells {
                cell.clear(CELL_REDUNDANT);
            }
        }
    }
}
