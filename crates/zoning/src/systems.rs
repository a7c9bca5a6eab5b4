//! Engine scheduling: three chained passes over the dirty-block set.
//!
//! Normalize and scan touch each affected block independently; resolve works
//! on whole overlap groups. The set chain is the phase barrier described by
//! the group resolver — no system of a later set runs before every block of
//! the previous pass is done.

use bevy::prelude::*;

use crate::block::{DirtyBlocks, ZoneBlockStore};
use crate::footprint::normalize_block;
use crate::grid::ZoneTypeMeta;
use crate::obstructions::{
    scan_area_triangles, scan_net_edges, AreaObstructionIndex, NetObstructionIndex,
};
use crate::overlap::{resolve_group, OverlapGroups};
use crate::parcels::ParcelRegistry;

/// Ordered phases of one zoning resolution cycle, chained on `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoningSet {
    /// Parcel footprint normalization per affected block.
    Normalize,
    /// Obstruction scanning per affected block.
    Scan,
    /// Overlap resolution per affected group, then the dirty set drains.
    Resolve,
}

/// Trims every dirty parcel-owned block to its lot footprint.
pub fn normalize_footprints(
    mut store: ResMut<ZoneBlockStore>,
    registry: Res<ParcelRegistry>,
    dirty: Res<DirtyBlocks>,
) {
    for id in &dirty.blocks {
        let Some(lot) = registry.lot(*id) else {
            continue;
        };
        if let Some(block) = store.get_mut(*id) {
            normalize_block(block, lot);
        }
    }
}

/// Runs the obstruction scanner over every dirty block. Wide parcels were
/// fully decided by normalization and skip the scan.
pub fn scan_obstructions(
    mut store: ResMut<ZoneBlockStore>,
    registry: Res<ParcelRegistry>,
    dirty: Res<DirtyBlocks>,
    net: Res<NetObstructionIndex>,
    areas: Res<AreaObstructionIndex>,
) {
    for id in &dirty.blocks {
        if registry.lot(*id).is_some_and(|lot| !lot.is_narrow()) {
            continue;
        }
        if let Some(block) = store.get_mut(*id) {
            scan_net_edges(block, &net);
            scan_area_triangles(block, &areas);
        }
    }
}

/// Resolves every overlap group containing a dirty block, then drains the
/// dirty set.
pub fn resolve_overlaps(
    mut store: ResMut<ZoneBlockStore>,
    registry: Res<ParcelRegistry>,
    zone_meta: Res<ZoneTypeMeta>,
    groups: Res<OverlapGroups>,
    mut dirty: ResMut<DirtyBlocks>,
) {
    if dirty.is_empty() {
        return;
    }
    let mut resolved = 0;
    for group in &groups.groups {
        if !group
            .entries
            .iter()
            .any(|entry| dirty.blocks.contains(&entry.block))
        {
            continue;
        }
        resolve_group(&mut store, group, &registry, &zone_meta);
        resolved += 1;
    }
    debug!(
        "zoning cycle: {} groups resolved for {} dirty blocks",
        resolved,
        dirty.blocks.len()
    );
    dirty.clear();
}

pub struct ZoningEnginePlugin;

impl Plugin for ZoningEnginePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ZoneBlockStore>()
            .init_resource::<DirtyBlocks>()
            .init_resource::<ParcelRegistry>()
            .init_resource::<ZoneTypeMeta>()
            .init_resource::<NetObstructionIndex>()
            .init_resource::<AreaObstructionIndex>()
            .init_resource::<OverlapGroups>()
            .configure_sets(
                FixedUpdate,
                (ZoningSet::Normalize, ZoningSet::Scan, ZoningSet::Resolve).chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    normalize_footprints.in_set(ZoningSet::Normalize),
                    scan_obstructions.in_set(ZoningSet::Scan),
                    resolve_overlaps.in_set(ZoningSet::Resolve),
                ),
            );
    }
}
