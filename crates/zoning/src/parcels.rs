//! Parcel-owner lookup.
//!
//! A parcel is a fixed-footprint placeable lot that owns exactly one block.
//! The link is a lookup table keyed by block id, never an embedded pointer:
//! the owning object may be removed between cycles, and a missing record
//! simply means the block is a vanilla zoning block.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::block::BlockId;

/// Fixed lot footprint imposed by a parcel on its block. Always within the
/// block's own grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ParcelLot {
    pub lot_width: usize,
    pub lot_depth: usize,
}

impl ParcelLot {
    pub fn new(lot_width: usize, lot_depth: usize) -> Self {
        Self {
            lot_width,
            lot_depth,
        }
    }

    /// Narrow lots are a single cell across and follow their own rules in
    /// normalization and depth-reduction.
    pub fn is_narrow(&self) -> bool {
        self.lot_width == 1
    }
}

#[derive(Resource, Default)]
pub struct ParcelRegistry {
    lots: HashMap<BlockId, ParcelLot>,
}

impl ParcelRegistry {
    pub fn link(&mut self, block: BlockId, lot: ParcelLot) {
        self.lots.insert(block, lot);
    }

    pub fn unlink(&mut self, block: BlockId) {
        self.lots.remove(&block);
    }

    pub fn lot(&self, block: BlockId) -> Option<ParcelLot> {
        self.lots.get(&block).copied()
    }

    pub fn is_parcel(&self, block: BlockId) -> bool {
        self.lots.contains_key(&block)
    }

    pub fn is_narrow_parcel(&self, block: BlockId) -> bool {
        self.lot(block).is_some_and(|lot| lot.is_narrow())
    }
}
