//! Overlap-group input types.
//!
//! A broad-phase spatial join (external to this crate) partitions blocks
//! into disjoint groups of mutual overlap and pairs each block with its
//! lateral neighbors. Groups never share a block, so they can be resolved
//! independently.

use bevy::prelude::*;

use crate::block::BlockId;

/// One block's slot in an overlap group.
#[derive(Debug, Clone)]
pub struct GroupEntry {
    pub block: BlockId,
    /// Laterally adjacent block past column 0, if any.
    pub left: Option<BlockId>,
    /// Laterally adjacent block past the last column, if any.
    pub right: Option<BlockId>,
    /// Blocks whose footprints overlap this one.
    pub overlaps: Vec<BlockId>,
}

impl GroupEntry {
    pub fn new(block: BlockId) -> Self {
        Self {
            block,
            left: None,
            right: None,
            overlaps: Vec::new(),
        }
    }

    pub fn with_overlap(mut self, other: BlockId) -> Self {
        self.overlaps.push(other);
        self
    }

    pub fn with_left(mut self, left: BlockId) -> Self {
        self.left = Some(left);
        self
    }

    pub fn with_right(mut self, right: BlockId) -> Self {
        self.right = Some(right);
        self
    }
}

/// A maximal set of mutually-overlapping blocks, resolved under strictly
/// ordered phases.
#[derive(Debug, Clone, Default)]
pub struct OverlapGroup {
    pub entries: Vec<GroupEntry>,
}

/// Broad-phase output consumed by the resolver each cycle.
#[derive(Resource, Default)]
pub struct OverlapGroups {
    pub groups: Vec<OverlapGroup>,
}

impl OverlapGroups {
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}
