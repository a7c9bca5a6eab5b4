//! Zoning blocks and the store that owns them.
//!
//! A block is a rectangular grid of cells anchored in world space. The store
//! hands out stable ids and pair-wise mutable access so the overlap resolver
//! can arbitrate between two blocks of the same group in place.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::CELL_SIZE;
use crate::geometry::Quad;
use crate::grid::{ValidArea, ZoneCell, CELL_BLOCKED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct BlockId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct BlockSize {
    /// Lateral cell count (columns).
    pub width: usize,
    /// Depth cell count (rows).
    pub depth: usize,
}

impl BlockSize {
    pub fn new(width: usize, depth: usize) -> Self {
        Self { width, depth }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.depth
    }
}

/// World-space placement of a block's cell lattice. Copyable so geometry can
/// be consulted while the cell array is mutably borrowed.
#[derive(Debug, Clone, Copy)]
pub struct BlockFrame {
    /// Midpoint of the block's front edge.
    pub position: Vec2,
    /// Unit forward direction, pointing from the front row into the depth.
    pub direction: Vec2,
    pub size: BlockSize,
}

impl BlockFrame {
    #[inline]
    pub fn right(&self) -> Vec2 {
        Vec2::new(self.direction.y, -self.direction.x)
    }

    /// World position of a lattice point at `lateral` cells right of the
    /// front-edge midpoint and `depth` cells into the block.
    #[inline]
    pub fn lattice_point(&self, lateral: f32, depth: f32) -> Vec2 {
        self.position + self.right() * (lateral * CELL_SIZE) + self.direction * (depth * CELL_SIZE)
    }

    /// Quad covering the half-open cell range `cols` x `rows`.
    pub fn range_quad(&self, cols: (usize, usize), rows: (usize, usize)) -> Quad {
        let half_w = self.size.width as f32 * 0.5;
        let a = cols.0 as f32 - half_w;
        let b = cols.1 as f32 - half_w;
        let c = rows.0 as f32;
        let d = rows.1 as f32;
        Quad::new(
            self.lattice_point(a, c),
            self.lattice_point(b, c),
            self.lattice_point(b, d),
            self.lattice_point(a, d),
        )
    }

    pub fn cell_quad(&self, col: usize, row: usize) -> Quad {
        self.range_quad((col, col + 1), (row, row + 1))
    }

    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        self.lattice_point(
            col as f32 + 0.5 - self.size.width as f32 * 0.5,
            row as f32 + 0.5,
        )
    }

    /// World position of the cell-grid origin corner (col 0, row 0).
    pub fn origin_corner(&self) -> Vec2 {
        self.lattice_point(-(self.size.width as f32) * 0.5, 0.0)
    }
}

/// A rectangular grid of zoning cells.
#[derive(Debug, Clone)]
pub struct ZoneBlock {
    pub id: BlockId,
    pub frame: BlockFrame,
    /// Arbitration tie-break; lower order means older and higher priority.
    pub build_order: u32,
    /// Row-major by depth then lateral position: `row * width + col`.
    pub cells: Vec<ZoneCell>,
    pub valid: ValidArea,
}

impl ZoneBlock {
    pub fn new(id: BlockId, position: Vec2, direction: Vec2, size: BlockSize, order: u32) -> Self {
        Self {
            id,
            frame: BlockFrame {
                position,
                direction,
                size,
            },
            build_order: order,
            cells: vec![ZoneCell::default(); size.cell_count()],
            valid: ValidArea::of_size(size.width, size.depth),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.frame.size.width
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frame.size.depth
    }

    #[inline]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.width() + col
    }

    #[inline]
    pub fn cell(&self, col: usize, row: usize) -> &ZoneCell {
        &self.cells[row * self.width() + col]
    }

    #[inline]
    pub fn cell_mut(&mut self, col: usize, row: usize) -> &mut ZoneCell {
        let idx = row * self.width() + col;
        &mut self.cells[idx]
    }

    /// Footprint quad of the current valid area.
    pub fn footprint_quad(&self) -> Quad {
        self.frame.range_quad(
            (self.valid.x_min, self.valid.x_max),
            (self.valid.z_min, self.valid.z_max),
        )
    }

    /// World-space bounds of the whole grid, for spatial-index queries.
    pub fn world_aabb(&self) -> (Vec2, Vec2) {
        self.frame
            .range_quad((0, self.width()), (0, self.depth()))
            .aabb()
    }

    /// Bounding rectangle of cells not flagged blocked, for the valid-area
    /// commit after a blocking pass. Empty when every cell is blocked.
    pub fn unblocked_bounds(&self) -> ValidArea {
        let mut x_min = self.width();
        let mut x_max = 0;
        let mut z_min = self.depth();
        let mut z_max = 0;
        for row in 0..self.depth() {
            for col in 0..self.width() {
                if self.cell(col, row).has(CELL_BLOCKED) {
                    continue;
                }
                x_min = x_min.min(col);
                x_max = x_max.max(col + 1);
                z_min = z_min.min(row);
                z_max = z_max.max(row + 1);
            }
        }
        if x_min >= x_max {
            ValidArea::default()
        } else {
            ValidArea::new(x_min, x_max, z_min, z_max)
        }
    }
}

/// Owner of every zoning block, keyed by stable [`BlockId`].
#[derive(Resource, Default, Clone)]
pub struct ZoneBlockStore {
    pub blocks: Vec<ZoneBlock>,
    next_block_id: u32,
}

impl ZoneBlockStore {
    pub fn insert(
        &mut self,
        position: Vec2,
        direction: Vec2,
        size: BlockSize,
        build_order: u32,
    ) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        self.blocks
            .push(ZoneBlock::new(id, position, direction, size, build_order));
        id
    }

    pub fn remove(&mut self, id: BlockId) {
        self.blocks.retain(|b| b.id != id);
    }

    pub fn get(&self, id: BlockId) -> Option<&ZoneBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut ZoneBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Simultaneous mutable access to two distinct blocks.
    pub fn pair_mut(
        &mut self,
        a: BlockId,
        b: BlockId,
    ) -> Option<(&mut ZoneBlock, &mut ZoneBlock)> {
        let ia = self.blocks.iter().position(|blk| blk.id == a)?;
        let ib = self.blocks.iter().position(|blk| blk.id == b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.blocks.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.blocks.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Blocks whose footprint-affecting inputs changed since the last cycle.
/// Collaborators mark ids here; the engine drains the set each cycle.
#[derive(Resource, Default)]
pub struct DirtyBlocks {
    pub blocks: HashSet<BlockId>,
}

impl DirtyBlocks {
    pub fn mark(&mut self, id: BlockId) {
        self.blocks.insert(id);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}
