//! Cell grid model: zone vocabulary, packed cell-state flags, and the valid
//! sub-rectangle every resolution pass reads and shrinks.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::MAX_CELL_HEIGHT;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode, Default,
)]
pub enum ZoneType {
    #[default]
    None,
    ResidentialLow,
    ResidentialHigh,
    CommercialLow,
    CommercialHigh,
    Industrial,
    Office,
}

impl ZoneType {
    pub fn is_residential(self) -> bool {
        matches!(self, ZoneType::ResidentialLow | ZoneType::ResidentialHigh)
    }
}

/// Cell state flags packed into a single u16 per cell.
pub const CELL_BLOCKED: u16 = 0b0_0000_0001;
pub const CELL_OCCUPIED: u16 = 0b0_0000_0010;
pub const CELL_REDUNDANT: u16 = 0b0_0000_0100;
pub const CELL_SHARED: u16 = 0b0_0000_1000;
pub const CELL_VISIBLE: u16 = 0b0_0001_0000;
pub const CELL_UPDATING: u16 = 0b0_0010_0000;
pub const CELL_OVERRIDDEN: u16 = 0b0_0100_0000;
pub const CELL_ROAD_LEFT: u16 = 0b0_1000_0000;
pub const CELL_ROAD_RIGHT: u16 = 0b1_0000_0000;

/// One grid unit of a zoning block.
///
/// `height` is the buildable ceiling in world units; elevated obstructions
/// clamp it downward but never set or clear `CELL_BLOCKED`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ZoneCell {
    pub zone: ZoneType,
    pub flags: u16,
    pub height: f32,
}

impl Default for ZoneCell {
    fn default() -> Self {
        Self {
            zone: ZoneType::None,
            flags: 0,
            height: MAX_CELL_HEIGHT,
        }
    }
}

impl ZoneCell {
    #[inline]
    pub fn has(&self, flags: u16) -> bool {
        self.flags & flags != 0
    }

    #[inline]
    pub fn set(&mut self, flags: u16) {
        self.flags |= flags;
    }

    #[inline]
    pub fn clear(&mut self, flags: u16) {
        self.flags &= !flags;
    }

    /// Forces the cell into the blocked, unzoned state used for everything
    /// outside a parcel's lot footprint.
    pub fn force_blocked(&mut self) {
        self.zone = ZoneType::None;
        self.set(CELL_BLOCKED);
    }
}

/// Axis-aligned integer sub-rectangle of a block's cell grid, half-open on
/// both axes. Shrinks monotonically during a resolution cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, Default)]
pub struct ValidArea {
    pub x_min: usize,
    pub x_max: usize,
    pub z_min: usize,
    pub z_max: usize,
}

impl ValidArea {
    pub fn new(x_min: usize, x_max: usize, z_min: usize, z_max: usize) -> Self {
        Self {
            x_min,
            x_max,
            z_min,
            z_max,
        }
    }

    /// Full extent of a width x depth cell grid.
    pub fn of_size(width: usize, depth: usize) -> Self {
        Self::new(0, width, 0, depth)
    }

    pub fn width(&self) -> usize {
        self.x_max.saturating_sub(self.x_min)
    }

    pub fn depth(&self) -> usize {
        self.z_max.saturating_sub(self.z_min)
    }

    pub fn area(&self) -> usize {
        self.width() * self.depth()
    }

    pub fn is_empty(&self) -> bool {
        self.x_min >= self.x_max || self.z_min >= self.z_max
    }

    pub fn contains(&self, col: usize, row: usize) -> bool {
        col >= self.x_min && col < self.x_max && row >= self.z_min && row < self.z_max
    }

    pub fn intersect(&self, other: &ValidArea) -> ValidArea {
        let out = ValidArea {
            x_min: self.x_min.max(other.x_min),
            x_max: self.x_max.min(other.x_max),
            z_min: self.z_min.max(other.z_min),
            z_max: self.z_max.min(other.z_max),
        };
        if out.is_empty() {
            ValidArea::default()
        } else {
            out
        }
    }
}

/// Per-zone-type metadata supplied by the surrounding simulation's prefab
/// registry. The resolver only consults the narrow-lot exemption.
#[derive(Resource, Debug, Clone)]
pub struct ZoneTypeMeta {
    narrow_lot_zones: HashSet<ZoneType>,
}

impl Default for ZoneTypeMeta {
    fn default() -> Self {
        let mut narrow_lot_zones = HashSet::new();
        narrow_lot_zones.insert(ZoneType::ResidentialLow);
        narrow_lot_zones.insert(ZoneType::CommercialLow);
        Self { narrow_lot_zones }
    }
}

impl ZoneTypeMeta {
    /// Zones that may occupy narrow lots skip occupied-cell depth trimming.
    pub fn supports_narrow_lots(&self, zone: ZoneType) -> bool {
        self.narrow_lot_zones.contains(&zone)
    }

    pub fn set_narrow_lots(&mut self, zone: ZoneType, supported: bool) {
        if supported {
            self.narrow_lot_zones.insert(zone);
        } else {
            self.narrow_lot_zones.remove(&zone);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_flag_bits_are_distinct() {
        let all = [
            CELL_BLOCKED,
            CELL_OCCUPIED,
            CELL_REDUNDANT,
            CELL_SHARED,
            CELL_VISIBLE,
            CELL_UPDATING,
            CELL_OVERRIDDEN,
            CELL_ROAD_LEFT,
            CELL_ROAD_RIGHT,
        ];
        let mut seen: u16 = 0;
        for flag in all {
            assert_eq!(flag.count_ones(), 1);
            assert_eq!(seen & flag, 0, "flag {flag:#b} overlaps another");
            seen |= flag;
        }
    }

    #[test]
    fn test_cell_set_clear_has() {
        let mut cell = ZoneCell::default();
        assert!(!cell.has(CELL_BLOCKED));

        cell.set(CELL_BLOCKED | CELL_VISIBLE);
        assert!(cell.has(CELL_BLOCKED));
        assert!(cell.has(CELL_VISIBLE));
        assert!(!cell.has(CELL_OCCUPIED));

        cell.clear(CELL_BLOCKED);
        assert!(!cell.has(CELL_BLOCKED));
        assert!(cell.has(CELL_VISIBLE));
    }

    #[test]
    fn test_force_blocked_strips_zone() {
        let mut cell = ZoneCell {
            zone: ZoneType::Industrial,
            flags: CELL_VISIBLE,
            ..Default::default()
        };
        cell.force_blocked();
        assert_eq!(cell.zone, ZoneType::None);
        assert!(cell.has(CELL_BLOCKED));
        assert!(cell.has(CELL_VISIBLE));
    }

    #[test]
    fn test_valid_area_intersect_shrinks() {
        let a = ValidArea::new(0, 4, 0, 6);
        let b = ValidArea::new(1, 3, 2, 8);
        let c = a.intersect(&b);
        assert_eq!(c, ValidArea::new(1, 3, 2, 6));
        assert!(c.area() <= a.area());
        assert!(c.area() <= b.area());
    }

    #[test]
    fn test_valid_area_disjoint_is_empty() {
        let a = ValidArea::new(0, 2, 0, 2);
        let b = ValidArea::new(3, 5, 0, 2);
        assert!(a.intersect(&b).is_empty());
        assert_eq!(a.intersect(&b).area(), 0);
    }

    #[test]
    fn test_valid_area_serializes() {
        let area = ValidArea::new(0, 2, 0, 2);
        let json = serde_json::to_string(&area).unwrap();
        assert_eq!(json, r#"{"x_min":0,"x_max":2,"z_min":0,"z_max":2}"#);
    }

    #[test]
    fn test_zone_meta_narrow_lots() {
        let mut meta = ZoneTypeMeta::default();
        assert!(meta.supports_narrow_lots(ZoneType::ResidentialLow));
        assert!(!meta.supports_narrow_lots(ZoneType::Office));

        meta.set_narrow_lots(ZoneType::Office, true);
        assert!(meta.supports_narrow_lots(ZoneType::Office));
        meta.set_narrow_lots(ZoneType::Office, false);
        assert!(!meta.supports_narrow_lots(ZoneType::Office));
    }
}
