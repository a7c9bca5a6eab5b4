#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::block::{BlockId, BlockSize, ZoneBlock};
    use crate::grid::{CELL_BLOCKED, CELL_ROAD_LEFT, CELL_ROAD_RIGHT};
    use crate::obstructions::types::{
        AreaObstructionIndex, AreaTriangle, IgnoreZone, NetEdge, NetObstructionIndex,
        AREA_BLOCKS_ZONING, AREA_PHYSICAL, AREA_PROTECTED, EDGE_BLOCKS_ZONING, EDGE_ELEVATED,
        EDGE_EXCLUSIVE, EDGE_TUNNEL, EDGE_ZONING_LEFT, EDGE_ZONING_RIGHT,
    };
    use crate::obstructions::{scan_area_triangles, scan_net_edges};

    /// 4 cells across, 6 deep, front edge centered on the origin, facing +Y.
    /// Lateral extent [-16, 16], depth extent [0, 48].
    fn test_block() -> ZoneBlock {
        ZoneBlock::new(BlockId(0), Vec2::ZERO, Vec2::Y, BlockSize::new(4, 6), 0)
    }

    fn front_road() -> NetEdge {
        NetEdge::straight(
            Vec2::new(-40.0, 4.0),
            Vec2::new(40.0, 4.0),
            4.0,
            EDGE_BLOCKS_ZONING | EDGE_ZONING_LEFT | EDGE_ZONING_RIGHT,
        )
    }

    /// Runs vertically along the block's left edge, overlapping column 0.
    fn side_road() -> NetEdge {
        NetEdge::straight(
            Vec2::new(-18.0, -10.0),
            Vec2::new(-18.0, 58.0),
            4.0,
            EDGE_BLOCKS_ZONING | EDGE_ZONING_LEFT | EDGE_ZONING_RIGHT,
        )
    }

    #[test]
    fn test_front_road_blocks_front_row() {
        let mut block = test_block();
        let mut index = NetObstructionIndex::default();
        index.insert(front_road());

        scan_net_edges(&mut block, &index);

        for col in 0..4 {
            let cell = block.cell(col, 0);
            assert!(cell.has(CELL_BLOCKED), "front cell {col} should block");
            assert!(
                cell.has(CELL_ROAD_LEFT | CELL_ROAD_RIGHT),
                "front cell {col} should carry road adjacency"
            );
        }
        for row in 1..6 {
            for col in 0..4 {
                assert!(!block.cell(col, row).has(CELL_BLOCKED));
            }
        }
    }

    #[test]
    fn test_side_road_tags_left_adjacency() {
        let mut block = test_block();
        let mut index = NetObstructionIndex::default();
        index.insert(side_road());

        scan_net_edges(&mut block, &index);

        for row in 0..6 {
            let cell = block.cell(0, row);
            assert!(cell.has(CELL_BLOCKED));
            assert!(cell.has(CELL_ROAD_LEFT), "road lies to the block's left");
            assert!(!cell.has(CELL_ROAD_RIGHT));
        }
        for row in 0..6 {
            for col in 1..4 {
                assert_eq!(block.cell(col, row).flags, 0);
            }
        }
    }

    #[test]
    fn test_scan_is_idempotent() {
        let mut block = test_block();
        let mut net = NetObstructionIndex::default();
        net.insert(front_road());
        net.insert(side_road());
        let mut areas = AreaObstructionIndex::default();
        areas.insert(AreaTriangle::new(
            Vec2::new(-16.0, 32.0),
            Vec2::new(-16.0, 48.0),
            Vec2::new(0.0, 48.0),
            AREA_PHYSICAL,
        ));

        scan_net_edges(&mut block, &net);
        scan_area_triangles(&mut block, &areas);
        let first: Vec<(u16, f32)> = block.cells.iter().map(|c| (c.flags, c.height)).collect();

        scan_net_edges(&mut block, &net);
        scan_area_triangles(&mut block, &areas);
        let second: Vec<(u16, f32)> = block.cells.iter().map(|c| (c.flags, c.height)).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_tunnel_and_non_blocking_edges_ignored() {
        let mut block = test_block();
        let mut index = NetObstructionIndex::default();

        let mut tunnel = front_road();
        tunnel.flags |= EDGE_TUNNEL;
        index.insert(tunnel);

        let mut decorative = front_road();
        decorative.flags &= !EDGE_BLOCKS_ZONING;
        index.insert(decorative);

        scan_net_edges(&mut block, &index);

        for cell in &block.cells {
            assert_eq!(cell.flags, 0);
        }
    }

    #[test]
    fn test_elevated_edge_clamps_height_only() {
        let mut block = test_block();
        let mut index = NetObstructionIndex::default();
        let mut overpass = front_road();
        overpass.flags |= EDGE_ELEVATED;
        overpass.elevation = 12.0;
        index.insert(overpass);

        scan_net_edges(&mut block, &index);

        for col in 0..4 {
            let cell = block.cell(col, 0);
            assert!(!cell.has(CELL_BLOCKED));
            assert_eq!(cell.height, 12.0);
        }
    }

    #[test]
    fn test_elevated_exclusive_edge_still_blocks() {
        let mut block = test_block();
        let mut index = NetObstructionIndex::default();
        let mut viaduct = front_road();
        viaduct.flags |= EDGE_ELEVATED | EDGE_EXCLUSIVE;
        index.insert(viaduct);

        scan_net_edges(&mut block, &index);

        for col in 0..4 {
            assert!(block.cell(col, 0).has(CELL_BLOCKED));
        }
    }

    #[test]
    fn test_ignore_zone_suppresses_road_flags_not_blocking() {
        let mut block = test_block();
        let mut index = NetObstructionIndex::default();
        let mut road = side_road();
        road.ignore = Some(IgnoreZone::Circle {
            center: Vec2::new(-12.0, 24.0),
            radius: 30.0,
        });
        index.insert(road);

        scan_net_edges(&mut block, &index);

        for row in 0..6 {
            let cell = block.cell(0, row);
            assert!(cell.has(CELL_BLOCKED), "blocking is not exempted");
            assert!(!cell.has(CELL_ROAD_LEFT | CELL_ROAD_RIGHT));
        }
    }

    #[test]
    fn test_physical_area_blocks_cells() {
        let mut block = test_block();
        let mut index = AreaObstructionIndex::default();
        index.insert(AreaTriangle::new(
            Vec2::new(-16.0, 32.0),
            Vec2::new(-16.0, 48.0),
            Vec2::new(0.0, 48.0),
            AREA_PHYSICAL,
        ));

        scan_area_triangles(&mut block, &index);

        assert!(block.cell(0, 5).has(CELL_BLOCKED));
        for col in 0..4 {
            assert!(!block.cell(col, 0).has(CELL_BLOCKED), "front row untouched");
        }
    }

    #[test]
    fn test_protected_area_needs_explicit_marker() {
        let mut unmarked = test_block();
        let mut marked = test_block();

        let tri = |flags| {
            AreaTriangle::new(
                Vec2::new(-16.0, 32.0),
                Vec2::new(-16.0, 48.0),
                Vec2::new(0.0, 48.0),
                flags,
            )
        };

        let mut index = AreaObstructionIndex::default();
        index.insert(tri(AREA_PROTECTED));
        scan_area_triangles(&mut unmarked, &index);
        assert!(unmarked.cells.iter().all(|c| !c.has(CELL_BLOCKED)));

        let mut index = AreaObstructionIndex::default();
        index.insert(tri(AREA_PROTECTED | AREA_BLOCKS_ZONING));
        scan_area_triangles(&mut marked, &index);
        assert!(marked.cell(0, 5).has(CELL_BLOCKED));
    }

    #[test]
    fn test_index_query_rect() {
        let mut index = NetObstructionIndex::default();
        index.insert(front_road());
        index.insert(NetEdge::straight(
            Vec2::new(2000.0, 2000.0),
            Vec2::new(2100.0, 2000.0),
            4.0,
            EDGE_BLOCKS_ZONING,
        ));

        let near = index.query_rect(Vec2::new(-50.0, -10.0), Vec2::new(50.0, 50.0));
        assert_eq!(near, vec![0]);

        let far = index.query_rect(Vec2::new(3000.0, 3000.0), Vec2::new(3100.0, 3100.0));
        assert!(far.is_empty());
    }
}
