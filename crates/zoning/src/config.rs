pub const CELL_SIZE: f32 = 8.0;

/// Zoning geometry lives inside a square world centered on the origin.
pub const WORLD_HALF_EXTENT: f32 = 4096.0;
pub const WORLD_EXTENT: f32 = WORLD_HALF_EXTENT * 2.0;

/// World units per spatial-index bucket.
pub const BUCKET_SIZE: f32 = 128.0;

/// Number of sub-segments a net edge's curve is cut into before its strip
/// quads are intersected against a block footprint.
pub const CURVE_CUTS: usize = 8;

/// Buildable ceiling for a cell that no elevated obstruction has clamped.
pub const MAX_CELL_HEIGHT: f32 = 1000.0;

/// Separation tolerance for the separating-axis overlap tests. Footprints
/// that merely touch along a shared edge must not count as overlapping.
pub const GEOM_EPS: f32 = 1e-3;

/// Tolerance for deciding that two block lattices coincide, as a fraction of
/// a cell.
pub const LATTICE_EPS: f32 = 0.01;
