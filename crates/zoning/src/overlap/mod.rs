//! Overlap resolver: pairwise arbitration between mutually-overlapping
//! blocks, run as five strictly ordered phases per disjoint group.

pub mod depth;
pub mod pairing;
pub mod phases;
pub mod types;


pub use depth::depth_reduce;
pub use pairing::{can_share_cells, resolve_pair, PairMode};
pub use phases::resolve_group;
pub use types::{GroupEntry, OverlapGroup, OverlapGroups};
