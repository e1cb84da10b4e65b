pub mod edge_index;
pub mod triangle_counter;
pub mod tests;

pub use edge_index::{EdgeIdIndex, DEFAULT_MAX_NODE_ID};
pub use triangle_counter::TriangleCounter;
