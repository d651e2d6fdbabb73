//! Visualization graph export
//!
//! Downsamples a fused similarity matrix into a nearest-neighbor graph
//! suitable for force-directed rendering. Presentation-only: nothing here
//! feeds back into the fusion engine.

pub mod colormap;
pub mod export;

pub use export::{neighbor_graph, GraphLink, GraphNode, NeighborGraph};
