//! Synthetic search domains.

pub mod corridor;
pub mod explicit_graph;
pub mod grid_world;
pub mod sliding_tile;
