//! quadbounce: quadtree broad-phase overlap detection for bouncing circles
//! (ephemeral per-frame index, detection only, no resolution)

pub mod api;
pub mod geom;
pub mod quadtree;
pub mod sim;
pub mod types;

pub use crate::api::*;
pub use crate::geom::{Aabb, Body, Shape};
pub use crate::quadtree::QuadTree;
pub use crate::sim::Simulation;
pub use crate::types::*;
