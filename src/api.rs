use glam::Vec2;

use crate::geom::{Aabb, Body};
use crate::types::{BodyId, SimConfig, SimError};

/// Public contract for the per-frame collision pipeline.
pub trait SimulationApi {
    /// Construct a pipeline with a validated configuration.
    fn new(cfg: SimConfig) -> Result<Self, SimError>
    where
        Self: Sized;

    /// Advance the simulation one frame: rebuild the spatial index from the
    /// bodies' current positions, advance every body's motion, then refresh
    /// every body's collision flag against the new positions.
    ///
    /// Expects exactly one outstanding call at a time, which `&mut self`
    /// enforces; the index built inside never outlives the call.
    fn tick(&mut self, bodies: &mut [Body]);
}

/// Public contract for a quadtree node.
pub trait SpatialIndexApi {
    /// Try to store a body id under this node by its position. A `false`
    /// return is a normal routing outcome (position outside the node's
    /// region), never an error.
    fn insert(&mut self, id: BodyId, pos: Vec2) -> bool;

    /// Split into exactly four quadrant children the first time capacity is
    /// exceeded. Idempotent: a no-op when children already exist.
    fn subdivide(&mut self);

    /// Append every stored id whose body position lies within `range`,
    /// pruning subtrees whose region does not intersect it. Own bucket
    /// first, then children in quadrant order; callers must not rely on
    /// ordering beyond that.
    fn query(&self, range: &Aabb, bodies: &[Body], out: &mut Vec<BodyId>);
}
