use glam::Vec2;

use crate::api::SpatialIndexApi;
use crate::geom::{Aabb, Body};
use crate::types::BodyId;

/// Adaptive spatial index: each node owns a region and either a
/// capacity-bounded bucket of body ids or exactly four children.
///
/// Known caveat carried over from the reference behavior: bodies stored in a
/// node before it subdivides stay in that node's bucket and are not pushed
/// into children, so queries check every node's own bucket even after a
/// split.
pub struct QuadTree {
    region: Aabb,
    bucket: Vec<BodyId>,
    children: Option<Box<[QuadTree; 4]>>,
    capacity: usize,
    depth: u8,
    max_depth: u8,
}

impl QuadTree {
    pub fn new(region: Aabb, capacity: usize, max_depth: u8) -> Self {
        Self {
            region,
            bucket: Vec::new(),
            children: None,
            capacity: capacity.max(1),
            depth: 0,
            max_depth,
        }
    }

    fn child(&self, region: Aabb) -> Self {
        Self {
            region,
            bucket: Vec::new(),
            children: None,
            capacity: self.capacity,
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }

    pub fn region(&self) -> &Aabb {
        &self.region
    }

    /// Total nodes in the subtree, this one included.
    pub fn node_count(&self) -> usize {
        let below: usize = match &self.children {
            Some(children) => children.iter().map(QuadTree::node_count).sum(),
            None => 0,
        };
        1 + below
    }

    /// Read-only structure walk for visualization: calls `f` with each
    /// node's depth and region, parent before children, children in
    /// quadrant order. Advisory only.
    pub fn each_region(&self, f: &mut impl FnMut(u8, &Aabb)) {
        f(self.depth, &self.region);
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.each_region(f);
            }
        }
    }
}

impl SpatialIndexApi for QuadTree {
    fn insert(&mut self, id: BodyId, pos: Vec2) -> bool {
        // A false return means "does not belong under this node", which
        // covers both out-of-arena bodies and routing misses at the root.
        if !self.region.contains(pos) {
            return false;
        }

        if self.children.is_none() {
            // The depth guard turns the bucket into an unbounded overflow
            // bin instead of recursing on (near-)coincident bodies.
            if self.bucket.len() < self.capacity || self.depth >= self.max_depth {
                self.bucket.push(id);
                return true;
            }
            self.subdivide();
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.insert(id, pos) {
                    return true;
                }
            }
        }

        false
    }

    fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }
        // Existing bucket entries stay put; they are not redistributed.
        let regions = self.region.quadrants();
        self.children = Some(Box::new(regions.map(|r| self.child(r))));
    }

    fn query(&self, range: &Aabb, bodies: &[Body], out: &mut Vec<BodyId>) {
        if !self.region.intersects(range) {
            return;
        }

        // Own bucket first; positions are read live from the caller's slice
        // so filtering reflects the bodies' current coordinates.
        for &id in &self.bucket {
            if let Some(body) = bodies.get(id.index()) {
                if range.contains(body.pos) {
                    out.push(id);
                }
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(range, bodies, out);
            }
        }
    }
}
