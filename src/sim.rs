use std::time::Instant;

use crate::api::{SimulationApi, SpatialIndexApi};
use crate::geom::{Aabb, Body};
use crate::quadtree::QuadTree;
use crate::types::{BodyId, SimConfig, SimError, TickStats, TickTiming};

/// Per-frame broad-phase collision pipeline. Stateless between frames apart
/// from diagnostics: every `tick` rebuilds its working tree from the
/// caller-owned body slice and discards it before returning.
pub struct Simulation {
    pub cfg: SimConfig,
    pub frame_counter: u32,

    // Diagnostics for the last completed tick
    last_stats: Option<TickStats>,
    last_timing: Option<TickTiming>,
    last_regions: Vec<(u8, Aabb)>,
}

impl SimulationApi for Simulation {
    fn new(cfg: SimConfig) -> Result<Self, SimError> {
        if !cfg.arena.is_finite() || cfg.arena.x <= 0.0 || cfg.arena.y <= 0.0 {
            return Err(SimError::InvalidArena(cfg.arena.x, cfg.arena.y));
        }
        if !cfg.speed.is_finite() || cfg.speed < 0.0 {
            return Err(SimError::InvalidSpeed(cfg.speed));
        }
        if cfg.capacity == 0 {
            return Err(SimError::ZeroCapacity);
        }
        Ok(Self {
            cfg,
            frame_counter: 0,
            last_stats: None,
            last_timing: None,
            last_regions: Vec::new(),
        })
    }

    fn tick(&mut self, bodies: &mut [Body]) {
        let t_all = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        self.frame_counter = self.frame_counter.wrapping_add(1);

        // Pass 1: index every body at its current position, then advance its
        // motion and clear its flag. Indexing happens before the move so the
        // tree routes by the positions the caller handed in.
        let t_build = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        let mut tree = QuadTree::new(
            Aabb::from_arena(self.cfg.arena),
            self.cfg.capacity,
            self.cfg.max_depth,
        );
        let mut dropped = 0usize;
        for (i, body) in bodies.iter_mut().enumerate() {
            if !tree.insert(BodyId(i as u32), body.pos) {
                // Normal routing outcome: center outside the arena. The body
                // still moves and can re-enter on a later frame.
                dropped += 1;
                log::debug!(
                    "body {i} at ({:.2}, {:.2}) outside arena, not indexed this frame",
                    body.pos.x,
                    body.pos.y
                );
            }
            body.step(self.cfg.arena, self.cfg.speed);
            body.colliding = false;
        }
        let build_ms = t_build.map_or(0.0, |t| t.elapsed().as_secs_f64() * 1000.0);

        // Pass 2: all motion is advanced, so every exact test sees the new
        // frame's positions consistently. Query box = the body's circle
        // bounds around its post-update center.
        let t_sweep = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        let mut tested = 0usize;
        let mut hits = 0usize;
        let mut candidates: Vec<BodyId> = Vec::new();
        for i in 0..bodies.len() {
            let range = bodies[i].shape().bounding_box();
            candidates.clear();
            tree.query(&range, bodies, &mut candidates);
            for &id in &candidates {
                let j = id.index();
                if j == i {
                    continue;
                }
                tested += 1;
                if bodies[i].overlaps(&bodies[j]) {
                    bodies[i].colliding = true;
                    bodies[j].colliding = true;
                    hits += 1;
                }
            }
        }
        let sweep_ms = t_sweep.map_or(0.0, |t| t.elapsed().as_secs_f64() * 1000.0);

        if self.cfg.collect_regions {
            let mut regions = Vec::with_capacity(tree.node_count());
            tree.each_region(&mut |depth, region| regions.push((depth, *region)));
            self.last_regions = regions;
        } else {
            self.last_regions.clear();
        }

        self.last_stats = Some(TickStats {
            bodies: bodies.len(),
            dropped,
            nodes: tree.node_count(),
            candidates_tested: tested,
            overlap_hits: hits,
        });
        self.last_timing = t_all.map(|t| TickTiming {
            tick_ms: t.elapsed().as_secs_f64() * 1000.0,
            build_ms,
            sweep_ms,
        });

        log::trace!(
            "frame {}: {} bodies, {} dropped, {} candidate tests, {} hits",
            self.frame_counter,
            bodies.len(),
            dropped,
            tested,
            hits
        );
    }
}

impl Simulation {
    /// Stats for the last completed tick.
    pub fn stats(&self) -> Option<TickStats> {
        self.last_stats
    }

    /// Timing breakdown for the last tick, when `enable_timing` is set.
    pub fn timing(&self) -> Option<TickTiming> {
        self.last_timing
    }

    /// (depth, region) per tree node from the last tick, when
    /// `collect_regions` is set. Advisory; for visualization only.
    pub fn regions(&self) -> &[(u8, Aabb)] {
        &self.last_regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn cfg() -> SimConfig {
        SimConfig {
            arena: Vec2::new(500.0, 500.0),
            speed: 2.0,
            capacity: 3,
            max_depth: 16,
            collect_regions: false,
            enable_timing: false,
        }
    }

    fn body(x: f32, y: f32, dx: f32, dy: f32, r: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(dx, dy), r).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert!(Simulation::new(SimConfig { arena: Vec2::new(0.0, 100.0), ..cfg() }).is_err());
        assert!(Simulation::new(SimConfig { arena: Vec2::new(100.0, f32::NAN), ..cfg() }).is_err());
        assert!(Simulation::new(SimConfig { speed: -1.0, ..cfg() }).is_err());
        assert!(Simulation::new(SimConfig { capacity: 0, ..cfg() }).is_err());
        assert!(Simulation::new(cfg()).is_ok());
    }

    #[test]
    fn test_close_pair_flags_both() {
        let mut sim = Simulation::new(cfg()).unwrap();
        // Parallel directions keep the separation at 10 through the update
        let mut bodies = vec![
            body(200.0, 200.0, 1.0, 1.0, 12.0),
            body(210.0, 200.0, 1.0, 1.0, 12.0),
        ];
        sim.tick(&mut bodies);
        assert!(bodies[0].colliding);
        assert!(bodies[1].colliding);
        let stats = sim.stats().unwrap();
        assert_eq!(stats.bodies, 2);
        assert_eq!(stats.dropped, 0);
        assert!(stats.overlap_hits >= 2);
    }

    #[test]
    fn test_distant_pair_stays_unflagged() {
        let mut sim = Simulation::new(cfg()).unwrap();
        let mut bodies = vec![
            body(5.0, 250.0, 1.0, 1.0, 12.0),
            body(495.0, 250.0, -1.0, 1.0, 12.0),
        ];
        sim.tick(&mut bodies);
        assert!(!bodies[0].colliding);
        assert!(!bodies[1].colliding);
    }

    #[test]
    fn test_flags_reflect_post_update_positions() {
        let mut sim = Simulation::new(cfg()).unwrap();
        // Pre-update the centers are 16 apart, outside either query box
        // (half extent 12); after both advance toward each other they are 12
        // apart, inside it and overlapping. Only a full pass of motion
        // before any test catches this pair.
        let mut bodies = vec![
            body(100.0, 100.0, 1.0, 0.0, 12.0),
            body(116.0, 100.0, -1.0, 0.0, 12.0),
        ];
        sim.tick(&mut bodies);
        assert_eq!(bodies[0].pos, Vec2::new(102.0, 100.0));
        assert_eq!(bodies[1].pos, Vec2::new(114.0, 100.0));
        assert!(bodies[0].colliding);
        assert!(bodies[1].colliding);
    }

    #[test]
    fn test_flag_symmetry_matches_direct_test() {
        let mut sim = Simulation::new(cfg()).unwrap();
        let mut bodies = vec![
            body(250.0, 250.0, 1.0, 1.0, 12.0),
            body(258.0, 250.0, 1.0, 1.0, 12.0),
            body(400.0, 100.0, -1.0, 1.0, 12.0),
        ];
        sim.tick(&mut bodies);
        for i in 0..bodies.len() {
            for j in 0..bodies.len() {
                if i != j && bodies[i].colliding && bodies[j].colliding {
                    // An independently computed exact test agrees both ways
                    assert_eq!(bodies[i].overlaps(&bodies[j]), bodies[j].overlaps(&bodies[i]));
                }
            }
        }
        assert!(bodies[0].colliding && bodies[1].colliding);
        assert!(!bodies[2].colliding);
    }

    #[test]
    fn test_out_of_arena_body_counted_dropped() {
        let mut sim = Simulation::new(cfg()).unwrap();
        let mut bodies = vec![
            body(250.0, 250.0, 1.0, 1.0, 12.0),
            body(600.0, 250.0, -1.0, 1.0, 12.0),
        ];
        sim.tick(&mut bodies);
        let stats = sim.stats().unwrap();
        assert_eq!(stats.dropped, 1);
        assert!(!bodies[0].colliding);
        assert!(!bodies[1].colliding);
        // The dropped body still advanced
        assert_ne!(bodies[1].pos, Vec2::new(600.0, 250.0));
    }

    #[test]
    fn test_flag_cleared_when_pair_separates() {
        let mut sim = Simulation::new(cfg()).unwrap();
        let mut a = body(200.0, 200.0, 1.0, 1.0, 12.0);
        a.colliding = true;
        let mut bodies = vec![a, body(420.0, 400.0, 1.0, 1.0, 12.0)];
        sim.tick(&mut bodies);
        assert!(!bodies[0].colliding);
    }

    #[test]
    fn test_regions_collected_when_enabled() {
        let mut sim = Simulation::new(SimConfig {
            collect_regions: true,
            enable_timing: true,
            ..cfg()
        })
        .unwrap();
        let mut bodies: Vec<Body> = (0..16)
            .map(|i| body(50.0 + 25.0 * i as f32, 250.0, 1.0, 1.0, 12.0))
            .collect();
        sim.tick(&mut bodies);
        let stats = sim.stats().unwrap();
        assert_eq!(sim.regions().len(), stats.nodes);
        // Root first, spanning the whole arena
        let (depth, root) = sim.regions()[0];
        assert_eq!(depth, 0);
        assert_eq!(root, Aabb::from_arena(Vec2::new(500.0, 500.0)));
        assert!(sim.timing().unwrap().tick_ms >= 0.0);
    }

    #[test]
    fn test_tick_is_rebuilt_each_frame() {
        let mut sim = Simulation::new(SimConfig { collect_regions: true, ..cfg() }).unwrap();
        let mut many: Vec<Body> = (0..32)
            .map(|i| body(10.0 + 15.0 * i as f32, 100.0, 1.0, 1.0, 5.0))
            .collect();
        sim.tick(&mut many);
        let nodes_many = sim.stats().unwrap().nodes;
        assert!(nodes_many > 1);

        let mut few = vec![body(250.0, 250.0, 1.0, 1.0, 5.0)];
        sim.tick(&mut few);
        // No tree state survives: the next frame's tree matches its input
        assert_eq!(sim.stats().unwrap().nodes, 1);
        assert_eq!(sim.regions().len(), 1);
        assert_eq!(sim.frame_counter, 2);
    }
}
