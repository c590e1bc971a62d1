use glam::Vec2;
use quadbounce::*;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn main() -> Result<(), SimError> {
    env_logger::init();

    let cfg = SimConfig {
        arena: Vec2::new(500.0, 500.0),
        speed: 2.0,
        capacity: 3,
        max_depth: 16,
        collect_regions: true,
        enable_timing: true,
    };
    let mut sim = Simulation::new(cfg.clone())?;

    let mut seed = 1u32;
    let mut bodies = Vec::with_capacity(50);
    for _ in 0..50 {
        let x = (lcg(&mut seed) as f32 / u32::MAX as f32) * cfg.arena.x;
        let y = (lcg(&mut seed) as f32 / u32::MAX as f32) * cfg.arena.y;
        let dx = if lcg(&mut seed) & 1 == 1 { 1.0 } else { -1.0 };
        let dy = if lcg(&mut seed) & 1 == 1 { 1.0 } else { -1.0 };
        bodies.push(Body::new(Vec2::new(x, y), Vec2::new(dx, dy), 12.0)?);
    }

    for frame in 0..120 {
        sim.tick(&mut bodies);
        let colliding = bodies.iter().filter(|b| b.colliding).count();
        let stats = sim.stats().unwrap_or_default();
        if frame % 20 == 0 {
            println!(
                "frame {frame:3}: {colliding:2} colliding, {} tree nodes, {} candidate tests",
                stats.nodes, stats.candidates_tested
            );
        }
    }

    // Final tree layout, one line per depth level
    let mut per_depth = [0usize; 32];
    for &(depth, _) in sim.regions() {
        per_depth[depth as usize] += 1;
    }
    for (depth, count) in per_depth.iter().enumerate().filter(|&(_, &c)| c > 0) {
        println!("depth {depth}: {count} regions");
    }
    if let Some(t) = sim.timing() {
        println!(
            "last tick: {:.3}ms (build {:.3}ms, sweep {:.3}ms)",
            t.tick_ms, t.build_ms, t.sweep_ms
        );
    }
    Ok(())
}
