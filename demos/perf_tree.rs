use glam::Vec2;
use quadbounce::*;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn build_bodies(n: usize, arena: Vec2, seed0: u32) -> Result<Vec<Body>, SimError> {
    let mut seed = seed0;
    let mut bodies = Vec::with_capacity(n);
    for _ in 0..n {
        let x = (lcg(&mut seed) as f32 / u32::MAX as f32) * arena.x;
        let y = (lcg(&mut seed) as f32 / u32::MAX as f32) * arena.y;
        let dx = if lcg(&mut seed) & 1 == 1 { 1.0 } else { -1.0 };
        let dy = if lcg(&mut seed) & 1 == 1 { 1.0 } else { -1.0 };
        bodies.push(Body::new(Vec2::new(x, y), Vec2::new(dx, dy), 4.0)?);
    }
    Ok(bodies)
}

fn main() -> Result<(), SimError> {
    env_logger::init();

    let arena = Vec2::new(2000.0, 2000.0);
    let n_vals = [1_000usize, 5_000, 10_000, 20_000];
    let capacities = [1usize, 3, 8, 16];

    println!("n,capacity,tick_ms,build_ms,sweep_ms,nodes,candidate_tests,hits");
    for &n in &n_vals {
        for &capacity in &capacities {
            let mut sim = Simulation::new(SimConfig {
                arena,
                speed: 2.0,
                capacity,
                max_depth: 16,
                collect_regions: false,
                enable_timing: true,
            })?;
            let mut bodies = build_bodies(n, arena, 1)?;
            sim.tick(&mut bodies);
            let t = sim.timing().unwrap_or_default();
            let stats = sim.stats().unwrap_or_default();
            println!(
                "{},{},{:.3},{:.3},{:.3},{},{},{}",
                n,
                capacity,
                t.tick_ms,
                t.build_ms,
                t.sweep_ms,
                stats.nodes,
                stats.candidates_tested,
                stats.overlap_hits
            );
        }
    }
    Ok(())
}
