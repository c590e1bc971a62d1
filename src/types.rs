use glam::Vec2;
use thiserror::Error;

/// Frame-local handle: index of a body in the caller's slice for this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

impl BodyId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Construction-time validation failures. Fail-fast: once inputs are built,
/// a tick cannot fail.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("coordinate is not finite: ({0}, {1})")]
    NonFiniteCoordinate(f32, f32),
    #[error("radius must be finite and positive, got {0}")]
    InvalidRadius(f32),
    #[error("half extents must be finite and non-negative, got ({0}, {1})")]
    InvalidHalfExtents(f32, f32),
    #[error("arena must have finite positive dimensions, got ({0}, {1})")]
    InvalidArena(f32, f32),
    #[error("speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f32),
    #[error("bucket capacity must be at least 1")]
    ZeroCapacity,
}

/// Configuration for the per-frame collision pipeline.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Arena dimensions (width, height); the root tree region spans it.
    pub arena: Vec2,
    /// Distance a body travels per tick along each unit-sign axis.
    pub speed: f32,
    /// Bodies a leaf bucket holds before the node subdivides.
    pub capacity: usize,
    /// Nodes at this depth stop subdividing and let their bucket overflow,
    /// so coincident bodies cannot recurse unboundedly.
    pub max_depth: u8,
    /// Capture (depth, region) per tree node each tick for visualization.
    pub collect_regions: bool,
    /// Enable per-phase timing instrumentation (adds small overhead).
    pub enable_timing: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena: Vec2::new(500.0, 500.0),
            speed: 2.0,
            capacity: 3,
            max_depth: 16,
            collect_regions: false,
            enable_timing: false,
        }
    }
}

/// Debug/performance statistics for the last completed tick.
#[derive(Copy, Clone, Debug, Default)]
pub struct TickStats {
    pub bodies: usize,
    /// Bodies whose center fell outside the arena and were not indexed.
    pub dropped: usize,
    /// Tree nodes after the build pass.
    pub nodes: usize,
    /// Exact tests run across all candidate sets (counts ordered pairs).
    pub candidates_tested: usize,
    /// Positive exact tests (ordered; each colliding pair counts twice).
    pub overlap_hits: usize,
}

/// Timing breakdown for the last completed tick.
#[derive(Copy, Clone, Debug, Default)]
pub struct TickTiming {
    pub tick_ms: f64,
    /// Pass 1: tree build + motion update + flag clear.
    pub build_ms: f64,
    /// Pass 2: candidate queries + exact tests.
    pub sweep_ms: f64,
}
