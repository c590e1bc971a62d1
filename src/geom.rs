use glam::Vec2;

use crate::types::SimError;

/// Axis-aligned box: partition region and query range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    /// Validated constructor; rejects non-finite centers and negative or
    /// non-finite half extents.
    pub fn new(center: Vec2, half_extents: Vec2) -> Result<Self, SimError> {
        if !center.is_finite() {
            return Err(SimError::NonFiniteCoordinate(center.x, center.y));
        }
        if !half_extents.is_finite() || half_extents.x < 0.0 || half_extents.y < 0.0 {
            return Err(SimError::InvalidHalfExtents(half_extents.x, half_extents.y));
        }
        Ok(Self { center, half_extents })
    }

    /// Root region spanning an arena of the given dimensions.
    pub fn from_arena(arena: Vec2) -> Self {
        Self {
            center: arena * 0.5,
            half_extents: arena * 0.5,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// True iff `p` lies within the closed box on both axes.
    pub fn contains(&self, p: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Standard AABB-AABB overlap test (closed; shared edges count).
    pub fn intersects(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.x <= reach.x && d.y <= reach.y
    }

    /// The four quadrant regions split at the exact center, in screen-space
    /// order (y grows down): top-left, top-right, bottom-left, bottom-right.
    /// Child half extents are exactly half the parent's.
    pub fn quadrants(&self) -> [Aabb; 4] {
        let q = self.half_extents * 0.5;
        let offsets = [
            Vec2::new(-q.x, -q.y),
            Vec2::new(q.x, -q.y),
            Vec2::new(-q.x, q.y),
            Vec2::new(q.x, q.y),
        ];
        offsets.map(|o| Aabb {
            center: self.center + o,
            half_extents: q,
        })
    }
}

/// A moving circular body. Owned by the caller across frames; the spatial
/// index only ever holds its `BodyId` for the duration of one tick.
#[derive(Copy, Clone, Debug)]
pub struct Body {
    pub pos: Vec2,
    /// Unit-sign direction per axis; scaled by the configured speed in `step`.
    pub dir: Vec2,
    pub radius: f32,
    /// Transient: recomputed every tick.
    pub colliding: bool,
}

impl Body {
    /// Validated constructor; rejects non-finite positions/directions and
    /// non-positive radii.
    pub fn new(pos: Vec2, dir: Vec2, radius: f32) -> Result<Self, SimError> {
        if !pos.is_finite() {
            return Err(SimError::NonFiniteCoordinate(pos.x, pos.y));
        }
        if !dir.is_finite() {
            return Err(SimError::NonFiniteCoordinate(dir.x, dir.y));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SimError::InvalidRadius(radius));
        }
        Ok(Self {
            pos,
            dir,
            radius,
            colliding: false,
        })
    }

    /// Exact overlap test: squared center distance against a fixed combined
    /// radius of `2 * self.radius`. All bodies are assumed to share one
    /// radius; for mixed radii this would be `self.radius + other.radius`.
    pub fn overlaps(&self, other: &Body) -> bool {
        let combined = 2.0 * self.radius;
        self.pos.distance_squared(other.pos) <= combined * combined
    }

    /// Reflect the direction sign on each axis where the body touches or
    /// crosses the arena boundary (inclusive), then advance by `speed * dir`.
    /// An edge clamp, not a positional correction: a body can end one tick
    /// slightly outside and is reflected again by the same check next tick.
    pub fn step(&mut self, arena: Vec2, speed: f32) {
        if self.pos.x >= arena.x - self.radius {
            self.dir.x = -self.dir.x.abs();
        }
        if self.pos.x <= self.radius {
            self.dir.x = self.dir.x.abs();
        }
        if self.pos.y >= arena.y - self.radius {
            self.dir.y = -self.dir.y.abs();
        }
        if self.pos.y <= self.radius {
            self.dir.y = self.dir.y.abs();
        }
        self.pos += speed * self.dir;
    }

    /// The body viewed as a dispatchable shape.
    pub fn shape(&self) -> Shape {
        Shape::Circle {
            center: self.pos,
            radius: self.radius,
        }
    }
}

/// Tagged shape variant for predicate dispatch.
#[derive(Copy, Clone, Debug)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect(Aabb),
}

impl Shape {
    pub fn contains_point(&self, p: Vec2) -> bool {
        match *self {
            Shape::Circle { center, radius } => {
                (p - center).length_squared() <= radius * radius
            }
            Shape::Rect(aabb) => aabb.contains(p),
        }
    }

    /// Tight axis-aligned bounds; for a circle this is the query box the
    /// pipeline sweeps with (half extent = radius).
    pub fn bounding_box(&self) -> Aabb {
        match *self {
            Shape::Circle { center, radius } => Aabb {
                center,
                half_extents: Vec2::splat(radius),
            },
            Shape::Rect(aabb) => aabb,
        }
    }

    pub fn intersects(&self, other: &Shape) -> bool {
        match (*self, *other) {
            (Shape::Circle { center: c0, radius: r0 }, Shape::Circle { center: c1, .. }) => {
                // Fixed combined radius; see `Body::overlaps`.
                let combined = 2.0 * r0;
                c0.distance_squared(c1) <= combined * combined
            }
            (Shape::Rect(a), Shape::Rect(b)) => a.intersects(&b),
            (Shape::Circle { center, radius }, Shape::Rect(aabb))
            | (Shape::Rect(aabb), Shape::Circle { center, radius }) => {
                let closest = center.clamp(aabb.min(), aabb.max());
                (closest - center).length_squared() <= radius * radius
            }
        }
    }
}
