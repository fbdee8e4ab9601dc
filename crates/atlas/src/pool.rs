//! Interior sample-point pools.
//!
//! Every country gets a pool of precomputed points that are genuinely
//! inside its geometry, produced by bounding-box rejection sampling against
//! the point-in-polygon engine. Presence dots seed from these pools, which
//! is what keeps "people" off the ocean.

use crate::pip;
use crate::shape::CountryShape;
use foundation::{GeoBounds, LatLng, Mulberry32};

/// Target pool size and the per-point attempt multiplier.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Points to aim for per country.
    pub target: usize,
    /// Give up after `target * attempts_per_point` draws. Thin or sliver
    /// geometries may never reach target density from bbox rejection.
    pub attempts_per_point: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            target: 420,
            attempts_per_point: 40,
        }
    }
}

impl PoolConfig {
    pub fn max_attempts(&self) -> usize {
        self.target.saturating_mul(self.attempts_per_point)
    }
}

/// Remaining-draw budget for one country's rejection sampling.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SampleBudget {
    remaining: usize,
}

impl SampleBudget {
    pub fn new(attempts: usize) -> Self {
        Self {
            remaining: attempts,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Consumes one draw; returns `false` once the budget is spent.
    pub fn try_draw(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Generate the interior pool for one country.
///
/// Draws uniform points inside `bounds` and keeps those the PIP engine
/// accepts, until the pool reaches `config.target` or the attempt budget
/// runs out. A country that never accepts a point (degenerate or unindexed
/// geometry) falls back to a single-element centroid pool; that one point
/// may legitimately sit on or outside the boundary.
pub fn generate(
    shape: &CountryShape,
    bounds: GeoBounds,
    centroid: LatLng,
    seed_key: &str,
    config: PoolConfig,
) -> Vec<LatLng> {
    let mut pool = Vec::new();

    if shape.is_indexed() && !bounds.is_empty() {
        let mut rng = Mulberry32::from_key(seed_key);
        let mut budget = SampleBudget::new(config.max_attempts());
        while pool.len() < config.target && budget.try_draw() {
            let candidate = LatLng::new(
                rng.next_range(bounds.min_lat, bounds.max_lat),
                rng.next_range(bounds.min_lng, bounds.max_lng),
            );
            if pip::shape_contains(shape, candidate) {
                pool.push(candidate);
            }
        }
    }

    if pool.is_empty() {
        tracing::debug!(seed_key, "pool fell back to centroid-only");
        pool.push(centroid);
    }
    pool
}
