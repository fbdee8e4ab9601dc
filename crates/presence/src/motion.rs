//! Per-identifier kinematic state.
//!
//! The simulator owns every online dot's position and velocity and is the
//! only writer. Dots wander inside their country's borders: a hashed pool
//! point seeds the position, a hashed speed seeds the velocity, a slow sine
//! wobble bends the path, and boundary hits reflect the velocity. A dot
//! that cannot be bounced back inside snaps to a fresh pool point, so the
//! simulator can never stay wedged outside its bounds.

use std::collections::HashMap;

use atlas::{pip, Country};
use foundation::{seed32, LatLng, Mulberry32, Time};
use runtime::clamp_dt;

/// Base drift speed range (degrees per second).
const MIN_BASE_SPEED: f64 = 0.010;
const MAX_BASE_SPEED: f64 = 0.030;
/// Latitude drift is damped relative to longitude so dots wander more
/// east-west than north-south. Visual choice, not geophysics.
const LAT_DRIFT_SCALE: f64 = 0.65;
const LNG_DRIFT_SCALE: f64 = 1.0;
/// Wobble angular frequency (radians per second) and amplitude (deg/s).
const WOBBLE_FREQ: f64 = 0.4;
const WOBBLE_AMP: f64 = 0.004;
/// Fraction of the wobble folded back into the stored velocity on a
/// committed step. This soft coupling is what curves the paths.
const WOBBLE_COUPLING: f64 = 0.15;

/// Kinematic state for one online identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceRecord {
    pub country_id: u32,
    pub position: LatLng,
    /// Degrees per second, (lat, lng).
    pub velocity: (f64, f64),
    wobble_phase: f64,
    last_update: Time,
    resnaps: u32,
}

/// Cumulative simulator counters, for observability only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MotionStats {
    pub seeded: u64,
    pub bounced: u64,
    pub resnapped: u64,
}

#[derive(Debug, Default)]
pub struct MotionSimulator {
    records: HashMap<String, PresenceRecord>,
    stats: MotionStats,
}

impl MotionSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> MotionStats {
        self.stats
    }

    pub fn position_of(&self, identifier: &str) -> Option<LatLng> {
        self.records.get(identifier).map(|r| r.position)
    }

    pub fn record(&self, identifier: &str) -> Option<&PresenceRecord> {
        self.records.get(identifier)
    }

    /// Advance (or seed) the record for `identifier` in `country` and
    /// return the committed position for this tick.
    ///
    /// A missing record, or a record whose country changed, is seeded from
    /// scratch; prior kinematic state is discarded, never resumed.
    pub fn step(&mut self, identifier: &str, country: &Country, now: Time) -> LatLng {
        if let Some(record) = self.records.get_mut(identifier) {
            if record.country_id == country.id {
                return advance(identifier, record, country, now, &mut self.stats);
            }
        }

        self.stats.seeded += 1;
        let record = seed_record(identifier, country, now);
        let position = record.position;
        self.records.insert(identifier.to_owned(), record);
        position
    }

    /// Drop records whose identifier is no longer online.
    pub fn evict_absent(&mut self, is_online: impl Fn(&str) -> bool) {
        self.records.retain(|identifier, _| is_online(identifier));
    }

    /// Release all kinematic state.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Fresh record: position from the hashed pool point, velocity from a
/// distinct hashed seed (base speed plus two independent sign bits).
fn seed_record(identifier: &str, country: &Country, now: Time) -> PresenceRecord {
    let key = country.seed_key();
    let position = country.pool_point(&format!("{identifier}:{key}"));

    let mut rng = Mulberry32::from_key(&format!("{identifier}:{key}:velocity"));
    let base = rng.next_range(MIN_BASE_SPEED, MAX_BASE_SPEED);
    let v_lat = base * LAT_DRIFT_SCALE * rng.next_sign();
    let v_lng = base * LNG_DRIFT_SCALE * rng.next_sign();

    let wobble_phase =
        f64::from(seed32(&format!("{identifier}:phase"))) / f64::from(u32::MAX) * std::f64::consts::TAU;

    PresenceRecord {
        country_id: country.id,
        position,
        velocity: (v_lat, v_lng),
        wobble_phase,
        last_update: now,
        resnaps: 0,
    }
}

fn advance(
    identifier: &str,
    record: &mut PresenceRecord,
    country: &Country,
    now: Time,
    stats: &mut MotionStats,
) -> LatLng {
    let dt = clamp_dt(now.since(record.last_update));
    record.last_update = now;

    // Opposite signs on the two components keep the wobble from simply
    // inflating overall speed.
    let wobble = (now.0 * WOBBLE_FREQ + record.wobble_phase).sin() * WOBBLE_AMP;
    let candidate = LatLng::new(
        record.position.lat_deg + (record.velocity.0 + wobble) * dt,
        record.position.lng_deg + (record.velocity.1 - wobble) * dt,
    );

    if pip::shape_contains(&country.shape, candidate) {
        record.position = candidate;
        record.velocity.0 += wobble * WOBBLE_COUPLING;
        record.velocity.1 -= wobble * WOBBLE_COUPLING;
        return candidate;
    }

    // Bounce: reflect both components and retry one step from the
    // pre-wobble position.
    stats.bounced += 1;
    record.velocity.0 = -record.velocity.0;
    record.velocity.1 = -record.velocity.1;
    let retry = LatLng::new(
        record.position.lat_deg + record.velocity.0 * dt,
        record.position.lng_deg + record.velocity.1 * dt,
    );
    if pip::shape_contains(&country.shape, retry) {
        record.position = retry;
        return retry;
    }

    // Last-resort recovery: snap to a freshly hashed pool point. The resnap
    // counter salts the key so successive recoveries pick different points.
    stats.resnapped += 1;
    record.resnaps += 1;
    let key = country.seed_key();
    record.position =
        country.pool_point(&format!("{identifier}:{key}:resnap:{}", record.resnaps));
    record.position
}

#[cfg(test)]
mod tests {
    use super::MotionSimulator;
    use atlas::pool::PoolConfig;
    use atlas::{BoundaryFeature, BoundarySet, CountryAtlas, CountryShape, PolygonShape, Ring};
    use foundation::{LatLng, Time};

    fn square_shape(min: f64, max: f64) -> CountryShape {
        CountryShape::Polygon(PolygonShape::new(vec![Ring::new(vec![
            LatLng::new(min, min),
            LatLng::new(min, max),
            LatLng::new(max, max),
            LatLng::new(max, min),
        ])]))
    }

    fn two_country_atlas() -> CountryAtlas {
        let set = BoundarySet {
            features: vec![
                BoundaryFeature {
                    code: Some("TL".to_string()),
                    name: "Testland".to_string(),
                    shape: square_shape(9.0, 11.0),
                },
                BoundaryFeature {
                    code: Some("FA".to_string()),
                    name: "Farland".to_string(),
                    shape: square_shape(40.0, 42.0),
                },
            ],
        };
        CountryAtlas::build_with(
            &set,
            PoolConfig {
                target: 64,
                attempts_per_point: 40,
            },
        )
    }

    #[test]
    fn committed_positions_stay_inside_the_country() {
        let atlas = two_country_atlas();
        let testland = atlas.by_code("TL").expect("TL");
        let mut sim = MotionSimulator::new();

        let mut now = Time(0.0);
        for _ in 0..500 {
            let position = sim.step("u1", testland, now);
            assert!(
                atlas::pip::shape_contains(&testland.shape, position),
                "escaped at {now:?}: {position:?}"
            );
            now = Time(now.0 + 0.06);
        }
    }

    #[test]
    fn step_sequences_are_deterministic() {
        let atlas = two_country_atlas();
        let testland = atlas.by_code("TL").expect("TL");
        let mut a = MotionSimulator::new();
        let mut b = MotionSimulator::new();

        for i in 0..100 {
            let now = Time(i as f64 * 0.06);
            assert_eq!(a.step("u1", testland, now), b.step("u1", testland, now));
        }
    }

    #[test]
    fn relocation_reseeds_from_the_new_pool() {
        let atlas = two_country_atlas();
        let testland = atlas.by_code("TL").expect("TL");
        let farland = atlas.by_code("FA").expect("FA");
        let mut sim = MotionSimulator::new();

        let before = sim.step("u1", testland, Time(0.0));
        assert!(atlas::pip::shape_contains(&testland.shape, before));

        // Next tick reports a different country: full reseed, not a
        // continuation of the prior trajectory.
        let after = sim.step("u1", farland, Time(0.06));
        assert!(atlas::pip::shape_contains(&farland.shape, after));
        assert_eq!(after, farland.pool_point("u1:FA"));
        assert_eq!(sim.stats().seeded, 2);
    }

    #[test]
    fn eviction_then_return_is_a_fresh_seed() {
        let atlas = two_country_atlas();
        let testland = atlas.by_code("TL").expect("TL");
        let mut sim = MotionSimulator::new();

        let initial = sim.step("u1", testland, Time(0.0));
        let mut last = initial;
        for i in 1..50 {
            last = sim.step("u1", testland, Time(i as f64 * 0.06));
        }
        assert_ne!(last, initial, "dot should have drifted");

        sim.evict_absent(|_| false);
        assert!(sim.is_empty());

        // Re-adding starts over from the hashed pool point, not from
        // wherever the dot last was.
        let reseeded = sim.step("u1", testland, Time(10.0));
        assert_eq!(reseeded, initial);
        assert_ne!(reseeded, last);
    }

    #[test]
    fn evict_absent_keeps_online_records() {
        let atlas = two_country_atlas();
        let testland = atlas.by_code("TL").expect("TL");
        let mut sim = MotionSimulator::new();
        sim.step("u1", testland, Time(0.0));
        sim.step("u2", testland, Time(0.0));

        sim.evict_absent(|id| id == "u2");
        assert_eq!(sim.len(), 1);
        assert!(sim.position_of("u1").is_none());
        assert!(sim.position_of("u2").is_some());
    }

    #[test]
    fn seeded_velocity_is_bounded_and_biased_east_west() {
        let atlas = two_country_atlas();
        let testland = atlas.by_code("TL").expect("TL");
        let mut sim = MotionSimulator::new();

        for i in 0..32 {
            let id = format!("user-{i}");
            sim.step(&id, testland, Time(0.0));
            let record = sim.record(&id).expect("record");
            let (v_lat, v_lng) = record.velocity;
            assert!((0.010 * 0.65..0.030 * 0.65).contains(&v_lat.abs()));
            assert!((0.010..0.030).contains(&v_lng.abs()));
        }
    }
}
