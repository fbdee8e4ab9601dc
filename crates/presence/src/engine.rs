//! The presence engine: single owner of all live per-identifier state.
//!
//! Two independent periodic sources drive it (a fast animation tick and a
//! slow population refresh), but all mutation happens inside its methods
//! on one logical thread. Every `tick` produces one fully-consistent
//! snapshot; the population table is swapped wholesale between ticks, so a
//! tick never mixes half-updated totals with fresh online counts.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use atlas::CountryAtlas;
use foundation::Time;
use runtime::metrics::{Metrics, MetricsSnapshot};
use runtime::Tick;

use crate::feed::OnlineUser;
use crate::motion::MotionSimulator;
use crate::population::PopulationTable;
use crate::snapshot::{CountryCounts, DotStyle, PresencePoint, PresenceSnapshot, SnapshotSink};

/// Dot styling plus the session's own identifier, which gets the
/// highlight style.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub dot_style: DotStyle,
    pub self_style: DotStyle,
    pub self_identifier: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dot_style: DotStyle::ONLINE,
            self_style: DotStyle::SELF,
            self_identifier: None,
        }
    }
}

pub struct PresenceEngine {
    atlas: Arc<CountryAtlas>,
    config: EngineConfig,
    population: Arc<PopulationTable>,
    online: Vec<OnlineUser>,
    motion: MotionSimulator,
    tick: Option<Tick>,
    metrics: Metrics,
    sinks: Vec<Box<dyn SnapshotSink>>,
}

impl PresenceEngine {
    pub fn new(atlas: Arc<CountryAtlas>) -> Self {
        Self::with_config(atlas, EngineConfig::default())
    }

    pub fn with_config(atlas: Arc<CountryAtlas>, config: EngineConfig) -> Self {
        Self {
            atlas,
            config,
            population: Arc::new(PopulationTable::default()),
            online: Vec::new(),
            motion: MotionSimulator::new(),
            tick: None,
            metrics: Metrics::new(),
            sinks: Vec::new(),
        }
    }

    pub fn atlas(&self) -> &CountryAtlas {
        &self.atlas
    }

    pub fn population(&self) -> &PopulationTable {
        &self.population
    }

    /// Register a per-tick snapshot consumer.
    pub fn add_sink(&mut self, sink: Box<dyn SnapshotSink>) {
        self.sinks.push(sink);
    }

    /// Replace the online set from the live feed. Identifiers that
    /// disappeared are evicted on the next tick.
    pub fn set_online(&mut self, users: Vec<OnlineUser>) {
        self.online = users;
    }

    /// Copy-on-write population refresh: builds a new table and swaps the
    /// handle, so a tick that pinned the old table keeps a coherent view.
    pub fn set_population<I, A, B>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        self.population = Arc::new(PopulationTable::from_pairs(pairs));
    }

    /// A failed refresh keeps the last-known data: stale-but-available
    /// beats halting the simulation. Observable, never raised to sinks.
    pub fn note_refresh_failure(&mut self, source: &str, reason: &str) {
        self.metrics.inc_counter("refresh_failures", 1);
        tracing::warn!(source, reason, "refresh failed; keeping last-known data");
    }

    /// Run one animation tick: resolve every online identifier, advance
    /// its dot, aggregate counts, emit one immutable snapshot.
    pub fn tick(&mut self, now: Time) -> Arc<PresenceSnapshot> {
        let tick = match self.tick {
            Some(previous) => previous.next(now),
            None => Tick::first(now),
        };
        self.tick = Some(tick);

        // Pin the population table for the whole tick.
        let population = Arc::clone(&self.population);

        let mut by_country: BTreeMap<String, CountryCounts> = BTreeMap::new();
        for (code, total) in population.code_totals() {
            by_country.insert(code.to_string(), CountryCounts { total, online: 0 });
        }

        let mut points = Vec::with_capacity(self.online.len());
        let mut online_identifiers = Vec::with_capacity(self.online.len());
        let mut skipped = 0u64;

        for user in &self.online {
            online_identifiers.push(user.identifier.clone());

            let resolved = user
                .country_code
                .as_deref()
                .or_else(|| population.home_code(&user.identifier));
            let Some(code) = resolved else {
                skipped += 1;
                continue;
            };
            let Some(country) = self.atlas.by_code(code) else {
                skipped += 1;
                continue;
            };

            by_country.entry(code.to_string()).or_default().online += 1;

            let position = self.motion.step(&user.identifier, country, now);
            let style = if self.config.self_identifier.as_deref() == Some(&user.identifier) {
                self.config.self_style
            } else {
                self.config.dot_style
            };
            points.push(PresencePoint {
                identifier: user.identifier.clone(),
                lat_deg: position.lat_deg,
                lng_deg: position.lng_deg,
                color: style.color,
                radius: style.radius,
            });
        }

        // Garbage-collect kinematic state for identifiers that left.
        let active: HashSet<&str> = self.online.iter().map(|u| u.identifier.as_str()).collect();
        self.motion.evict_absent(|identifier| active.contains(identifier));

        let stats = self.motion.stats();
        self.metrics.inc_counter("identifiers_skipped", skipped);
        self.metrics.set_gauge("online", online_identifiers.len() as i64);
        self.metrics.set_gauge("rendered", points.len() as i64);
        self.metrics.set_gauge("reseeds_total", stats.seeded as i64);
        self.metrics.set_gauge("bounces_total", stats.bounced as i64);
        self.metrics.set_gauge("resnaps_total", stats.resnapped as i64);

        let snapshot = Arc::new(PresenceSnapshot {
            tick_index: tick.index,
            total_online: online_identifiers.len() as u64,
            total_population: population.total_population(),
            points,
            online_identifiers,
            by_country,
        });
        for sink in &mut self.sinks {
            sink.on_snapshot(snapshot.as_ref());
        }
        snapshot
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Halt the simulation: releases all per-identifier kinematic state
    /// and the online set. The next tick starts from scratch.
    pub fn stop(&mut self) {
        self.motion.clear();
        self.online.clear();
        self.tick = None;
    }
}
