//! globesim: drive the presence engine end to end without a network.
//!
//! Loads a boundary GeoJSON file, synthesizes a population table and a
//! churning online feed, then runs the animation tick and the slower
//! population-refresh cadence over simulated time, logging aggregate
//! snapshot stats once per simulated second.

use std::cell::Cell;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use atlas::{BoundarySet, CountryAtlas};
use foundation::{Mulberry32, Time};
use presence::{EngineConfig, OnlineUser, PresenceEngine, PresenceSnapshot, SnapshotSink};
use runtime::Cadence;

#[derive(Debug, Parser)]
#[command(name = "globesim", about = "Presence simulation demo driver")]
struct Args {
    /// Path to a boundary GeoJSON FeatureCollection.
    boundaries: PathBuf,

    /// Synthetic population size.
    #[arg(long, default_value_t = 2000)]
    population: usize,

    /// Online identifiers at any moment (drawn from the population).
    #[arg(long, default_value_t = 120)]
    online: usize,

    /// Simulated run length in seconds.
    #[arg(long, default_value_t = 30.0)]
    duration: f64,

    /// Animation tick period in milliseconds.
    #[arg(long, default_value_t = 60)]
    tick_ms: u64,

    /// Population refresh period in seconds.
    #[arg(long, default_value_t = 10.0)]
    refresh_secs: f64,

    /// Identifier rendered with the highlight style.
    #[arg(long)]
    self_id: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = real_main(Args::parse()) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Stand-in for a renderer subscription: counts emitted snapshots.
struct EmitCounter(Rc<Cell<u64>>);

impl SnapshotSink for EmitCounter {
    fn on_snapshot(&mut self, _snapshot: &PresenceSnapshot) {
        self.0.set(self.0.get() + 1);
    }
}

fn real_main(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let payload = fs::read_to_string(&args.boundaries)
        .map_err(|e| format!("read {}: {e}", args.boundaries.display()))?;
    // A dataset that fails to parse is fatal: no geometry, no engine.
    let set = BoundarySet::from_geojson_str(&payload)?;
    let atlas = Arc::new(CountryAtlas::build(&set));
    info!(
        countries = atlas.len(),
        coded = atlas.codes().count(),
        "atlas built"
    );

    let codes: Vec<String> = atlas.codes().map(str::to_string).collect();
    if codes.is_empty() {
        return Err("boundary dataset has no coded countries".into());
    }

    let config = EngineConfig {
        self_identifier: args.self_id.clone(),
        ..EngineConfig::default()
    };
    let mut engine = PresenceEngine::with_config(Arc::clone(&atlas), config);
    let emitted = Rc::new(Cell::new(0u64));
    engine.add_sink(Box::new(EmitCounter(emitted.clone())));

    let mut feed_rng = Mulberry32::from_key("globesim:feed");
    engine.set_population(synth_population(&codes, args.population));
    let mut online = synth_online(&codes, args.online, args.population, &mut feed_rng);
    engine.set_online(online.clone());

    let tick_period = args.tick_ms as f64 / 1000.0;
    let mut refresh = Cadence::new(args.refresh_secs);
    let mut report = Cadence::new(1.0);

    let mut now = Time(0.0);
    while now.0 < args.duration {
        if refresh.due(now) {
            // A real deployment re-queries its data source here; the demo
            // just resynthesizes. Failures would call note_refresh_failure.
            engine.set_population(synth_population(&codes, args.population));
            debug!(at = now.0, "population refreshed");
        }

        churn(&codes, &mut online, args.population, &mut feed_rng);
        engine.set_online(online.clone());
        let snapshot = engine.tick(now);

        if report.due(now) {
            let busiest = snapshot
                .by_country
                .iter()
                .max_by_key(|(_, counts)| counts.online)
                .map(|(code, counts)| format!("{code}:{}", counts.online))
                .unwrap_or_else(|| "-".to_string());
            info!(
                tick = snapshot.tick_index,
                online = snapshot.total_online,
                rendered = snapshot.points.len(),
                population = snapshot.total_population,
                busiest = %busiest,
                "snapshot"
            );
        }

        now = Time(now.0 + tick_period);
    }

    info!(snapshots = emitted.get(), "run complete");
    for (name, value) in engine.metrics().gauges {
        info!(gauge = %name, value, "final gauge");
    }
    Ok(())
}

fn identifier(i: usize) -> String {
    format!("user-{i}")
}

fn synth_population(codes: &[String], size: usize) -> Vec<(String, String)> {
    (0..size)
        .map(|i| (identifier(i), codes[i % codes.len()].clone()))
        .collect()
}

fn synth_online(
    codes: &[String],
    online: usize,
    population: usize,
    rng: &mut Mulberry32,
) -> Vec<OnlineUser> {
    let mut seen = HashSet::new();
    let mut users = Vec::with_capacity(online);
    while users.len() < online && seen.len() < population {
        let i = (rng.next_f64() * population as f64) as usize;
        if seen.insert(i) {
            users.push(OnlineUser::new(identifier(i), codes[i % codes.len()].clone()));
        }
    }
    users
}

/// Join/leave/relocation churn: each tick a few dots leave, a few join,
/// and occasionally one reports a different country than its census home.
fn churn(
    codes: &[String],
    online: &mut Vec<OnlineUser>,
    population: usize,
    rng: &mut Mulberry32,
) {
    if !online.is_empty() && rng.next_f64() < 0.3 {
        let gone = (rng.next_f64() * online.len() as f64) as usize;
        online.swap_remove(gone);
    }
    if rng.next_f64() < 0.3 {
        let i = (rng.next_f64() * population as f64) as usize;
        let id = identifier(i);
        if !online.iter().any(|u| u.identifier == id) {
            online.push(OnlineUser::new(id, codes[i % codes.len()].clone()));
        }
    }
    if !online.is_empty() && rng.next_f64() < 0.05 {
        let moved = (rng.next_f64() * online.len() as f64) as usize;
        let new_code = codes[(rng.next_f64() * codes.len() as f64) as usize].clone();
        online[moved].country_code = Some(new_code);
    }
}
