use std::collections::BTreeMap;

use serde::Serialize;

/// Style applied to one rendered presence dot. The renderer owns any
/// further projection or easing; the snapshot already carries color and
/// radius so a dumb sink can draw it directly.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct DotStyle {
    /// RGBA.
    pub color: [u8; 4],
    pub radius: f32,
}

impl DotStyle {
    pub const fn new(color: [u8; 4], radius: f32) -> Self {
        Self { color, radius }
    }

    /// Default style for other people's dots.
    pub const ONLINE: DotStyle = DotStyle::new([64, 220, 180, 255], 1.5);
    /// Highlight style for the session's own dot.
    pub const SELF: DotStyle = DotStyle::new([255, 196, 64, 255], 2.5);
}

/// One renderable presence dot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresencePoint {
    pub identifier: String,
    pub lat_deg: f64,
    pub lng_deg: f64,
    pub color: [u8; 4],
    pub radius: f32,
}

/// Per-country population and online counts.
///
/// `online` derives from the live feed and `total` from the population
/// table; with inconsistent inputs `online` can exceed `total`. Accepted
/// data-quality assumption, not enforced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Default)]
pub struct CountryCounts {
    pub total: u64,
    pub online: u64,
}

/// One tick's complete aggregate output. Immutable once emitted: the
/// engine never hands out a partially-computed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct PresenceSnapshot {
    pub tick_index: u64,
    pub points: Vec<PresencePoint>,
    pub online_identifiers: Vec<String>,
    pub total_population: u64,
    pub total_online: u64,
    /// Sorted by code for stable iteration and serialization.
    pub by_country: BTreeMap<String, CountryCounts>,
}

impl PresenceSnapshot {
    pub fn online_for(&self, code: &str) -> u64 {
        self.by_country.get(code).map(|c| c.online).unwrap_or(0)
    }
}

/// Per-tick consumer of finished snapshots (globe renderer, stats panel).
pub trait SnapshotSink {
    fn on_snapshot(&mut self, snapshot: &PresenceSnapshot);
}
