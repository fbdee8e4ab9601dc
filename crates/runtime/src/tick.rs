use foundation::time::Time;

/// Shortest elapsed time integrated in one tick (seconds).
pub const MIN_TICK_DT_S: f64 = 0.016;
/// Longest elapsed time integrated in one tick (seconds). A stalled or
/// suspended driver resumes with one bounded step instead of a runaway jump.
pub const MAX_TICK_DT_S: f64 = 0.25;

/// Timebase for one animation tick.
///
/// This is the primary clock handed to the simulation: a 0-based index, the
/// wall-clock time at the start of the tick, and the clamped elapsed time
/// since the previous tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tick {
    /// 0-based tick index.
    pub index: u64,
    /// Wall-clock time at the start of the tick (seconds).
    pub time: Time,
    /// Elapsed seconds since the previous tick, clamped to
    /// `[MIN_TICK_DT_S, MAX_TICK_DT_S]`.
    pub dt_s: f64,
}

impl Tick {
    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            time,
            dt_s: MIN_TICK_DT_S,
        }
    }

    pub fn next(self, time: Time) -> Self {
        Self {
            index: self.index + 1,
            time,
            dt_s: clamp_dt(time.since(self.time)),
        }
    }
}

/// Clamp a raw elapsed-seconds value into the integration window.
pub fn clamp_dt(raw_s: f64) -> f64 {
    raw_s.clamp(MIN_TICK_DT_S, MAX_TICK_DT_S)
}

#[cfg(test)]
mod tests {
    use super::{clamp_dt, Tick, MAX_TICK_DT_S, MIN_TICK_DT_S};
    use foundation::time::Time;

    #[test]
    fn next_advances_index_and_clamps_dt() {
        let t0 = Tick::first(Time(100.0));
        assert_eq!(t0.index, 0);

        let t1 = t0.next(Time(100.060));
        assert_eq!(t1.index, 1);
        assert!((t1.dt_s - 0.060).abs() < 1e-12);
    }

    #[test]
    fn clamp_bounds_runaway_and_tiny_steps() {
        assert_eq!(clamp_dt(0.0), MIN_TICK_DT_S);
        assert_eq!(clamp_dt(5.0), MAX_TICK_DT_S);
        assert_eq!(clamp_dt(0.1), 0.1);
        // A tab-suspend style stall resumes with one bounded step.
        let t0 = Tick::first(Time(0.0));
        let t1 = t0.next(Time(30.0));
        assert_eq!(t1.dt_s, MAX_TICK_DT_S);
    }

    #[test]
    fn negative_elapsed_clamps_to_minimum() {
        let t0 = Tick::first(Time(10.0));
        let t1 = t0.next(Time(9.0));
        assert_eq!(t1.dt_s, MIN_TICK_DT_S);
    }
}
