use foundation::time::Time;

/// Fixed-period trigger for the engine's independent periodic sources
/// (fast animation ticks, slow population refresh).
///
/// `due` is edge-triggered: it fires at most once per period and re-arms
/// relative to the time it fired, so a stalled driver does not replay a
/// backlog of missed periods.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cadence {
    period_s: f64,
    next_due: Option<Time>,
}

impl Cadence {
    pub fn new(period_s: f64) -> Self {
        Self {
            period_s,
            next_due: None,
        }
    }

    pub fn period_s(&self) -> f64 {
        self.period_s
    }

    /// Returns `true` if the period has elapsed (always true on first call).
    pub fn due(&mut self, now: Time) -> bool {
        match self.next_due {
            Some(next) if now < next => false,
            _ => {
                self.next_due = Some(Time(now.0 + self.period_s));
                true
            }
        }
    }

    /// Forget the schedule; the next `due` call fires immediately.
    pub fn reset(&mut self) {
        self.next_due = None;
    }
}

#[cfg(test)]
mod tests {
    use super::Cadence;
    use foundation::time::Time;

    #[test]
    fn fires_immediately_then_waits_one_period() {
        let mut c = Cadence::new(1.0);
        assert!(c.due(Time(10.0)));
        assert!(!c.due(Time(10.5)));
        assert!(!c.due(Time(10.999)));
        assert!(c.due(Time(11.0)));
    }

    #[test]
    fn rearms_from_fire_time_not_schedule() {
        let mut c = Cadence::new(1.0);
        assert!(c.due(Time(0.0)));
        // Stall well past several periods: fires once, then waits again.
        assert!(c.due(Time(5.3)));
        assert!(!c.due(Time(6.0)));
        assert!(c.due(Time(6.3)));
    }

    #[test]
    fn reset_fires_on_next_call() {
        let mut c = Cadence::new(60.0);
        assert!(c.due(Time(0.0)));
        assert!(!c.due(Time(1.0)));
        c.reset();
        assert!(c.due(Time(1.0)));
    }
}
