/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn seconds(s: f64) -> Self {
        Time(s)
    }

    /// Elapsed seconds since `earlier`. Negative if `earlier` is later.
    pub fn since(&self, earlier: Time) -> f64 {
        self.0 - earlier.0
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn since_is_signed() {
        let a = Time(2.0);
        let b = Time(5.0);
        assert_eq!(b.since(a), 3.0);
        assert_eq!(a.since(b), -3.0);
    }
}
