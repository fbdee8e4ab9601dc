pub mod cadence;
pub mod metrics;
pub mod tick;

pub use cadence::*;
pub use tick::*;
