pub mod bounds;
pub mod geo;
pub mod hash;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use geo::*;
pub use hash::*;
pub use time::*;
