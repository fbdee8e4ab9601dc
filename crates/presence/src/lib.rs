pub mod engine;
pub mod feed;
pub mod motion;
pub mod population;
pub mod snapshot;

pub use engine::*;
pub use feed::*;
pub use motion::*;
pub use population::*;
pub use snapshot::*;
