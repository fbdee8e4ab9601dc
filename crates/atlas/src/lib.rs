pub mod boundary;
pub mod country;
pub mod pip;
pub mod pool;
pub mod shape;

pub use boundary::*;
pub use country::*;
pub use shape::*;
