pub mod route;
pub mod sample;

pub use route::Route;
pub use sample::{Coordinate, Sample};
