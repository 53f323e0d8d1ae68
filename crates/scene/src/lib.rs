pub mod geo;
pub mod mapping;
pub mod picking;
pub mod spherical;

pub use geo::*;
pub use mapping::*;
pub use picking::*;
