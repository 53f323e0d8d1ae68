pub mod math;
pub mod units;

// Foundation crate: small, well-tested primitives only.
pub use units::*;
