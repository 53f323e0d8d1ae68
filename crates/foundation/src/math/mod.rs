pub mod codec;
pub mod mat;
pub mod precision;
pub mod quat;
pub mod vec;

pub use codec::*;
pub use mat::*;
pub use precision::*;
pub use quat::*;
pub use vec::*;
