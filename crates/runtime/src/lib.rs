pub mod animation;
pub mod event_bus;
pub mod frame;
pub mod scheduler;
pub mod stamp;
pub mod timer;

pub use animation::*;
pub use event_bus::*;
pub use frame::*;
pub use scheduler::*;
pub use stamp::*;
pub use timer::*;
