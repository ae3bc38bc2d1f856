pub mod registry;
pub mod state;

pub use registry::{ActorContext, TimerRegistry};
pub use state::{ActiveTimer, TimerSnapshot};
