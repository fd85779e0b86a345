pub mod alerts;
pub mod clock;
pub mod location;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod simulation;
pub mod storage;

// Re-export transit from the transit crate
pub use companion_transit as transit;

pub use session::{Session, TickSummary};
