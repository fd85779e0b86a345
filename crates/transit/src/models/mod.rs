//! Network data models, types, and traits.

pub mod calendar;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use calendar::WeekdayFlags;
pub use traits::RouteTopology;
pub use types::{Line, LinePattern, Result, Stop, TransitError};
