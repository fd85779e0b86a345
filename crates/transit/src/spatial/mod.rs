//! Spatial indexing and query utilities.

pub mod index;
pub mod queries;

pub use index::StopIndex;
pub use queries::{distance_km, format_distance, haversine_distance};
