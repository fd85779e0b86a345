//! # companion-transit
//!
//! Bus network topology for the rider companion engine.
//!
//! ## Features
//!
//! - **Typed identifiers**: cheap-to-clone ids for stops, lines, buses, schedules and alerts
//! - **Cyclic lines**: ordered stops with wrap-around traversal
//! - **Spatial queries**: haversine distances and an R-tree backed stop index
//! - **Topology loading**: bundled campus network, or JSON documents (`serde` feature)
//!
//! ## Example
//!
//! ```
//! use companion_transit::prelude::*;
//!
//! let topology = StaticTopology::seed();
//! let a_line = topology.line(&LineIdentifier::new("a-line")).unwrap();
//! assert_eq!(a_line.name.as_ref(), "A Line");
//!
//! // The bus wraps from the last stop back to the terminal
//! assert_eq!(a_line.next_index(a_line.stop_count() - 1), Some(0));
//!
//! let mu = a_line.stop_at(0).unwrap();
//! let tercero = a_line.stop_at(4).unwrap();
//! let km = distance_km(mu.latitude, mu.longitude, tercero.latitude, tercero.longitude);
//! assert!(format_distance(km).ends_with("km"));
//! assert_eq!(format_distance(0.25), "250m");
//! ```

pub mod identifiers;
pub mod models;
pub mod provider;
pub mod spatial;

pub use geo;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{calendar::WeekdayFlags, traits::*, types::*};
    pub use crate::provider::static_provider::StaticTopology;
    pub use crate::spatial::{distance_km, format_distance, haversine_distance, StopIndex};
}

pub use prelude::*;
