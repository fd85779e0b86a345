//! Topology providers.

pub mod seed;
pub mod static_provider;

pub use static_provider::StaticTopology;
