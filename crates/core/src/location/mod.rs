//! Rider location and nearest-stop resolution.

use std::future::Future;
use std::pin::Pin;

use companion_transit::geo::Point;
use companion_transit::prelude::Stop;
use serde::{Deserialize, Serialize};

pub mod directory;

pub use directory::{ServingLine, StopDirectory, StopEntry};

/// Display name given to positions reported by the device
pub const GPS_LOCATION_NAME: &str = "Current GPS Location";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: None,
        }
    }

    pub fn named(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: Some(name.into()),
        }
    }

    /// Use a stop as the rider's location
    pub fn from_stop(stop: &Stop) -> Self {
        Self::named(stop.latitude, stop.longitude, stop.name.as_ref())
    }

    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied. Please enable location access.")]
    PermissionDenied,

    #[error("Location information unavailable.")]
    PositionUnavailable,

    #[error("Location request timed out.")]
    Timeout,

    #[error("Geolocation is not supported on this device")]
    Unsupported,

    #[error("An error occurred while getting your location.")]
    Unknown,
}

impl LocationError {
    /// Classify a platform geolocation error code
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unknown,
        }
    }
}

/// Source of the device's current position
pub trait GeolocationProvider: Send + Sync {
    fn current_position<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<UserLocation, LocationError>> + Send + 'a>>;
}

/// Reports a fixed position, or a fixed failure
#[derive(Clone, Debug)]
pub struct FixedPosition(pub Result<UserLocation, LocationError>);

impl FixedPosition {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self(Ok(UserLocation::named(latitude, longitude, GPS_LOCATION_NAME)))
    }

    pub fn failing(error: LocationError) -> Self {
        Self(Err(error))
    }
}

impl GeolocationProvider for FixedPosition {
    fn current_position<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<UserLocation, LocationError>> + Send + 'a>> {
        Box::pin(async move { self.0.clone() })
    }
}
