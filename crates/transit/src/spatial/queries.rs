//! Spatial query utilities for distance calculations.
//!
//! Uses Haversine formula for accurate distances on Earth's surface.

use geo::{HaversineDistance, Point};

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Great-circle distance in kilometers between two latitude/longitude pairs
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_distance(Point::new(lon1, lat1), Point::new(lon2, lat2)) / 1000.0
}

/// Render a distance for display: whole meters below one kilometer,
/// kilometers with one decimal otherwise.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round() as i64)
    } else {
        format!("{:.1}km", km)
    }
}

/// Convert meters to degrees at equator (for bounding box queries)
pub fn meters_to_degrees_approx(meters: f64) -> f64 {
    meters / 111_320.0 // meters per degree at equator
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_distance() {
        // Distance from NYC to LA is approximately 3,936 km
        let nyc = Point::new(-74.0060, 40.7128);
        let la = Point::new(-118.2437, 34.0522);

        let dist = haversine_distance(nyc, la);
        assert!((dist - 3_936_000.0).abs() < 50_000.0); // Within 50km
    }

    #[test]
    fn test_distance_symmetry() {
        let pairs = [
            ((38.5415, -121.7489), (38.5378, -121.7621)),
            ((40.7128, -74.0060), (34.0522, -118.2437)),
            ((-33.8688, 151.2093), (51.5074, -0.1278)),
            ((0.0, 179.9), (0.0, -179.9)),
        ];

        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let forward = distance_km(lat1, lon1, lat2, lon2);
            let backward = distance_km(lat2, lon2, lat1, lon1);
            assert_relative_eq!(forward, backward, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_distance_identity() {
        assert_relative_eq!(distance_km(38.5415, -121.7489, 38.5415, -121.7489), 0.0);
        assert_relative_eq!(distance_km(-12.0, 45.0, -12.0, 45.0), 0.0);
    }

    #[test]
    fn test_campus_distance() {
        // Memorial Union to Tercero is a little over a kilometer
        let km = distance_km(38.5415, -121.7489, 38.5378, -121.7621);
        assert!(km > 1.1 && km < 1.3, "got {km}");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(0.2504), "250m");
        assert_eq!(format_distance(0.9994), "999m");
        assert_eq!(format_distance(1.0), "1.0km");
        assert_eq!(format_distance(2.46), "2.5km");
        assert_eq!(format_distance(12.0), "12.0km");
    }

    #[test]
    fn test_degree_conversion() {
        assert_relative_eq!(meters_to_degrees_approx(111_320.0), 1.0);
    }
}
