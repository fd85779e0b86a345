//! R-tree nodes for spatial indexing of stops.
//!
//! ## Two-Stage Filtering
//!
//! Radius queries use a two-stage filtering approach:
//! 1. **R-tree filter**: Euclidean distance in degree space for fast approximate filtering
//! 2. **Haversine filter**: accurate geodesic distance on the filtered results
//!
//! The degree-space radius is widened by the latitude's longitude shrink so
//! the first stage never drops a stop the second stage would keep.

use geo::Point;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::spatial::queries::{haversine_distance, meters_to_degrees_approx};

/// Lower bound on cos(latitude) so polar queries don't explode the search box
const MIN_LONGITUDE_SCALE: f64 = 0.01;

// ============================================================================
// Stop Spatial Node
// ============================================================================

/// A point in the tree, tagged with its slot in the owning collection
#[derive(Clone, Debug)]
pub struct StopNode {
    pub slot: usize,
    pub location: Point,
}

impl StopNode {
    pub fn new(slot: usize, location: Point) -> Self {
        Self { slot, location }
    }

    fn coords(&self) -> [f64; 2] {
        [self.location.x(), self.location.y()]
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coords())
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let [x, y] = self.coords();
        let dx = x - point[0];
        let dy = y - point[1];
        dx * dx + dy * dy
    }
}

// ============================================================================
// Stop Index
// ============================================================================

/// Spatial index over an ordered collection of stop locations.
///
/// Query results refer back to positions in the collection the index was
/// built from.
#[derive(Clone, Debug)]
pub struct StopIndex {
    tree: RTree<StopNode>,
}

impl StopIndex {
    pub fn new(locations: impl IntoIterator<Item = Point>) -> Self {
        let nodes = locations
            .into_iter()
            .enumerate()
            .map(|(slot, location)| StopNode::new(slot, location))
            .collect();

        Self {
            tree: RTree::bulk_load(nodes),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Slots within `radius_m` meters of `point`, nearest first, paired with
    /// their distance in meters.
    pub fn within(&self, point: Point, radius_m: f64) -> Vec<(usize, f64)> {
        // Validate radius is positive
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        let longitude_scale = point.y().to_radians().cos().abs().max(MIN_LONGITUDE_SCALE);
        let radius_deg = meters_to_degrees_approx(radius_m) / longitude_scale;

        let mut hits: Vec<(usize, f64)> = self
            .tree
            .locate_within_distance([point.x(), point.y()], radius_deg * radius_deg)
            .map(|node| (node.slot, haversine_distance(point, node.location)))
            .filter(|&(_, distance)| distance <= radius_m)
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }
}
