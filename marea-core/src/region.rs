//! Region membership for municipality centroids.
//!
//! The engine never embeds coastline or boundary geometry. Callers inject a
//! [`RegionFilter`]; [`CatalunyaEnvelope`] is the coarse default based on the
//! administrative bounding box.

use geo::{Coord, Intersects, Rect};

/// South-west corner of Catalunya's bounding envelope (`x = lng`, `y = lat`).
pub const CATALUNYA_MIN: Coord<f64> = Coord { x: 0.16, y: 40.52 };
/// North-east corner of Catalunya's bounding envelope (`x = lng`, `y = lat`).
pub const CATALUNYA_MAX: Coord<f64> = Coord { x: 3.33, y: 42.86 };

/// Decide whether a centroid lies inside the region being mapped.
///
/// Implementations must be thread-safe so the pipeline can share one filter
/// across workers.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use marea_core::{CatalunyaEnvelope, RegionFilter};
///
/// let girona = Coord { x: 2.82, y: 41.98 };
/// let madrid = Coord { x: -3.70, y: 40.42 };
/// assert!(CatalunyaEnvelope::default().is_within_region(girona));
/// assert!(!CatalunyaEnvelope::default().is_within_region(madrid));
/// ```
pub trait RegionFilter: Send + Sync {
    /// Return `true` when `location` belongs to the region.
    fn is_within_region(&self, location: Coord<f64>) -> bool;
}

/// Axis-aligned envelope around Catalunya.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalunyaEnvelope {
    bounds: Rect<f64>,
}

impl CatalunyaEnvelope {
    /// Envelope with custom corners, mainly for tests and other regions.
    #[must_use]
    pub fn with_bounds(min: Coord<f64>, max: Coord<f64>) -> Self {
        Self {
            bounds: Rect::new(min, max),
        }
    }

    /// Bounding rectangle used by the filter.
    #[must_use]
    pub const fn bounds(&self) -> Rect<f64> {
        self.bounds
    }
}

impl Default for CatalunyaEnvelope {
    fn default() -> Self {
        Self::with_bounds(CATALUNYA_MIN, CATALUNYA_MAX)
    }
}

impl RegionFilter for CatalunyaEnvelope {
    fn is_within_region(&self, location: Coord<f64>) -> bool {
        location.x.is_finite()
            && location.y.is_finite()
            // `Intersects` treats boundary points as inside the rectangle.
            && self.bounds.intersects(&location)
    }
}
