//! Single-marker pose observations.

use std::f64::consts::PI;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;
use crate::error::{finite, LocationError};

/// An X/Y/bearing pose estimate for one fiducial marker sighting.
///
/// Values are plain data: copying a `Location` yields a fully independent
/// value. Fields are public so consumers can adjust copies freely; use
/// [`Location::validate`] before handing a modified value back to code that
/// relies on the construction invariants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Marker (tag) identifier. Several sightings may share an id.
    pub id: u32,
    pub x: f64,
    pub y: f64,
    /// Bearing in radians, normalized to `(-pi, pi]`.
    pub bearing: f64,
    /// Estimate quality; closer to `0.0` is better.
    pub goodness: f64,
    /// Insertion sequence number.
    pub index: u64,
}

impl Location {
    /// Validate and create a location.
    ///
    /// `x`, `y` and `bearing` must be finite and `goodness` finite and
    /// non-negative. The bearing is normalized to `(-pi, pi]`.
    pub fn new(
        id: u32,
        x: f64,
        y: f64,
        bearing: f64,
        goodness: f64,
        index: u64,
    ) -> Result<Self, LocationError> {
        let location = Self {
            id,
            x: finite("x", x)?,
            y: finite("y", y)?,
            bearing: normalize_bearing(finite("bearing", bearing)?),
            goodness: check_goodness(goodness)?,
            index,
        };
        Ok(location)
    }

    /// Re-check the construction invariants.
    ///
    /// A bearing outside `(-pi, pi]` is accepted as long as it is finite.
    pub fn validate(&self) -> Result<(), LocationError> {
        finite("x", self.x)?;
        finite("y", self.y)?;
        finite("bearing", self.bearing)?;
        check_goodness(self.goodness)?;
        Ok(())
    }

    #[inline]
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// Planar Euclidean distance between two locations.
    pub fn distance_to(&self, other: &Location) -> f64 {
        nalgebra::distance(&self.position(), &other.position())
    }

    /// Widen `bounding_box` so that it contains this location.
    pub fn bounding_box_update(
        &self,
        bounding_box: &mut BoundingBox,
    ) -> Result<(), LocationError> {
        bounding_box.update(self.x, self.y)
    }

    /// Selection order between two observations.
    ///
    /// Lower goodness wins. When both goodness values lie within `epsilon`
    /// of each other the more recent observation (higher index) wins, so two
    /// equally good readings never flip back and forth.
    pub fn is_better_than(&self, other: &Location, epsilon: f64) -> bool {
        if (self.goodness - other.goodness).abs() <= epsilon {
            self.index > other.index
        } else {
            self.goodness < other.goodness
        }
    }
}

/// Map a finite angle in radians into `(-pi, pi]`.
///
/// Non-finite input is returned unchanged.
pub fn normalize_bearing(bearing: f64) -> f64 {
    if !bearing.is_finite() {
        return bearing;
    }
    let wrapped = (bearing + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

fn check_goodness(goodness: f64) -> Result<f64, LocationError> {
    if goodness.is_finite() && goodness >= 0.0 {
        Ok(goodness)
    } else {
        Err(LocationError::InvalidValue {
            field: "goodness",
            value: goodness,
        })
    }
}
