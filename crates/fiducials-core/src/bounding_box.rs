//! Axis-aligned bounding box over observed marker positions.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{finite, LocationError};

/// Concrete corners of a non-empty [`BoundingBox`].
///
/// `min.x <= max.x` and `min.y <= max.y` always hold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Extent {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Midpoint of the extent.
    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// `true` if `(x, y)` lies inside or on the border.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min.x && x <= self.max.x && y >= self.min.y && y <= self.max.y
    }
}

/// Minimal axis-aligned rectangle enclosing every point passed to
/// [`BoundingBox::update`] since creation or the last [`BoundingBox::reset`].
///
/// A fresh box is *empty*: it has no extent at all, which is distinct from
/// a degenerate zero-area rectangle around a single point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BoundingBox {
    extent: Option<Extent>,
}

impl BoundingBox {
    /// Create an empty bounding box.
    pub const fn new() -> Self {
        Self { extent: None }
    }

    /// Widen the box so that it contains `(x, y)`.
    ///
    /// Fails without modifying the box if either coordinate is not finite.
    pub fn update(&mut self, x: f64, y: f64) -> Result<(), LocationError> {
        let x = finite("x", x)?;
        let y = finite("y", y)?;
        let point = Point2::new(x, y);

        self.extent = Some(match self.extent {
            None => Extent {
                min: point,
                max: point,
            },
            Some(e) => Extent {
                min: Point2::new(e.min.x.min(x), e.min.y.min(y)),
                max: Point2::new(e.max.x.max(x), e.max.y.max(y)),
            },
        });
        Ok(())
    }

    /// Return the box to the empty state.
    pub fn reset(&mut self) {
        self.extent = None;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    /// Current extent, `None` while the box is empty.
    #[inline]
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    #[inline]
    pub fn min(&self) -> Option<Point2<f64>> {
        self.extent.map(|e| e.min)
    }

    #[inline]
    pub fn max(&self) -> Option<Point2<f64>> {
        self.extent.map(|e| e.max)
    }

    pub fn width(&self) -> f64 {
        self.extent.map_or(0.0, |e| e.width())
    }

    pub fn height(&self) -> f64 {
        self.extent.map_or(0.0, |e| e.height())
    }

    pub fn center(&self) -> Option<Point2<f64>> {
        self.extent.map(|e| e.center())
    }

    /// `true` if the box is non-empty and contains `(x, y)`.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.extent.is_some_and(|e| e.contains(x, y))
    }
}

impl From<Extent> for BoundingBox {
    fn from(extent: Extent) -> Self {
        Self {
            extent: Some(extent),
        }
    }
}
