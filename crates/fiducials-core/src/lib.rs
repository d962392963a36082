//! Core types for fiducial marker localization.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any camera, image type or marker decoder: a vision front end
//! hands over per-marker pose estimates as [`Location`] values and this
//! crate validates them and tracks their spatial extent.

mod bounding_box;
mod error;
mod location;
mod logger;

pub use bounding_box::{BoundingBox, Extent};
pub use error::LocationError;
pub use location::{normalize_bearing, Location};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;
