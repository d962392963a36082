//! High-level facade crate for the `fiducials-*` workspace.
//!
//! A vision front end reports one `(id, x, y, bearing, goodness)` sighting per
//! detected marker per frame. This workspace keeps the best observation per
//! marker, tracks where markers have been seen and serves ranked and spatial
//! queries to a navigation consumer. Camera capture and marker decoding are
//! out of scope: plug them in through [`locate::ObservationSource`].
//!
//! ## Quickstart
//!
//! ```
//! use fiducials::{LocationAggregator, MarkerSighting};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut aggregator = LocationAggregator::new();
//! aggregator.ingest_sighting(MarkerSighting {
//!     id: 3,
//!     x: 1.0,
//!     y: 2.0,
//!     bearing: 0.0,
//!     goodness: 0.5,
//! })?;
//! aggregator.ingest_sighting(MarkerSighting {
//!     id: 3,
//!     x: 1.2,
//!     y: 2.1,
//!     bearing: 0.05,
//!     goodness: 0.2,
//! })?;
//!
//! let best = aggregator.best_for(3)?;
//! assert_eq!(best.goodness, 0.2);
//! assert!(aggregator.bounding_box().contains(1.0, 2.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `fiducials::core`: observations (`Location`), `BoundingBox`, logging setup.
//! - `fiducials::locate`: `LocationAggregator`, `SharedAggregator`, frame
//!   replay and JSON config/report helpers.
//! - `fiducials::replay`: run a config end to end (used by the CLI).

pub use fiducials_core as core;
pub use fiducials_locate as locate;

pub use fiducials_core::{BoundingBox, Extent, Location, LocationError};
pub use fiducials_locate::{
    AggregatorParams, Frame, IngestOutcome, LocateError, LocationAggregator, MarkerSighting,
    SharedAggregator,
};

pub mod replay;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;
