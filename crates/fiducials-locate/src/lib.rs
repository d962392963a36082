//! Marker location aggregation.
//!
//! Current focus:
//! - keeping the single best observation per marker id (lower goodness wins,
//!   ties go to the newer observation; observations are never averaged),
//! - tracking the bounding box of every accepted observation,
//! - ranked and spatial (KD-tree) queries for a navigation consumer,
//! - replaying recorded frames of marker sightings through the aggregator.
//!
//! Observation types and the bounding box live in `fiducials-core`.

mod aggregator;
mod error;
mod frame;
mod io;
mod params;
mod shared;
mod spatial;

pub use aggregator::{AggregatorSnapshot, IngestOutcome, LocationAggregator, Ranked};
pub use error::LocateError;
pub use frame::{
    process_frame, run_source, Frame, FrameSummary, MarkerSighting, ObservationSource,
    ReplaySource, RunSummary,
};
pub use io::{LocateConfig, LocateIoError, LocateReport, ObservationLog};
pub use params::{AggregatorParams, DEFAULT_GOODNESS_EPSILON};
pub use shared::SharedAggregator;

pub use fiducials_core::{BoundingBox, Extent, Location, LocationError};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;
