//! Frame-in interface: per-frame marker sightings from a vision front end.

use fiducials_core::{Location, LocationError};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{IngestOutcome, LocateError, LocationAggregator};

/// One detected marker in one frame, before an index is assigned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerSighting {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub bearing: f64,
    pub goodness: f64,
}

impl MarkerSighting {
    /// Validate and stamp the sighting with `index`.
    pub fn into_location(self, index: u64) -> Result<Location, LocationError> {
        Location::new(
            self.id,
            self.x,
            self.y,
            self.bearing,
            self.goodness,
            index,
        )
    }
}

/// All sightings produced for one processed video frame, in arbitrary order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub sequence: u64,
    #[serde(default)]
    pub sightings: Vec<MarkerSighting>,
}

/// Something that yields marker sightings frame by frame.
///
/// A camera-backed front end implements this on top of its own capture and
/// detection code; [`ReplaySource`] replays recorded frames.
pub trait ObservationSource {
    /// Next processed frame, or `None` when the source is exhausted.
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Replays a fixed list of frames in order.
#[derive(Clone, Debug, Default)]
pub struct ReplaySource {
    frames: std::vec::IntoIter<Frame>,
}

impl ReplaySource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }

    /// Frames not yet replayed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl ObservationSource for ReplaySource {
    fn next_frame(&mut self) -> Option<Frame> {
        self.frames.next()
    }
}

/// Per-frame ingestion counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub sequence: u64,
    pub inserted: usize,
    pub replaced: usize,
    pub rejected: usize,
    /// Malformed sightings that were skipped.
    pub invalid: usize,
}

impl FrameSummary {
    fn record(&mut self, outcome: &IngestOutcome) {
        match outcome {
            IngestOutcome::Inserted => self.inserted += 1,
            IngestOutcome::Replaced(_) => self.replaced += 1,
            IngestOutcome::Rejected(_) => self.rejected += 1,
        }
    }
}

/// Totals over a whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub frames: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub rejected: usize,
    pub invalid: usize,
}

impl RunSummary {
    pub fn add(&mut self, frame: &FrameSummary) {
        self.frames += 1;
        self.inserted += frame.inserted;
        self.replaced += frame.replaced;
        self.rejected += frame.rejected;
        self.invalid += frame.invalid;
    }

    /// Total sightings seen, including invalid ones.
    pub fn sightings(&self) -> usize {
        self.inserted + self.replaced + self.rejected + self.invalid
    }
}

/// Ingest every sighting of `frame`.
///
/// A malformed sighting is logged and skipped; it never stops the frame.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(aggregator, frame),
        fields(sequence = frame.sequence, sightings = frame.sightings.len())
    )
)]
pub fn process_frame(aggregator: &mut LocationAggregator, frame: &Frame) -> FrameSummary {
    let mut summary = FrameSummary {
        sequence: frame.sequence,
        ..FrameSummary::default()
    };
    for sighting in &frame.sightings {
        match aggregator.ingest_sighting(*sighting) {
            Ok(outcome) => summary.record(&outcome),
            Err(LocateError::Location(err)) => {
                log::warn!(
                    "frame {}: skipping sighting of marker {}: {err}",
                    frame.sequence,
                    sighting.id
                );
                summary.invalid += 1;
            }
            Err(err) => {
                log::warn!(
                    "frame {}: dropping sighting of marker {}: {err}",
                    frame.sequence,
                    sighting.id
                );
                summary.invalid += 1;
            }
        }
    }
    log::debug!(
        "frame {}: inserted={} replaced={} rejected={} invalid={}",
        summary.sequence,
        summary.inserted,
        summary.replaced,
        summary.rejected,
        summary.invalid
    );
    summary
}

/// Drain `source` into `aggregator`.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
pub fn run_source<S: ObservationSource + ?Sized>(
    source: &mut S,
    aggregator: &mut LocationAggregator,
) -> RunSummary {
    let mut summary = RunSummary::default();
    while let Some(frame) = source.next_frame() {
        summary.add(&process_frame(aggregator, &frame));
    }
    log::info!(
        "processed {} frames: {} markers retained, {} invalid sightings",
        summary.frames,
        aggregator.len(),
        summary.invalid
    );
    summary
}
