//! JSON observation logs, configuration and report helpers.

use crate::{AggregatorParams, Frame, LocationAggregator, ReplaySource, RunSummary};
use fiducials_core::{Extent, Location};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum LocateIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Recorded marker sightings, one entry per processed frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationLog {
    pub frames: Vec<Frame>,
}

impl ObservationLog {
    /// Load a JSON observation log from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LocateIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this log to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), LocateIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn into_source(self) -> ReplaySource {
        ReplaySource::new(self.frames)
    }
}

/// Configuration for replaying an observation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocateConfig {
    pub observations_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub params: AggregatorParams,
}

impl LocateConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LocateIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), LocateIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("locate_report.json"))
    }

    pub fn build_aggregator(&self) -> LocationAggregator {
        LocationAggregator::with_params(self.params)
    }
}

/// Outcome of a replay run: counts, ranked locations and their extent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocateReport {
    pub observations_path: String,
    #[serde(default)]
    pub params: AggregatorParams,
    #[serde(default)]
    pub summary: RunSummary,
    /// Ranked best first.
    #[serde(default)]
    pub locations: Vec<Location>,
    /// `None` when nothing was accepted.
    #[serde(default)]
    pub bounding_box: Option<Extent>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LocateReport {
    /// Build an empty report for the given input.
    pub fn new(cfg: &LocateConfig) -> Self {
        Self {
            observations_path: cfg.observations_path.clone(),
            params: cfg.params,
            summary: RunSummary::default(),
            locations: Vec::new(),
            bounding_box: None,
            error: None,
        }
    }

    /// Populate report fields from a finished run.
    pub fn set_result(&mut self, aggregator: &LocationAggregator, summary: RunSummary) {
        self.params = *aggregator.params();
        self.summary = summary;
        self.locations = aggregator.ranked().copied().collect();
        self.bounding_box = aggregator.bounding_box().extent();
        self.error = None;
    }

    /// Record a failure that prevented the run.
    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LocateIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), LocateIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
