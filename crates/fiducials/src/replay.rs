//! End-to-end replay: observation log -> aggregator -> report.

use fiducials_locate::{
    run_source, AggregatorParams, LocateConfig, LocateIoError, LocateReport, LocationAggregator,
    ObservationLog, RunSummary,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Replay every frame of `observations` through a fresh aggregator.
pub fn replay_log(
    observations: ObservationLog,
    params: AggregatorParams,
) -> (LocationAggregator, RunSummary) {
    let mut aggregator = LocationAggregator::with_params(params);
    let summary = run_source(&mut observations.into_source(), &mut aggregator);
    (aggregator, summary)
}

/// Load the log named by `cfg`, replay it and build the report.
///
/// An unreadable or malformed log is returned as an error; malformed
/// sightings inside a readable log are only counted as invalid.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(cfg), fields(observations = %cfg.observations_path))
)]
pub fn replay_config(cfg: &LocateConfig) -> Result<LocateReport, LocateIoError> {
    let observations = ObservationLog::load_json(&cfg.observations_path)?;
    log::info!(
        "loaded {} frames from {}",
        observations.frames.len(),
        cfg.observations_path
    );

    let (aggregator, summary) = replay_log(observations, cfg.params);
    let mut report = LocateReport::new(cfg);
    report.set_result(&aggregator, summary);
    Ok(report)
}
