use fiducials_core::LocationError;

/// Errors returned by the location aggregator.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum LocateError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error("no location retained for marker {id}")]
    NotFound { id: u32 },
    #[error("observation index counter exhausted")]
    IndexExhausted,
}
