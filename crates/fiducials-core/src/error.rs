/// Validation errors for location observations and bounding boxes.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum LocationError {
    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64, LocationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LocationError::InvalidValue { field, value })
    }
}
