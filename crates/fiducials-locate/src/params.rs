use serde::{Deserialize, Serialize};

/// Goodness values closer than this are treated as equal by default.
pub const DEFAULT_GOODNESS_EPSILON: f64 = 1e-9;

fn default_goodness_epsilon() -> f64 {
    DEFAULT_GOODNESS_EPSILON
}

/// Configuration for [`crate::LocationAggregator`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregatorParams {
    /// Tolerance under which two goodness values count as a tie.
    ///
    /// Ties are resolved in favour of the observation with the higher index.
    #[serde(default = "default_goodness_epsilon")]
    pub goodness_epsilon: f64,
    /// Optional acceptance threshold.
    ///
    /// Observations with `goodness > max_goodness` are rejected outright and
    /// never retained, even for a marker with no current observation.
    #[serde(default)]
    pub max_goodness: Option<f64>,
}

impl Default for AggregatorParams {
    fn default() -> Self {
        Self {
            goodness_epsilon: DEFAULT_GOODNESS_EPSILON,
            max_goodness: None,
        }
    }
}

impl AggregatorParams {
    /// Replace out-of-range settings with usable ones.
    ///
    /// A negative or non-finite epsilon falls back to the default; a NaN
    /// threshold is dropped.
    pub(crate) fn sanitized(mut self) -> Self {
        if !self.goodness_epsilon.is_finite() || self.goodness_epsilon < 0.0 {
            log::warn!(
                "goodness_epsilon {} is not a non-negative finite value, using {}",
                self.goodness_epsilon,
                DEFAULT_GOODNESS_EPSILON
            );
            self.goodness_epsilon = DEFAULT_GOODNESS_EPSILON;
        }
        if self.max_goodness.is_some_and(f64::is_nan) {
            log::warn!("max_goodness is NaN, ignoring the threshold");
            self.max_goodness = None;
        }
        self
    }

    /// `true` if `goodness` passes the acceptance threshold.
    #[inline]
    pub fn accepts(&self, goodness: f64) -> bool {
        self.max_goodness.is_none_or(|max| goodness <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let params: AggregatorParams = serde_json::from_str("{}").expect("parse");
        assert_eq!(params, AggregatorParams::default());
    }

    #[test]
    fn sanitize_replaces_bad_epsilon() {
        let params = AggregatorParams {
            goodness_epsilon: -1.0,
            max_goodness: Some(f64::NAN),
        }
        .sanitized();
        assert_eq!(params.goodness_epsilon, DEFAULT_GOODNESS_EPSILON);
        assert_eq!(params.max_goodness, None);
    }

    #[test]
    fn threshold_is_inclusive() {
        let params = AggregatorParams {
            max_goodness: Some(1.0),
            ..AggregatorParams::default()
        };
        assert!(params.accepts(1.0));
        assert!(!params.accepts(1.5));
        assert!(AggregatorParams::default().accepts(1e6));
    }
}
