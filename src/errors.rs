use std::fmt;

/// Core error types.
///
/// Data-quality problems never surface here: unparseable values, invalid
/// identifiers and missing peers are all expressed in the returned values
/// (unknown sentinels, conflict records, low-confidence flags). The only
/// hard failures are programming-contract violations by the caller, kept
/// distinguishable from data-quality outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A ranking weight was negative or non-finite.
    InvalidWeight {
        /// Metric the weight was supplied for.
        metric: String,
        /// The offending weight.
        weight: f64,
    },
}

impl fmt::Display for CoreError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidWeight { metric, weight } => {
                write!(f, "Invalid weight {} for metric '{}'", weight, metric)
            }
        }
    }
}

impl std::error::Error for CoreError {}
