use thiserror::Error;

pub type Result<T> = std::result::Result<T, SamplingError>;

/// Errors raised by the sampling kernel. Every variant is raised at the point
/// the invalid input is seen; nothing is clamped or substituted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid observation: {misstatements} misstatements in a sample of {sample_size}")]
    InvalidObservation { sample_size: u64, misstatements: u64 },

    #[error("mode is undefined for an empty sample")]
    UndefinedMode,

    #[error("no sample size up to {search_bound} satisfies the {criterion} criterion")]
    InfeasibleParameter {
        criterion: String,
        search_bound: u64,
    },
}

impl SamplingError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        SamplingError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Checks that `value` lies strictly inside (0, 1).
pub(crate) fn check_open_unit(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(SamplingError::invalid(name, value, "must be strictly between 0 and 1"))
    }
}

/// Checks that `value` is a finite, strictly positive number.
pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SamplingError::invalid(name, value, "must be a finite number greater than 0"))
    }
}
