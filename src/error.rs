//! Error taxonomy for the advisory engines
//!
//! Only input validation and lookups can fail. Degenerate data (short price
//! series, empty snapshots) is handled by explicit fallback branches inside the
//! engines and never surfaces here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdvisorError {
    /// A required field was absent from the submitted observation
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A field was present but unusable
    #[error("invalid value for '{field}': {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("no crop template matches '{0}'")]
    UnknownCrop(String),

    #[error("no groundwater data for state '{0}'")]
    UnknownState(String),
}

impl AdvisorError {
    pub fn invalid(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        AdvisorError::InvalidValue {
            field,
            value: value.to_string(),
            reason,
        }
    }

    /// True for errors the caller fixes by re-collecting input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AdvisorError::MissingField { .. } | AdvisorError::InvalidValue { .. }
        )
    }
}

pub type AdvisorResult<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AdvisorError::MissingField { field: "soil_type" };
        assert_eq!(err.to_string(), "missing required field 'soil_type'");
        assert!(err.is_validation());

        let err = AdvisorError::invalid("vegetation_index", 1.4, "must be within [0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid value for 'vegetation_index': 1.4 (must be within [0, 1])"
        );

        assert!(!AdvisorError::UnknownState("Atlantis".into()).is_validation());
    }
}
