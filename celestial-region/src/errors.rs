use thiserror::Error;

use crate::cartesian::GalacticCartesian;
use crate::quantity::Unit;

pub type RegionResult<T> = Result<T, RegionError>;

/// The two redundant values that failed to agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conflict {
    /// Supplied distance versus the distance implied by the supplied parallax, in parsecs.
    Distance { supplied: f64, from_parallax: f64 },
    /// Two Cartesian centers derived (or supplied) independently.
    Center {
        first: GalacticCartesian,
        second: GalacticCartesian,
    },
}

impl Conflict {
    /// Largest absolute difference between the two values, in parsecs.
    pub fn discrepancy(&self) -> f64 {
        match self {
            Self::Distance {
                supplied,
                from_parallax,
            } => (supplied - from_parallax).abs(),
            Self::Center { first, second } => first.max_abs_difference(second),
        }
    }
}

/// Failures raised while normalizing or reconciling a region descriptor.
///
/// | Variant | Raised when | Subject to `strict`? |
/// |---------|-------------|----------------------|
/// | [`UnitMismatch`](RegionError::UnitMismatch) | quantities of different dimensions are combined | No |
/// | [`CoordinateMismatch`](RegionError::CoordinateMismatch) | redundant inputs disagree beyond tolerance | Yes |
/// | [`InsufficientData`](RegionError::InsufficientData) | no derivation path has enough inputs | No |
/// | [`InvalidValue`](RegionError::InvalidValue) | an input is non-finite or out of range | No |
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    #[error("Unit mismatch in {operation}: '{found}' is not compatible with '{expected}'")]
    UnitMismatch {
        operation: String,
        expected: Unit,
        found: Unit,
    },

    #[error("Coordinate mismatch (discrepancy {discrepancy:.6} pc): {message}")]
    CoordinateMismatch {
        message: String,
        conflict: Conflict,
        discrepancy: f64,
    },

    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}

impl RegionError {
    pub fn unit_mismatch(operation: impl Into<String>, expected: Unit, found: Unit) -> Self {
        Self::UnitMismatch {
            operation: operation.into(),
            expected,
            found,
        }
    }

    pub fn coordinate_mismatch(message: impl Into<String>, conflict: Conflict) -> Self {
        Self::CoordinateMismatch {
            message: message.into(),
            discrepancy: conflict.discrepancy(),
            conflict,
        }
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData {
            message: message.into(),
        }
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::CoordinateMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_mismatch_message() {
        let err = RegionError::unit_mismatch("average", Unit::Parsec, Unit::Degree);
        let text = err.to_string();
        assert!(text.contains("average"));
        assert!(text.contains("pc"));
        assert!(text.contains("deg"));
    }

    #[test]
    fn test_insufficient_data() {
        let err = RegionError::insufficient_data("no ra/dec");
        assert!(err.to_string().contains("no ra/dec"));
        assert!(!err.is_mismatch());
    }

    #[test]
    fn test_distance_conflict_discrepancy() {
        let conflict = Conflict::Distance {
            supplied: 101.0,
            from_parallax: 100.0,
        };
        let err = RegionError::coordinate_mismatch("distance differs", conflict);
        assert!(err.is_mismatch());
        if let RegionError::CoordinateMismatch { discrepancy, .. } = err {
            assert!((discrepancy - 1.0).abs() < 1e-12);
        } else {
            panic!("Expected CoordinateMismatch");
        }
    }

    #[test]
    fn test_center_conflict_carries_values() {
        let a = GalacticCartesian::new(1.0, 2.0, 3.0);
        let b = GalacticCartesian::new(1.0, 3.5, 3.0);
        let err = RegionError::coordinate_mismatch(
            "paths differ",
            Conflict::Center {
                first: a,
                second: b,
            },
        );
        match err {
            RegionError::CoordinateMismatch {
                conflict: Conflict::Center { first, second },
                discrepancy,
                ..
            } => {
                assert_eq!(first, a);
                assert_eq!(second, b);
                assert!((discrepancy - 1.5).abs() < 1e-12);
            }
            other => panic!("Expected center conflict, got {:?}", other),
        }
    }
}
