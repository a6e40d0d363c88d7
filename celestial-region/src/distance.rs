use crate::constants::PARALLAX_DISTANCE_PRODUCT;
use crate::{RegionError, RegionResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Heliocentric distance, stored in parsecs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Distance {
    parsecs: f64,
}

impl Distance {
    /// Creates a Distance from parsecs.
    ///
    /// # Valid Range
    /// Must be positive and finite (0 < parsecs < ∞)
    ///
    /// # Errors
    /// Returns `RegionError::InvalidValue` if value is ≤0, infinite, or NaN.
    pub fn from_parsecs(parsecs: f64) -> RegionResult<Self> {
        if !parsecs.is_finite() || parsecs <= 0.0 {
            return Err(RegionError::invalid_value(format!(
                "Distance must be positive and finite, got {} pc",
                parsecs
            )));
        }
        Ok(Self { parsecs })
    }

    /// Creates a Distance from parallax in milliarcseconds.
    ///
    /// # Note
    /// Distance (parsecs) = 1000 / parallax (mas)
    pub fn from_parallax_milliarcsec(parallax_mas: f64) -> RegionResult<Self> {
        if !parallax_mas.is_finite() || parallax_mas <= 0.0 {
            return Err(RegionError::invalid_value(format!(
                "Parallax must be positive and finite, got {} mas",
                parallax_mas
            )));
        }
        Self::from_parsecs(PARALLAX_DISTANCE_PRODUCT / parallax_mas)
    }

    pub fn parsecs(self) -> f64 {
        self.parsecs
    }

    pub fn parallax_milliarcsec(self) -> f64 {
        PARALLAX_DISTANCE_PRODUCT / self.parsecs
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.parsecs.partial_cmp(&other.parsecs)
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.parsecs < 1000.0 {
            write!(f, "{:.3} pc", self.parsecs)
        } else {
            write!(f, "{:.3} kpc", self.parsecs / 1000.0)
        }
    }
}
