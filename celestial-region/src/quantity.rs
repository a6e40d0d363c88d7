//! Unit-tagged values.
//!
//! Every field of a [`RegionDescriptor`](crate::RegionDescriptor) accepts either a
//! bare `f64`, taken to be in the field's canonical unit, or a [`Quantity`] that is
//! converted to the canonical unit once, at construction.
//!
//! ```
//! use celestial_region::{Measure, Quantity, Unit};
//!
//! let plx = Measure::from(Quantity::new(0.005718, Unit::Arcsecond));
//! let mas = plx.normalize(Unit::Milliarcsecond, "parallax").unwrap();
//! assert!((mas - 5.718).abs() < 1e-9);
//! ```

use crate::constants::{AU_TO_PC, DEG_PER_RAD, LY_TO_PC};
use crate::{RegionError, RegionResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dimension {
    Angle,
    Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Unit {
    Milliarcsecond,
    Arcsecond,
    Arcminute,
    Degree,
    Radian,
    Parsec,
    Kiloparsec,
    LightYear,
    AstronomicalUnit,
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Self::Milliarcsecond
            | Self::Arcsecond
            | Self::Arcminute
            | Self::Degree
            | Self::Radian => Dimension::Angle,
            Self::Parsec | Self::Kiloparsec | Self::LightYear | Self::AstronomicalUnit => {
                Dimension::Length
            }
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Milliarcsecond => "mas",
            Self::Arcsecond => "arcsec",
            Self::Arcminute => "arcmin",
            Self::Degree => "deg",
            Self::Radian => "rad",
            Self::Parsec => "pc",
            Self::Kiloparsec => "kpc",
            Self::LightYear => "lyr",
            Self::AstronomicalUnit => "AU",
        }
    }

    /// Size of one of this unit in the base unit of its dimension (degree or parsec).
    fn in_base(self) -> f64 {
        match self {
            Self::Milliarcsecond => 1.0 / 3_600_000.0,
            Self::Arcsecond => 1.0 / 3600.0,
            Self::Arcminute => 1.0 / 60.0,
            Self::Degree => 1.0,
            Self::Radian => DEG_PER_RAD,
            Self::Parsec => 1.0,
            Self::Kiloparsec => 1000.0,
            Self::LightYear => LY_TO_PC,
            Self::AstronomicalUnit => AU_TO_PC,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A numeric value tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

impl Quantity {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn value(self) -> f64 {
        self.value
    }

    pub fn unit(self) -> Unit {
        self.unit
    }

    /// Converts to `unit`.
    ///
    /// # Errors
    /// Returns `RegionError::UnitMismatch` when `unit` measures a different dimension.
    pub fn to(self, unit: Unit) -> RegionResult<Self> {
        if self.unit == unit {
            return Ok(self);
        }
        if self.unit.dimension() != unit.dimension() {
            return Err(RegionError::unit_mismatch("conversion", unit, self.unit));
        }
        Ok(Self::new(
            self.value * self.unit.in_base() / unit.in_base(),
            unit,
        ))
    }

    pub fn value_in(self, unit: Unit) -> RegionResult<f64> {
        self.to(unit).map(Quantity::value)
    }

    /// Absolute difference, expressed in `self`'s unit.
    pub fn abs_difference(self, other: Self) -> RegionResult<Self> {
        let other = self.compatible(other, "comparison")?;
        Ok(Self::new((self.value - other.value).abs(), self.unit))
    }

    fn compatible(self, other: Self, operation: &str) -> RegionResult<Self> {
        if self.unit.dimension() != other.unit.dimension() {
            return Err(RegionError::unit_mismatch(operation, self.unit, other.unit));
        }
        other.to(self.unit)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(precision) = f.precision() {
            write!(f, "{:.*} {}", precision, self.value, self.unit)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

/// A caller-supplied field value: bare, or tagged with a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Measure {
    Bare(f64),
    Tagged(Quantity),
}

impl Measure {
    /// Resolves this measure to a plain value in `canonical`.
    ///
    /// `field` names the descriptor field in error messages.
    pub fn normalize(self, canonical: Unit, field: &str) -> RegionResult<f64> {
        let value = match self {
            Self::Bare(value) => value,
            Self::Tagged(quantity) => quantity.to(canonical).map_err(|_| {
                RegionError::unit_mismatch(field, canonical, quantity.unit())
            })?.value(),
        };
        if !value.is_finite() {
            return Err(RegionError::invalid_value(format!(
                "{} must be finite, got {}",
                field, value
            )));
        }
        Ok(value)
    }
}

impl From<f64> for Measure {
    fn from(value: f64) -> Self {
        Self::Bare(value)
    }
}

impl From<Quantity> for Measure {
    fn from(quantity: Quantity) -> Self {
        Self::Tagged(quantity)
    }
}
