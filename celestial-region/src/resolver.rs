//! Reconciliation of redundant region descriptors into one Galactic Cartesian center.
//!
//! Two independent derivations of the center are possible:
//!
//! - **equatorial**: distance + (RA, Dec), rotated from ICRS into the Galactic frame
//! - **galactic**: parallax-derived distance + (l, b), placed directly
//!
//! When both are available they must agree to within
//! [`CENTER_TOLERANCE_PC`] per component and the result is their mean. An
//! explicitly supplied Cartesian center is cross-checked against the derived one.
//!
//! Contradictions are errors in strict mode. Otherwise they are logged with
//! `log::warn!`, recorded in [`CoordinateResolver::diagnostics`], and the explicit
//! input wins: the equatorial center over the galactic one, a supplied Cartesian
//! center over any derived one, a supplied distance over a supplied parallax.

use std::cell::{OnceCell, RefCell};

use crate::constants::{CENTER_TOLERANCE_PC, DISTANCE_TOLERANCE_PC};
use crate::{
    Conflict, Distance, GalacticCartesian, Quantity, RegionDescriptor, RegionError, RegionResult,
    Unit,
};

/// Result of comparing a supplied center against a computed one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossCheck {
    pub matches: bool,
    pub supplied: GalacticCartesian,
    pub computed: GalacticCartesian,
    pub discrepancy: f64,
}

/// Compares two centers component-wise with [`CENTER_TOLERANCE_PC`].
pub fn cross_validate(supplied: GalacticCartesian, computed: GalacticCartesian) -> CrossCheck {
    CrossCheck {
        matches: supplied.agrees_with(&computed, CENTER_TOLERANCE_PC),
        supplied,
        computed,
        discrepancy: supplied.max_abs_difference(&computed),
    }
}

#[derive(Debug)]
pub struct CoordinateResolver {
    name: Option<String>,
    strict: bool,
    parallax_mas: Option<f64>,
    distance: Option<Distance>,
    longitude_deg: Option<f64>,
    latitude_deg: Option<f64>,
    ra_deg: Option<f64>,
    dec_deg: Option<f64>,
    explicit_center: Option<GalacticCartesian>,
    parallax_derived: bool,
    distance_derived: bool,
    center: OnceCell<GalacticCartesian>,
    diagnostics: RefCell<Vec<String>>,
}

impl CoordinateResolver {
    /// Normalizes every field to its canonical unit and reconciles parallax with distance.
    ///
    /// # Errors
    /// - `UnitMismatch` if a tagged field has the wrong dimension
    /// - `InvalidValue` for non-finite values, non-positive parallax/distance,
    ///   or |latitude|, |declination| > 90°
    /// - `CoordinateMismatch` (strict only) if parallax and distance disagree by
    ///   [`DISTANCE_TOLERANCE_PC`] or more
    pub fn new(descriptor: RegionDescriptor) -> RegionResult<Self> {
        let RegionDescriptor {
            name,
            parallax,
            distance,
            longitude,
            latitude,
            right_ascension,
            declination,
            cartesian,
            strict,
        } = descriptor;

        let parallax_mas = parallax
            .map(|m| m.normalize(Unit::Milliarcsecond, "parallax"))
            .transpose()?;
        let distance = distance
            .map(|m| m.normalize(Unit::Parsec, "distance"))
            .transpose()?
            .map(Distance::from_parsecs)
            .transpose()?;
        let longitude_deg = longitude
            .map(|m| m.normalize(Unit::Degree, "longitude"))
            .transpose()?;
        let latitude_deg = latitude
            .map(|m| m.normalize(Unit::Degree, "latitude"))
            .transpose()?
            .map(|b| check_latitude(b, "latitude"))
            .transpose()?;
        let ra_deg = right_ascension
            .map(|m| m.normalize(Unit::Degree, "right ascension"))
            .transpose()?;
        let dec_deg = declination
            .map(|m| m.normalize(Unit::Degree, "declination"))
            .transpose()?
            .map(|d| check_latitude(d, "declination"))
            .transpose()?;

        if let Some(center) = &cartesian {
            if !center.to_array().iter().all(|v| v.is_finite()) {
                return Err(RegionError::invalid_value(format!(
                    "Cartesian center must be finite, got {}",
                    center
                )));
            }
        }

        let mut resolver = Self {
            name,
            strict,
            parallax_mas,
            distance,
            longitude_deg,
            latitude_deg,
            ra_deg,
            dec_deg,
            explicit_center: cartesian,
            parallax_derived: false,
            distance_derived: false,
            center: OnceCell::new(),
            diagnostics: RefCell::new(Vec::new()),
        };
        resolver.reconcile_distance()?;
        Ok(resolver)
    }

    fn reconcile_distance(&mut self) -> RegionResult<()> {
        match (self.parallax_mas, self.distance) {
            (Some(plx), Some(distance)) => {
                let implied = Distance::from_parallax_milliarcsec(plx)?;
                let gap = Quantity::new(distance.parsecs(), Unit::Parsec)
                    .abs_difference(Quantity::new(implied.parsecs(), Unit::Parsec))?;
                if gap.value() >= DISTANCE_TOLERANCE_PC {
                    self.contradiction(
                        format!(
                            "Input distance '{:.6} pc' does not match the distance '{:.6} pc' \
                             converted from parallax {} mas",
                            distance.parsecs(),
                            implied.parsecs(),
                            plx
                        ),
                        Conflict::Distance {
                            supplied: distance.parsecs(),
                            from_parallax: implied.parsecs(),
                        },
                    )?;
                }
            }
            (None, Some(distance)) => {
                self.parallax_mas = Some(distance.parallax_milliarcsec());
                self.parallax_derived = true;
            }
            (Some(plx), None) => {
                self.distance = Some(Distance::from_parallax_milliarcsec(plx)?);
                self.distance_derived = true;
            }
            (None, None) => {}
        }
        Ok(())
    }

    /// Returns the reconciled Galactic Cartesian center, in parsecs.
    ///
    /// Computed on first success and cached; later calls return the cached value.
    pub fn resolve_center(&self) -> RegionResult<GalacticCartesian> {
        if let Some(center) = self.center.get() {
            return Ok(*center);
        }
        let center = self.compute_center()?;
        Ok(*self.center.get_or_init(|| center))
    }

    fn compute_center(&self) -> RegionResult<GalacticCartesian> {
        let derived = match (self.equatorial_center(), self.galactic_center()) {
            (Some(equatorial), Some(galactic)) => {
                if equatorial.agrees_with(&galactic, CENTER_TOLERANCE_PC) {
                    Some(equatorial.midpoint(&galactic))
                } else {
                    self.contradiction(
                        format!(
                            "Conversion from equatorial {} and galactic {} differs",
                            equatorial, galactic
                        ),
                        Conflict::Center {
                            first: equatorial,
                            second: galactic,
                        },
                    )?;
                    Some(equatorial)
                }
            }
            (Some(equatorial), None) => Some(equatorial),
            (None, Some(galactic)) => Some(galactic),
            (None, None) => None,
        };

        match (derived, self.explicit_center) {
            (Some(derived), Some(explicit)) => {
                let check = cross_validate(explicit, derived);
                if check.matches {
                    Ok(derived)
                } else {
                    self.contradiction(
                        format!(
                            "Supplied center {} does not match derived center {}",
                            explicit, derived
                        ),
                        Conflict::Center {
                            first: explicit,
                            second: derived,
                        },
                    )?;
                    Ok(explicit)
                }
            }
            (Some(derived), None) => Ok(derived),
            (None, Some(explicit)) => Ok(explicit),
            (None, None) => Err(RegionError::insufficient_data(format!(
                "Unable to compute a center for {}: supply distance, right ascension and \
                 declination, or parallax, longitude and latitude",
                self.label()
            ))),
        }
    }

    fn equatorial_center(&self) -> Option<GalacticCartesian> {
        let distance = self.distance?;
        Some(GalacticCartesian::from_icrs(
            distance,
            self.ra_deg?,
            self.dec_deg?,
        ))
    }

    fn galactic_center(&self) -> Option<GalacticCartesian> {
        self.parallax_mas?;
        let distance = self.distance?;
        Some(GalacticCartesian::from_galactic(
            distance,
            self.longitude_deg?,
            self.latitude_deg?,
        ))
    }

    fn contradiction(&self, message: String, conflict: Conflict) -> RegionResult<()> {
        if self.strict {
            return Err(RegionError::coordinate_mismatch(message, conflict));
        }
        let diagnostic = format!("{} (discrepancy {:.6} pc)", message, conflict.discrepancy());
        log::warn!("{}: {}; check the input data", self.label(), diagnostic);
        self.diagnostics.borrow_mut().push(diagnostic);
        Ok(())
    }

    /// Compares an externally supplied center with this resolver's center.
    pub fn cross_validate(&self, supplied: GalacticCartesian) -> RegionResult<CrossCheck> {
        Ok(cross_validate(supplied, self.resolve_center()?))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn parallax_mas(&self) -> Option<f64> {
        self.parallax_mas
    }

    pub fn distance(&self) -> Option<Distance> {
        self.distance
    }

    pub fn longitude_deg(&self) -> Option<f64> {
        self.longitude_deg
    }

    pub fn latitude_deg(&self) -> Option<f64> {
        self.latitude_deg
    }

    pub fn right_ascension_deg(&self) -> Option<f64> {
        self.ra_deg
    }

    pub fn declination_deg(&self) -> Option<f64> {
        self.dec_deg
    }

    pub fn explicit_center(&self) -> Option<GalacticCartesian> {
        self.explicit_center
    }

    pub fn parallax_is_derived(&self) -> bool {
        self.parallax_derived
    }

    pub fn distance_is_derived(&self) -> bool {
        self.distance_derived
    }

    /// Contradictions downgraded to warnings so far (non-strict mode only).
    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics.borrow().clone()
    }

    /// Multi-line report of every populated field; derived values are starred.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("{:*^30}", format!(" {} ", self.label()))];

        let mut push = |label: &str, value: Option<f64>, unit: Unit| {
            if let Some(value) = value {
                lines.push(format!("{:<14}{:<12.5}{}", label, value, unit));
            }
        };

        let plx_label = if self.parallax_derived { "*cnvrt. plx" } else { "plx" };
        push(plx_label, self.parallax_mas, Unit::Milliarcsecond);
        push("long", self.longitude_deg, Unit::Degree);
        push("lat", self.latitude_deg, Unit::Degree);
        push("ra", self.ra_deg, Unit::Degree);
        push("dec", self.dec_deg, Unit::Degree);
        let dist_label = if self.distance_derived { "*cnvrt. dist" } else { "dist" };
        push(dist_label, self.distance.map(Distance::parsecs), Unit::Parsec);

        if let Some(center) = self.center.get() {
            lines.push(format!("{:<14}{}", "center", center));
        }
        lines.push("*".repeat(30));
        lines.join("\n")
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed region")
    }
}

impl std::fmt::Display for CoordinateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

fn check_latitude(deg: f64, field: &str) -> RegionResult<f64> {
    if (-90.0..=90.0).contains(&deg) {
        Ok(deg)
    } else {
        Err(RegionError::invalid_value(format!(
            "{} {:.4}° out of range [-90°, +90°]",
            field, deg
        )))
    }
}
