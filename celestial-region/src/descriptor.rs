use crate::{CoordinateResolver, GalacticCartesian, Measure, RegionResult};

/// Caller-supplied description of a target region.
///
/// Every spatial field is optional and may be redundant with another. Bare
/// numbers are read in the canonical unit of their field:
///
/// | Field | Canonical unit |
/// |-------|----------------|
/// | `parallax` | mas |
/// | `distance` | pc |
/// | `longitude`, `latitude` | deg (Galactic) |
/// | `right_ascension`, `declination` | deg (ICRS) |
/// | `cartesian` | pc (Galactic) |
///
/// `strict` defaults to `true`: contradictions between redundant fields are errors.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDescriptor {
    pub name: Option<String>,
    pub parallax: Option<Measure>,
    pub distance: Option<Measure>,
    pub longitude: Option<Measure>,
    pub latitude: Option<Measure>,
    pub right_ascension: Option<Measure>,
    pub declination: Option<Measure>,
    pub cartesian: Option<GalacticCartesian>,
    pub strict: bool,
}

impl Default for RegionDescriptor {
    fn default() -> Self {
        Self {
            name: None,
            parallax: None,
            distance: None,
            longitude: None,
            latitude: None,
            right_ascension: None,
            declination: None,
            cartesian: None,
            strict: true,
        }
    }
}

impl RegionDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn parallax(mut self, parallax: impl Into<Measure>) -> Self {
        self.parallax = Some(parallax.into());
        self
    }

    pub fn distance(mut self, distance: impl Into<Measure>) -> Self {
        self.distance = Some(distance.into());
        self
    }

    pub fn galactic(mut self, longitude: impl Into<Measure>, latitude: impl Into<Measure>) -> Self {
        self.longitude = Some(longitude.into());
        self.latitude = Some(latitude.into());
        self
    }

    pub fn equatorial(
        mut self,
        right_ascension: impl Into<Measure>,
        declination: impl Into<Measure>,
    ) -> Self {
        self.right_ascension = Some(right_ascension.into());
        self.declination = Some(declination.into());
        self
    }

    pub fn cartesian(mut self, x: f64, y: f64, z: f64) -> Self {
        self.cartesian = Some(GalacticCartesian::new(x, y, z));
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Normalizes and reconciles this descriptor. See [`CoordinateResolver::new`].
    pub fn resolve(self) -> RegionResult<CoordinateResolver> {
        CoordinateResolver::new(self)
    }
}
