//! Heliocentric Cartesian positions in the Galactic frame.
//!
//! +x points toward the Galactic center (l = 0°, b = 0°), +y toward l = 90°,
//! +z toward the North Galactic Pole. All components are in parsecs.

use crate::constants::{GALACTIC_TO_ICRS, RAD_PER_DEG};
use crate::Distance;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GalacticCartesian {
    x: f64,
    y: f64,
    z: f64,
}

impl GalacticCartesian {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Places a point at `distance` along Galactic longitude `l_deg`, latitude `b_deg`.
    pub fn from_galactic(distance: Distance, l_deg: f64, b_deg: f64) -> Self {
        let d = distance.parsecs();
        let (sin_l, cos_l) = sin_cos_deg(l_deg);
        let (sin_b, cos_b) = sin_cos_deg(b_deg);

        Self::new(d * cos_b * cos_l, d * cos_b * sin_l, d * sin_b)
    }

    /// Places a point at `distance` along ICRS direction (`ra_deg`, `dec_deg`) and
    /// rotates it into the Galactic frame.
    pub fn from_icrs(distance: Distance, ra_deg: f64, dec_deg: f64) -> Self {
        let d = distance.parsecs();
        let (sin_ra, cos_ra) = sin_cos_deg(ra_deg);
        let (sin_dec, cos_dec) = sin_cos_deg(dec_deg);
        let icrs = [cos_dec * cos_ra, cos_dec * sin_ra, sin_dec];

        // gal = M * icrs (row-major)
        let m = &GALACTIC_TO_ICRS;
        let gal = [
            m[0][0] * icrs[0] + m[0][1] * icrs[1] + m[0][2] * icrs[2],
            m[1][0] * icrs[0] + m[1][1] * icrs[1] + m[1][2] * icrs[2],
            m[2][0] * icrs[0] + m[2][1] * icrs[1] + m[2][2] * icrs[2],
        ];

        Self::new(d * gal[0], d * gal[1], d * gal[2])
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn distance_from_sun(&self) -> f64 {
        libm::sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    pub fn max_abs_difference(&self, other: &Self) -> f64 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }

    /// True when every component differs by less than `tolerance_pc`.
    pub fn agrees_with(&self, other: &Self, tolerance_pc: f64) -> bool {
        (self.x - other.x).abs() < tolerance_pc
            && (self.y - other.y).abs() < tolerance_pc
            && (self.z - other.z).abs() < tolerance_pc
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }
}

impl From<(f64, f64, f64)> for GalacticCartesian {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<GalacticCartesian> for (f64, f64, f64) {
    fn from(c: GalacticCartesian) -> Self {
        (c.x, c.y, c.z)
    }
}

impl std::fmt::Display for GalacticCartesian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(x={:.5}, y={:.5}, z={:.5}) pc",
            self.x, self.y, self.z
        )
    }
}

fn sin_cos_deg(deg: f64) -> (f64, f64) {
    let rad = deg * RAD_PER_DEG;
    (libm::sin(rad), libm::cos(rad))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(d: f64) -> Distance {
        Distance::from_parsecs(d).unwrap()
    }

    #[test]
    fn test_from_galactic_axes() {
        let gc = GalacticCartesian::from_galactic(pc(100.0), 0.0, 0.0);
        assert!((gc.x() - 100.0).abs() < 1e-9);
        assert!(gc.y().abs() < 1e-9);
        assert!(gc.z().abs() < 1e-9);

        let ngp = GalacticCartesian::from_galactic(pc(100.0), 0.0, 90.0);
        assert!((ngp.z() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_galactic_formula() {
        let c = GalacticCartesian::from_galactic(pc(100.0), 30.0, 5.0);
        let cos_b = 5.0_f64.to_radians().cos();
        assert!((c.x() - 100.0 * cos_b * 30.0_f64.to_radians().cos()).abs() < 1e-9);
        assert!((c.y() - 100.0 * cos_b * 30.0_f64.to_radians().sin()).abs() < 1e-9);
        assert!((c.z() - 100.0 * 5.0_f64.to_radians().sin()).abs() < 1e-9);
    }

    #[test]
    fn test_icrs_galactic_center_direction() {
        // l = 0, b = 0 in ICRS
        let c = GalacticCartesian::from_icrs(pc(1000.0), 266.405, -28.936);
        assert!((c.x() - 1000.0).abs() < 0.01);
        assert!(c.y().abs() < 0.5);
        assert!(c.z().abs() < 0.5);
    }

    #[test]
    fn test_icrs_north_galactic_pole() {
        let c = GalacticCartesian::from_icrs(pc(1.0), 192.859508, 27.128336);
        assert!((c.z() - 1.0).abs() < 1e-6);
        assert!(c.x().abs() < 1e-3);
        assert!(c.y().abs() < 1e-3);
    }

    #[test]
    fn test_icrs_preserves_length() {
        let c = GalacticCartesian::from_icrs(pc(136.2), 56.75, 24.12);
        assert!((c.distance_from_sun() - 136.2).abs() < 1e-9);
    }

    #[test]
    fn test_agreement_and_midpoint() {
        let a = GalacticCartesian::new(10.0, 20.0, 30.0);
        let b = GalacticCartesian::new(10.05, 19.95, 30.0);
        assert!(a.agrees_with(&b, 0.1));
        assert!((a.max_abs_difference(&b) - 0.05).abs() < 1e-9);

        let mid = a.midpoint(&b);
        assert!((mid.x() - 10.025).abs() < 1e-12);
        assert!((mid.y() - 19.975).abs() < 1e-12);

        let far = GalacticCartesian::new(11.0, 20.0, 30.0);
        assert!(!a.agrees_with(&far, 0.1));
    }

    #[test]
    fn test_tuple_conversions() {
        let c: GalacticCartesian = (1.0, 2.0, 3.0).into();
        let t: (f64, f64, f64) = c.into();
        assert_eq!(t, (1.0, 2.0, 3.0));
    }
}
