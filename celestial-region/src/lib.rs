//! Region reconciliation for open-cluster studies.
//!
//! A target region is often described redundantly: a parallax *and* a distance,
//! equatorial *and* Galactic coordinates, sometimes a Cartesian center copied from
//! a paper. [`CoordinateResolver`] normalizes those descriptors, cross-checks the
//! redundant ones, and produces a single heliocentric Galactic Cartesian center
//! suitable for a spherical catalog selection.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`quantity`] | [`Unit`], [`Quantity`], [`Measure`]: unit-tagged inputs |
//! | [`distance`] | [`Distance`] with parallax conversion (`d = 1000 / plx_mas`) |
//! | [`cartesian`] | [`GalacticCartesian`] from ICRS or Galactic spherical positions |
//! | [`descriptor`] | [`RegionDescriptor`] builder |
//! | [`resolver`] | [`CoordinateResolver`], [`cross_validate`] |
//!
//! # Quick Start
//!
//! ```
//! use celestial_region::RegionDescriptor;
//!
//! let pleiades = RegionDescriptor::new()
//!     .named("Pleiades")
//!     .parallax(5.718)
//!     .galactic(147.3566, -6.4040)
//!     .resolve()?;
//!
//! let center = pleiades.resolve_center()?;
//! assert!(center.x() < 0.0);
//! # Ok::<(), celestial_region::RegionError>(())
//! ```
//!
//! # Features
//!
//! - **`serde`**: `Serialize`/`Deserialize` for units, quantities, distances and centers.

pub mod cartesian;
pub mod constants;
pub mod descriptor;
pub mod distance;
pub mod errors;
pub mod quantity;
pub mod resolver;

pub use cartesian::GalacticCartesian;
pub use descriptor::RegionDescriptor;
pub use distance::Distance;
pub use errors::{Conflict, RegionError, RegionResult};
pub use quantity::{Dimension, Measure, Quantity, Unit};
pub use resolver::{cross_validate, CoordinateResolver, CrossCheck};
