//! Remote astronomy services used when following up an open-cluster region.
//!
//! | Module | Service |
//! |--------|---------|
//! | [`tap`] | Gaia DR3 / GeDR3 mock spherical selections over TAP `/sync` |
//! | [`cfht`] | CFHT SPIRou exposure time calculator |
//! | [`staralt`] | ING STARALT observability plots |
//! | [`tables`] | Cluster summary and star list CSV tables |
//! | [`config`] | Endpoints and client settings |
//!
//! All clients are blocking (`reqwest::blocking`) and write raw responses to disk
//! through [`export::write_payload`].
//!
//! # Features
//!
//! - **`cli`**: builds the `cluster-query` binary.

pub mod cfht;
pub mod config;
pub mod errors;
pub mod export;
pub mod staralt;
pub mod tables;
pub mod tap;

pub use config::ServiceConfig;
pub use errors::{ServiceError, ServiceResult};
