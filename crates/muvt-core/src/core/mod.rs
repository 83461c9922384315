//! # Core Module
//!
//! Fundamental building blocks of the simulation state: molecular data
//! models, simulation cell geometries, type catalogs, and shared utilities.
//!
//! ## Architecture
//!
//! - **State containers** ([`models`]) - particles, elastic ranges, molecule
//!   groups, the [`models::space::Space`] aggregate, and the [`models::change::Change`]
//!   diff protocol that makes accept/reject cost proportional to the size of
//!   a move rather than the size of the system
//! - **Cell geometry** ([`cell`]) - the closed set of boundary topologies
//!   (open box, periodic box, cylinder, sphere) behind a single dispatch
//!   point per operation
//! - **Type catalogs** ([`catalog`]) - append-only, read-only registries of
//!   atom and molecule kinds, loaded once at startup and injected by
//!   reference wherever type constants are needed
//! - **Utilities** ([`utils`]) - the reproducible random source and free
//!   geometric helpers (spherical conversions, sphere picking, mass centers)

pub mod catalog;
pub mod cell;
pub mod models;
pub mod utils;

/// 3-component position vector used throughout the crate.
pub type Point = nalgebra::Point3<f64>;
