//! # Simulation Cell Geometry
//!
//! The closed set of boundary topologies a simulation can run in: an open
//! (non-wrapping) box, a periodic box with per-axis toggles, a cylindrical
//! cell periodic along its axis, and a fully confined spherical cell.
//!
//! [`Cell`] is an enum with a single dispatch point per operation
//! (minimum-image distance, wrapping, volume get/set, random placement,
//! container collision), so the variant set is exhaustively testable and
//! calls carry no indirection.
//!
//! Minimum-image corrections are applied at most once per axis per call;
//! callers must keep per-step displacements below half the box length.

pub mod cuboid;
pub mod cylinder;
pub mod sphere;

pub use cuboid::{Cuboid, PeriodicBox};
pub use cylinder::Cylinder;
pub use sphere::Sphere;

use crate::core::Point;
use crate::core::utils::random::Random;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors raised while building or reshaping a cell.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CellError {
    /// A requested volume was zero or negative.
    #[error("cell volume must be positive, got {volume}")]
    NonPositiveVolume { volume: f64 },
    /// A shape dimension was zero or negative.
    #[error("cell dimension '{name}' must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f64 },
}

/// A simulation cell: one of the supported boundary topologies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Cell {
    /// Open box: no wrapping, plain distances; the box only bounds random
    /// placement.
    Cuboid(Cuboid),
    /// Box with periodic boundaries, toggled per axis.
    Periodic(PeriodicBox),
    /// Cylinder periodic along its z axis, radially confined.
    Cylinder(Cylinder),
    /// Fully confined sphere, no periodicity.
    Sphere(Sphere),
}

impl Cell {
    /// Volume of the cell.
    ///
    /// `dim` selects lower-dimensional measures where the shape defines
    /// them (the cylinder: 1 → length, 2 → cross-section area); every other
    /// shape returns its 3-D volume for any `dim`.
    pub fn volume(&self, dim: usize) -> f64 {
        match self {
            Cell::Cuboid(c) => c.volume(),
            Cell::Periodic(c) => c.volume(),
            Cell::Cylinder(c) => c.volume(dim),
            Cell::Sphere(c) => c.volume(),
        }
    }

    /// Rescales the cell to the requested volume.
    ///
    /// Boxes rescale isotropically, the cylinder re-derives its radius at
    /// fixed length, the sphere re-derives its radius. A non-positive
    /// volume is a configuration error.
    pub fn set_volume(&mut self, volume: f64) -> Result<(), CellError> {
        match self {
            Cell::Cuboid(c) => c.set_volume(volume),
            Cell::Periodic(c) => c.set_volume(volume),
            Cell::Cylinder(c) => c.set_volume(volume),
            Cell::Sphere(c) => c.set_volume(volume),
        }
    }

    /// Uniformly random point inside the cell.
    pub fn random_position(&self, rng: &mut Random) -> Point {
        match self {
            Cell::Cuboid(c) => c.random_position(rng),
            Cell::Periodic(c) => c.random_position(rng),
            Cell::Cylinder(c) => c.random_position(rng),
            Cell::Sphere(c) => c.random_position(rng),
        }
    }

    /// Minimum-image vector from `b` to `a`, corrected at most once per
    /// periodic axis.
    pub fn min_image(&self, a: &Point, b: &Point) -> Vector3<f64> {
        match self {
            Cell::Cuboid(_) | Cell::Sphere(_) => a - b,
            Cell::Periodic(c) => c.min_image(a, b),
            Cell::Cylinder(c) => c.min_image(a, b),
        }
    }

    /// Wraps a point back into the cell along every periodic axis.
    pub fn wrap(&self, p: &mut Point) {
        match self {
            Cell::Cuboid(_) | Cell::Sphere(_) => {}
            Cell::Periodic(c) => c.wrap(p),
            Cell::Cylinder(c) => c.wrap(p),
        }
    }

    /// True when a particle of the given radius at `p` crosses a confining
    /// (non-periodic) boundary of the cell. The open box never confines.
    pub fn collision(&self, p: &Point, radius: f64) -> bool {
        match self {
            Cell::Cuboid(_) => false,
            Cell::Periodic(c) => c.collision(p, radius),
            Cell::Cylinder(c) => c.collision(p, radius),
            Cell::Sphere(c) => c.collision(p, radius),
        }
    }
}
