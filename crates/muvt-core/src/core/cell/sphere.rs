use super::CellError;
use crate::core::Point;
use crate::core::utils::random::Random;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Spherical cell: fully confined, no periodicity, plain Euclidean
/// distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SphereData")]
pub struct Sphere {
    radius: f64,
}

#[derive(Deserialize)]
struct SphereData {
    radius: f64,
}

impl TryFrom<SphereData> for Sphere {
    type Error = CellError;

    fn try_from(data: SphereData) -> Result<Self, Self::Error> {
        Self::new(data.radius)
    }
}

impl Sphere {
    pub fn new(radius: f64) -> Result<Self, CellError> {
        if radius <= 0.0 {
            return Err(CellError::NonPositiveDimension {
                name: "radius",
                value: radius,
            });
        }
        Ok(Self { radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.radius.powi(3)
    }

    /// Re-derives the radius for the requested volume.
    pub fn set_volume(&mut self, volume: f64) -> Result<(), CellError> {
        if volume <= 0.0 {
            return Err(CellError::NonPositiveVolume { volume });
        }
        self.radius = (3.0 * volume / (4.0 * PI)).cbrt();
        Ok(())
    }

    /// Uniform point in the ball by rejection sampling the bounding cube.
    pub fn random_position(&self, rng: &mut Random) -> Point {
        let diameter = 2.0 * self.radius;
        loop {
            let p = Point::new(
                (rng.uniform() - 0.5) * diameter,
                (rng.uniform() - 0.5) * diameter,
                (rng.uniform() - 0.5) * diameter,
            );
            if p.coords.norm_squared() <= self.radius * self.radius {
                return p;
            }
        }
    }

    /// True when the particle crosses the spherical wall.
    pub fn collision(&self, p: &Point, radius: f64) -> bool {
        p.coords.norm() + radius > self.radius
    }
}
