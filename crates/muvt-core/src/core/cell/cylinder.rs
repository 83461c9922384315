use super::CellError;
use crate::core::Point;
use crate::core::utils::random::Random;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Cylindrical cell: periodic along its z axis, radially confined.
///
/// Random placement rejection-samples the bounding square of the disk, an
/// expected-constant number of draws (acceptance ratio π/4).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CylinderData")]
pub struct Cylinder {
    radius: f64,
    length: f64,
}

#[derive(Deserialize)]
struct CylinderData {
    radius: f64,
    length: f64,
}

impl TryFrom<CylinderData> for Cylinder {
    type Error = CellError;

    fn try_from(data: CylinderData) -> Result<Self, Self::Error> {
        Self::new(data.radius, data.length)
    }
}

impl Cylinder {
    pub fn new(radius: f64, length: f64) -> Result<Self, CellError> {
        if radius <= 0.0 {
            return Err(CellError::NonPositiveDimension {
                name: "radius",
                value: radius,
            });
        }
        if length <= 0.0 {
            return Err(CellError::NonPositiveDimension {
                name: "length",
                value: length,
            });
        }
        Ok(Self { radius, length })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Measure of the cell: 1 → axis length, 2 → cross-section area,
    /// anything else → the 3-D volume.
    pub fn volume(&self, dim: usize) -> f64 {
        match dim {
            1 => self.length,
            2 => PI * self.radius * self.radius,
            _ => PI * self.radius * self.radius * self.length,
        }
    }

    /// Re-derives the radius for the requested volume at fixed length.
    pub fn set_volume(&mut self, volume: f64) -> Result<(), CellError> {
        if volume <= 0.0 {
            return Err(CellError::NonPositiveVolume { volume });
        }
        self.radius = (volume / (PI * self.length)).sqrt();
        Ok(())
    }

    pub fn random_position(&self, rng: &mut Random) -> Point {
        let z = (rng.uniform() - 0.5) * self.length;
        let diameter = 2.0 * self.radius;
        loop {
            let x = (rng.uniform() - 0.5) * diameter;
            let y = (rng.uniform() - 0.5) * diameter;
            if x * x + y * y <= self.radius * self.radius {
                return Point::new(x, y, z);
            }
        }
    }

    /// Minimum-image vector from `b` to `a`; only z is periodic.
    pub fn min_image(&self, a: &Point, b: &Point) -> Vector3<f64> {
        let mut r = a - b;
        let half = 0.5 * self.length;
        if r.z > half {
            r.z -= self.length;
        } else if r.z < -half {
            r.z += self.length;
        }
        r
    }

    /// Wraps the z component back into the cell.
    pub fn wrap(&self, p: &mut Point) {
        if p.z.abs() > 0.5 * self.length {
            p.z -= self.length * (p.z / self.length).round();
        }
    }

    /// True when the particle crosses the radial wall.
    pub fn collision(&self, p: &Point, radius: f64) -> bool {
        (p.x * p.x + p.y * p.y).sqrt() + radius > self.radius
    }
}
