use super::CellError;
use crate::core::Point;
use crate::core::utils::random::Random;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

fn check_lengths(lengths: &Vector3<f64>) -> Result<(), CellError> {
    for (value, name) in [(lengths.x, "x length"), (lengths.y, "y length"), (lengths.z, "z length")]
    {
        if value <= 0.0 {
            return Err(CellError::NonPositiveDimension { name, value });
        }
    }
    Ok(())
}

/// Open cuboidal box.
///
/// Nothing is wrapped and distances are plain differences; the side lengths
/// only bound uniform random placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CuboidData")]
pub struct Cuboid {
    lengths: Vector3<f64>,
}

#[derive(Deserialize)]
struct CuboidData {
    lengths: Vector3<f64>,
}

impl TryFrom<CuboidData> for Cuboid {
    type Error = CellError;

    fn try_from(data: CuboidData) -> Result<Self, Self::Error> {
        Self::new(data.lengths)
    }
}

impl Cuboid {
    /// Creates an open box with the given side lengths.
    pub fn new(lengths: Vector3<f64>) -> Result<Self, CellError> {
        check_lengths(&lengths)?;
        Ok(Self { lengths })
    }

    /// Side lengths.
    pub fn lengths(&self) -> Vector3<f64> {
        self.lengths
    }

    pub fn volume(&self) -> f64 {
        self.lengths.x * self.lengths.y * self.lengths.z
    }

    /// Rescales the box isotropically to the requested volume.
    pub fn set_volume(&mut self, volume: f64) -> Result<(), CellError> {
        if volume <= 0.0 {
            return Err(CellError::NonPositiveVolume { volume });
        }
        let scale = (volume / self.volume()).cbrt();
        self.lengths *= scale;
        Ok(())
    }

    pub fn random_position(&self, rng: &mut Random) -> Point {
        Point::new(
            (rng.uniform() - 0.5) * self.lengths.x,
            (rng.uniform() - 0.5) * self.lengths.y,
            (rng.uniform() - 0.5) * self.lengths.z,
        )
    }
}

/// Cuboidal box with periodic boundaries, toggled independently per axis.
///
/// The minimum-image convention applies a single ±L correction per enabled
/// axis; callers must keep displacements below half the box length per step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PeriodicBoxData")]
pub struct PeriodicBox {
    lengths: Vector3<f64>,
    periodic: [bool; 3],
}

#[derive(Deserialize)]
struct PeriodicBoxData {
    lengths: Vector3<f64>,
    #[serde(default = "PeriodicBoxData::all_axes")]
    periodic: [bool; 3],
}

impl PeriodicBoxData {
    fn all_axes() -> [bool; 3] {
        [true, true, true]
    }
}

impl TryFrom<PeriodicBoxData> for PeriodicBox {
    type Error = CellError;

    fn try_from(data: PeriodicBoxData) -> Result<Self, Self::Error> {
        Self::new(data.lengths, data.periodic)
    }
}

impl PeriodicBox {
    /// Creates a box with the given side lengths and per-axis periodicity.
    pub fn new(lengths: Vector3<f64>, periodic: [bool; 3]) -> Result<Self, CellError> {
        check_lengths(&lengths)?;
        Ok(Self { lengths, periodic })
    }

    /// Fully periodic cube of side `length`.
    pub fn cube(length: f64) -> Result<Self, CellError> {
        Self::new(Vector3::new(length, length, length), [true, true, true])
    }

    /// Slit geometry: periodic in x and y, confined in z.
    pub fn slit(lengths: Vector3<f64>) -> Result<Self, CellError> {
        Self::new(lengths, [true, true, false])
    }

    /// Side lengths.
    pub fn lengths(&self) -> Vector3<f64> {
        self.lengths
    }

    /// Per-axis periodicity flags.
    pub fn periodic(&self) -> [bool; 3] {
        self.periodic
    }

    pub fn volume(&self) -> f64 {
        self.lengths.x * self.lengths.y * self.lengths.z
    }

    /// Rescales the box isotropically to the requested volume.
    pub fn set_volume(&mut self, volume: f64) -> Result<(), CellError> {
        if volume <= 0.0 {
            return Err(CellError::NonPositiveVolume { volume });
        }
        let scale = (volume / self.volume()).cbrt();
        self.lengths *= scale;
        Ok(())
    }

    pub fn random_position(&self, rng: &mut Random) -> Point {
        Point::new(
            (rng.uniform() - 0.5) * self.lengths.x,
            (rng.uniform() - 0.5) * self.lengths.y,
            (rng.uniform() - 0.5) * self.lengths.z,
        )
    }

    /// Minimum-image vector from `b` to `a`: one ±L correction per periodic
    /// axis, never iterative.
    pub fn min_image(&self, a: &Point, b: &Point) -> Vector3<f64> {
        let mut r = a - b;
        for axis in 0..3 {
            if self.periodic[axis] {
                let length = self.lengths[axis];
                let half = 0.5 * length;
                if r[axis] > half {
                    r[axis] -= length;
                } else if r[axis] < -half {
                    r[axis] += length;
                }
            }
        }
        r
    }

    /// Wraps a point with the nearest-integer image correction
    /// `x -= L * round(x / L)` on every periodic axis.
    pub fn wrap(&self, p: &mut Point) {
        for axis in 0..3 {
            if self.periodic[axis] {
                let length = self.lengths[axis];
                if p[axis].abs() > 0.5 * length {
                    p[axis] -= length * (p[axis] / length).round();
                }
            }
        }
    }

    /// True when the particle crosses a confining (non-periodic) wall.
    pub fn collision(&self, p: &Point, radius: f64) -> bool {
        (0..3).any(|axis| {
            !self.periodic[axis] && p[axis].abs() + radius > 0.5 * self.lengths[axis]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_wrap_free_volume_and_placement() {
        let cell = Cuboid::new(Vector3::new(2.0, 3.0, 4.0)).unwrap();
        assert!((cell.volume() - 24.0).abs() < 1e-12);

        let mut rng = Random::new();
        for _ in 0..500 {
            let p = cell.random_position(&mut rng);
            assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.5 && p.z.abs() <= 2.0);
        }
    }

    #[test]
    fn cuboid_rejects_non_positive_lengths() {
        assert!(matches!(
            Cuboid::new(Vector3::new(1.0, 0.0, 1.0)),
            Err(CellError::NonPositiveDimension { .. })
        ));
    }

    #[test]
    fn isotropic_rescaling_preserves_aspect_ratio() {
        let mut cell = PeriodicBox::new(Vector3::new(2.0, 3.0, 4.0), [true, true, true]).unwrap();
        cell.set_volume(3.0).unwrap();
        assert!((cell.volume() - 3.0).abs() < 1e-12);
        let l = cell.lengths();
        assert!((l.y / l.x - 1.5).abs() < 1e-12);
        assert!((l.z / l.x - 2.0).abs() < 1e-12);

        assert!(matches!(
            cell.set_volume(0.0),
            Err(CellError::NonPositiveVolume { .. })
        ));
        assert!(matches!(
            cell.set_volume(-1.0),
            Err(CellError::NonPositiveVolume { .. })
        ));
    }

    #[test]
    fn wrap_matches_the_reference_cuboid_case() {
        let cell = PeriodicBox::new(Vector3::new(2.0, 3.0, 4.0), [true, true, true]).unwrap();
        let mut p = Point::new(1.1, 1.5, -2.001);
        cell.wrap(&mut p);
        assert!((p.x + 0.9).abs() < 1e-9);
        assert!((p.y - 1.5).abs() < 1e-9);
        assert!((p.z - 1.999).abs() < 1e-9);
    }

    #[test]
    fn min_image_components_never_exceed_half_lengths() {
        let cell = PeriodicBox::new(Vector3::new(2.0, 3.0, 4.0), [true, true, true]).unwrap();
        let mut rng = Random::from_seed(21);
        for _ in 0..1000 {
            let mut a = Point::new(
                4.0 * (rng.uniform() - 0.5),
                6.0 * (rng.uniform() - 0.5),
                8.0 * (rng.uniform() - 0.5),
            );
            let mut b = Point::new(
                4.0 * (rng.uniform() - 0.5),
                6.0 * (rng.uniform() - 0.5),
                8.0 * (rng.uniform() - 0.5),
            );
            cell.wrap(&mut a);
            cell.wrap(&mut b);
            let r = cell.min_image(&a, &b);
            assert!(r.x.abs() <= 1.0 + 1e-12);
            assert!(r.y.abs() <= 1.5 + 1e-12);
            assert!(r.z.abs() <= 2.0 + 1e-12);
        }
    }

    #[test]
    fn disabled_axes_are_left_alone() {
        let cell = PeriodicBox::slit(Vector3::new(2.0, 2.0, 10.0)).unwrap();
        let mut p = Point::new(1.4, -1.6, 4.9);
        cell.wrap(&mut p);
        assert!((p.x + 0.6).abs() < 1e-12);
        assert!((p.y - 0.4).abs() < 1e-12);
        assert_eq!(p.z, 4.9);

        let r = cell.min_image(&Point::new(0.0, 0.0, 4.0), &Point::new(0.0, 0.0, -4.0));
        assert_eq!(r.z, 8.0);
    }

    #[test]
    fn collision_checks_only_confining_walls() {
        let cell = PeriodicBox::slit(Vector3::new(2.0, 2.0, 10.0)).unwrap();
        assert!(!cell.collision(&Point::new(0.9, 0.9, 0.0), 0.5));
        assert!(cell.collision(&Point::new(0.0, 0.0, 4.8), 0.5));
        assert!(!cell.collision(&Point::new(0.0, 0.0, 4.4), 0.5));
    }
}
