use crate::core::Point;
use crate::core::catalog::molecule::MoleculeKind;
use crate::core::cell::Cell;
use crate::core::models::particle::Particle;
use crate::core::utils::geometry;
use crate::core::utils::random::Random;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a trial insertion could not be performed.
///
/// These are recoverable resource-exhaustion conditions: the move that
/// asked for the insertion should abstain from (or reject) this trial
/// rather than abort the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InsertionError {
    /// Every placement attempt collided with the container.
    #[error("insertion failed after {trials} trials")]
    TrialsExhausted { trials: usize },
    /// The molecule kind has no stored conformations to draw from.
    #[error("no conformations stored for molecule '{molecule}'")]
    NoConformations { molecule: String },
    /// A keep-position insertion does not fit in the simulation cell.
    #[error("molecule '{molecule}' does not fit in the simulation cell at its stored position")]
    DoesNotFit { molecule: String },
}

/// Produces trial coordinates for one molecule of a given kind.
///
/// Inserters never mutate a [`Space`](crate::core::models::space::Space);
/// they only return a proposed particle set, leaving activation and
/// bookkeeping to the calling move. `existing` is the current particle
/// buffer, available for implementations that reject overlaps with other
/// particles.
pub trait Inserter {
    fn insert(
        &self,
        cell: &Cell,
        existing: &[Particle],
        molecule: &MoleculeKind,
        rng: &mut Random,
    ) -> Result<Vec<Particle>, InsertionError>;
}

/// Random position and orientation, the default for rigid bodies.
///
/// Draws a weighted conformation from the molecule kind, gives it a random
/// placement obeying the configured axes and offset, and rejects container
/// collisions up to a bounded number of trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomInserter {
    /// Per-axis scaling of the random position; overrides the kind's
    /// `insertion_axes` when set away from (1, 1, 1) by configuration.
    pub axes: Vector3<f64>,
    /// Offset added to the random position.
    pub offset: Vector3<f64>,
    /// Randomly orient the molecule (also requires the kind's `rotate`).
    pub rotate: bool,
    /// Keep the stored coordinates, only verifying the container fit.
    pub keep_position: bool,
    /// Reject placements colliding with the container.
    pub check_overlap: bool,
    /// Retry budget before the insertion reports failure.
    pub max_trials: usize,
}

impl Default for RandomInserter {
    fn default() -> Self {
        Self {
            axes: Vector3::new(1.0, 1.0, 1.0),
            offset: Vector3::zeros(),
            rotate: true,
            keep_position: false,
            check_overlap: true,
            max_trials: 2000,
        }
    }
}

impl RandomInserter {
    /// Inserter honoring the molecule kind's configured insertion axes and
    /// offset.
    pub fn for_kind(molecule: &MoleculeKind) -> Self {
        Self {
            axes: molecule.insertion_axes,
            offset: molecule.insertion_offset,
            rotate: molecule.rotate,
            ..Self::default()
        }
    }

    fn place_atomic(&self, cell: &Cell, v: &mut [Particle], molecule: &MoleculeKind, rng: &mut Random) {
        for p in v {
            if self.rotate && molecule.rotate {
                let q = geometry::random_rotation(rng);
                p.rotate(&q, &q.to_rotation_matrix());
            }
            let random = cell.random_position(rng);
            p.pos = Point::from(random.coords.component_mul(&self.axes) + self.offset);
            cell.wrap(&mut p.pos);
        }
    }

    fn place_molecular(
        &self,
        cell: &Cell,
        v: &mut [Particle],
        molecule: &MoleculeKind,
        rng: &mut Random,
    ) {
        let target =
            cell.random_position(rng).coords.component_mul(&self.axes) + self.offset;

        // Recenter the stored conformation on the origin before the rigid
        // transform.
        if let Some(center) = geometry::geometric_center(v) {
            for p in v.iter_mut() {
                p.pos -= center.coords;
            }
        }

        let q = geometry::random_rotation(rng);
        let rotation = q.to_rotation_matrix();
        for p in v {
            if self.rotate && molecule.rotate {
                p.rotate(&q, &rotation);
                p.pos = Point::from(q * p.pos.coords);
            }
            p.pos += target;
            cell.wrap(&mut p.pos);
        }
    }
}

impl Inserter for RandomInserter {
    fn insert(
        &self,
        cell: &Cell,
        _existing: &[Particle],
        molecule: &MoleculeKind,
        rng: &mut Random,
    ) -> Result<Vec<Particle>, InsertionError> {
        for _ in 0..self.max_trials {
            let mut v: Vec<Particle> = molecule
                .random_conformation(rng)
                .ok_or_else(|| InsertionError::NoConformations {
                    molecule: molecule.name.clone(),
                })?
                .to_vec();

            if molecule.atomic {
                self.place_atomic(cell, &mut v, molecule, rng);
            } else if self.keep_position {
                if v.iter().any(|p| cell.collision(&p.pos, 0.0)) {
                    return Err(InsertionError::DoesNotFit {
                        molecule: molecule.name.clone(),
                    });
                }
            } else {
                self.place_molecular(cell, &mut v, molecule, rng);
            }

            let overlap = self.check_overlap
                && v.iter()
                    .any(|p| cell.collision(&p.pos, p.radius.unwrap_or(0.0)));
            if !overlap {
                return Ok(v);
            }
        }
        tracing::warn!(
            molecule = %molecule.name,
            trials = self.max_trials,
            "insertion retry budget exhausted"
        );
        Err(InsertionError::TrialsExhausted {
            trials: self.max_trials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::{Cylinder, PeriodicBox, Sphere};
    use crate::core::models::particle::Dipole;

    fn salt_kind() -> MoleculeKind {
        let mut kind = MoleculeKind::new("salt");
        kind.atomic = true;
        kind.add_conformation(
            vec![
                Particle::new(0, Point::origin()),
                Particle::new(1, Point::origin()),
            ],
            1.0,
        )
        .unwrap();
        kind
    }

    fn dimer_kind() -> MoleculeKind {
        let mut kind = MoleculeKind::new("dimer");
        kind.add_conformation(
            vec![
                Particle::new(0, Point::new(-0.25, 0.0, 0.0)),
                Particle::new(0, Point::new(0.25, 0.0, 0.0)),
            ],
            1.0,
        )
        .unwrap();
        kind
    }

    #[test]
    fn no_conformations_is_a_recoverable_failure() {
        let cell = Cell::Periodic(PeriodicBox::cube(10.0).unwrap());
        let kind = MoleculeKind::new("ghost");
        let mut rng = Random::new();

        let result = RandomInserter::default().insert(&cell, &[], &kind, &mut rng);
        assert_eq!(
            result,
            Err(InsertionError::NoConformations {
                molecule: "ghost".into()
            })
        );
    }

    #[test]
    fn retry_budget_is_bounded_and_reported() {
        // A sphere far too small for the particle radius: every trial
        // collides.
        let cell = Cell::Sphere(Sphere::new(0.5).unwrap());
        let mut kind = MoleculeKind::new("fat");
        kind.atomic = true;
        let mut p = Particle::new(0, Point::origin());
        p.radius = Some(5.0);
        kind.add_conformation(vec![p], 1.0).unwrap();

        let inserter = RandomInserter {
            max_trials: 25,
            ..RandomInserter::default()
        };
        let mut rng = Random::new();
        let result = inserter.insert(&cell, &[], &kind, &mut rng);
        assert_eq!(result, Err(InsertionError::TrialsExhausted { trials: 25 }));
    }

    #[test]
    fn atomic_insertion_scatters_each_particle_inside_the_cell() {
        let cell = Cell::Cylinder(Cylinder::new(2.0, 6.0).unwrap());
        let kind = salt_kind();
        let inserter = RandomInserter::default();
        let mut rng = Random::new();

        for _ in 0..50 {
            let v = inserter.insert(&cell, &[], &kind, &mut rng).unwrap();
            assert_eq!(v.len(), 2);
            for p in &v {
                assert!(!cell.collision(&p.pos, 0.0));
            }
        }
    }

    #[test]
    fn axes_and_offset_constrain_atomic_placement() {
        let cell = Cell::Periodic(PeriodicBox::cube(10.0).unwrap());
        let kind = salt_kind();
        let inserter = RandomInserter {
            axes: Vector3::new(0.0, 0.0, 1.0),
            offset: Vector3::new(1.5, -0.5, 0.0),
            ..RandomInserter::default()
        };
        let mut rng = Random::new();

        for _ in 0..20 {
            let v = inserter.insert(&cell, &[], &kind, &mut rng).unwrap();
            for p in &v {
                assert!((p.pos.x - 1.5).abs() < 1e-12);
                assert!((p.pos.y + 0.5).abs() < 1e-12);
                assert!(p.pos.z.abs() <= 5.0);
            }
        }
    }

    #[test]
    fn molecular_insertion_is_rigid() {
        let cell = Cell::Periodic(PeriodicBox::cube(20.0).unwrap());
        let kind = dimer_kind();
        let inserter = RandomInserter::default();
        let mut rng = Random::new();

        for _ in 0..50 {
            let v = inserter.insert(&cell, &[], &kind, &mut rng).unwrap();
            let bond = cell.min_image(&v[1].pos, &v[0].pos).norm();
            assert!((bond - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn orientable_capabilities_follow_the_molecular_rotation() {
        let cell = Cell::Periodic(PeriodicBox::cube(20.0).unwrap());
        let mut kind = MoleculeKind::new("dipolar");
        let mut p0 = Particle::new(0, Point::new(-0.25, 0.0, 0.0));
        let mut p1 = Particle::new(0, Point::new(0.25, 0.0, 0.0));
        p0.dipole = Some(Dipole {
            axis: Vector3::new(1.0, 0.0, 0.0),
            moment: 1.0,
        });
        p1.dipole = Some(Dipole {
            axis: Vector3::new(1.0, 0.0, 0.0),
            moment: 1.0,
        });
        kind.add_conformation(vec![p0, p1], 1.0).unwrap();

        let mut rng = Random::new();
        let v = RandomInserter::default()
            .insert(&cell, &[], &kind, &mut rng)
            .unwrap();

        // The bond direction and the dipoles must have rotated together.
        let bond = cell.min_image(&v[1].pos, &v[0].pos).normalize();
        let dipole = v[0].dipole.unwrap().axis;
        assert!((bond - dipole).norm() < 1e-9);
        assert!((v[0].dipole.unwrap().axis - v[1].dipole.unwrap().axis).norm() < 1e-9);
    }

    #[test]
    fn rotation_can_be_suppressed() {
        let cell = Cell::Periodic(PeriodicBox::cube(20.0).unwrap());
        let kind = dimer_kind();
        let inserter = RandomInserter {
            rotate: false,
            ..RandomInserter::default()
        };
        let mut rng = Random::new();

        let v = inserter.insert(&cell, &[], &kind, &mut rng).unwrap();
        let bond = cell.min_image(&v[1].pos, &v[0].pos);
        assert!((bond - Vector3::new(0.5, 0.0, 0.0)).norm() < 1e-12);
    }
}
