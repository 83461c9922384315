use super::tensor::Tensor;
use crate::core::Point;
use nalgebra::{Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Point dipole capability: unit direction plus scalar moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dipole {
    /// Dipole moment unit vector.
    pub axis: Vector3<f64>,
    /// Dipole moment scalar.
    pub moment: f64,
}

impl Default for Dipole {
    fn default() -> Self {
        Self {
            axis: Vector3::x(),
            moment: 0.0,
        }
    }
}

/// Rod-like (sphero-cylinder) anisotropy capability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rod {
    /// Rod direction unit vector.
    pub axis: Vector3<f64>,
    /// Rod length.
    pub length: f64,
}

impl Default for Rod {
    fn default() -> Self {
        Self {
            axis: Vector3::x(),
            length: 0.0,
        }
    }
}

/// A single particle: a position, a reference into the atom catalog, and an
/// optional set of chemical capabilities.
///
/// `kind` indexes the process-wide [`crate::core::catalog::AtomCatalog`],
/// which is append-only, so the index stays valid for the process lifetime.
/// Capabilities a particle does not carry stay `None` and are omitted from
/// serialized records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Atom kind id into the catalog.
    pub kind: usize,
    /// Position.
    pub pos: Point,
    /// Monopole charge in elementary charge units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<f64>,
    /// Hard radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Quadrupole moment tensor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quadrupole: Option<Tensor>,
    /// Point dipole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dipole: Option<Dipole>,
    /// Rod-like anisotropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rod: Option<Rod>,
}

impl Particle {
    /// Creates a particle of the given kind with no capabilities enabled.
    pub fn new(kind: usize, pos: Point) -> Self {
        Self {
            kind,
            pos,
            charge: None,
            radius: None,
            dipole: None,
            quadrupole: None,
            rod: None,
        }
    }

    /// Rotates every orientable capability the particle carries.
    ///
    /// The dipole and rod axes rotate by the quaternion, the quadrupole by
    /// the matching similarity transform; scalar capabilities (charge,
    /// radius, moment/length scalars) are untouched. The position is *not*
    /// rotated here: pivoting about a mass center is the owning group's job.
    ///
    /// `rotation` must be `q.to_rotation_matrix()`; it is taken as an
    /// argument so bulk loops convert the quaternion once.
    pub fn rotate(&mut self, q: &UnitQuaternion<f64>, rotation: &Rotation3<f64>) {
        if let Some(dipole) = &mut self.dipole {
            dipole.axis = q * dipole.axis;
        }
        if let Some(rod) = &mut self.rod {
            rod.axis = q * rod.axis;
        }
        if let Some(quadrupole) = &mut self.quadrupole {
            quadrupole.rotate(rotation);
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(0, Point::origin())
    }
}
