use nalgebra::{Matrix3, Rotation3};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Symmetric 3×3 real tensor, e.g. a quadrupole moment.
///
/// Only six coefficients are independent; the tensor serializes to the flat
/// array `[xx, xy, xz, yy, yz, zz]` and deserialization fails on any other
/// length. Internally the full matrix is kept so rotation is a plain
/// similarity transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tensor(Matrix3<f64>);

impl Tensor {
    /// Builds the tensor from its six independent coefficients.
    pub fn new(xx: f64, xy: f64, xz: f64, yy: f64, yz: f64, zz: f64) -> Self {
        Self(Matrix3::new(xx, xy, xz, xy, yy, yz, xz, yz, zz))
    }

    /// The six independent coefficients in `[xx, xy, xz, yy, yz, zz]` order.
    pub fn coefficients(&self) -> [f64; 6] {
        let m = &self.0;
        [
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 1)],
            m[(1, 2)],
            m[(2, 2)],
        ]
    }

    /// Applies the similarity rotation `T' = R T Rᵀ`.
    pub fn rotate(&mut self, rotation: &Rotation3<f64>) {
        let m = rotation.matrix();
        self.0 = m * self.0 * m.transpose();
    }

    /// Read access to a single matrix element.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }

    /// The full symmetric matrix.
    pub fn as_matrix(&self) -> &Matrix3<f64> {
        &self.0
    }
}

impl From<[f64; 6]> for Tensor {
    fn from(c: [f64; 6]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4], c[5])
    }
}

impl Serialize for Tensor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.coefficients().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tensor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<f64>::deserialize(deserializer)?;
        let coefficients: [f64; 6] = raw.as_slice().try_into().map_err(|_| {
            D::Error::invalid_length(raw.len(), &"an array of exactly six tensor coefficients")
        })?;
        Ok(Self::from(coefficients))
    }
}
