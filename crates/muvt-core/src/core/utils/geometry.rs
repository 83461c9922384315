use crate::core::Point;
use crate::core::catalog::atom::AtomCatalog;
use crate::core::cell::Cell;
use crate::core::models::particle::Particle;
use crate::core::utils::random::Random;
use nalgebra::{UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// Converts cartesian to spherical coordinates `(r, theta, phi)` relative to
/// `origin`, with `r >= 0`, `theta` in `[-pi, pi)` and `phi` in `[0, pi]`.
///
/// The polar angle is undefined at the origin itself (`r == 0`).
pub fn to_spherical(p: &Point, origin: &Point) -> Vector3<f64> {
    let xyz = p - origin;
    let radius = xyz.norm();
    Vector3::new(radius, xyz.y.atan2(xyz.x), (xyz.z / radius).acos())
}

/// Converts spherical coordinates `(r, theta, phi)` back to a cartesian
/// point, adding `origin`.
pub fn from_spherical(rtp: &Vector3<f64>, origin: &Point) -> Point {
    let (r, theta, phi) = (rtp.x, rtp.y, rtp.z);
    origin
        + r * Vector3::new(
            theta.cos() * phi.sin(),
            theta.sin() * phi.sin(),
            phi.cos(),
        )
}

/// Random unit vector by polar sphere picking.
pub fn random_unit_vector(rng: &mut Random) -> Vector3<f64> {
    let rtp = Vector3::new(1.0, 2.0 * PI * rng.uniform(), (2.0 * rng.uniform() - 1.0).acos());
    from_spherical(&rtp, &Point::origin()).coords
}

/// Random unit vector by Neumann rejection sampling in the unit cube.
pub fn random_unit_vector_neumann(rng: &mut Random) -> Vector3<f64> {
    loop {
        let p = Vector3::new(
            rng.uniform() - 0.5,
            rng.uniform() - 0.5,
            rng.uniform() - 0.5,
        );
        let r2 = p.norm_squared();
        if r2 <= 0.25 && r2 > 0.0 {
            return p / r2.sqrt();
        }
    }
}

/// Uniformly random rotation: a uniform axis with a uniform angle in
/// `[0, 2pi)`.
pub fn random_rotation(rng: &mut Random) -> UnitQuaternion<f64> {
    let axis = nalgebra::Unit::new_normalize(random_unit_vector(rng));
    UnitQuaternion::from_axis_angle(&axis, 2.0 * PI * rng.uniform())
}

/// Weight-averaged center of a set of particles, with weights looked up in
/// the atom catalog by particle kind.
///
/// Positions must already be unwrapped. Returns `None` for an empty slice;
/// falls back to the unweighted mean when the total weight vanishes.
pub fn mass_center(particles: &[Particle], catalog: &AtomCatalog) -> Option<Point> {
    if particles.is_empty() {
        return None;
    }
    let mut sum = Vector3::zeros();
    let mut total = 0.0;
    for p in particles {
        let w = catalog.get(p.kind).map_or(1.0, |kind| kind.weight);
        sum += w * p.pos.coords;
        total += w;
    }
    if total <= f64::EPSILON {
        let mean = particles.iter().map(|p| p.pos.coords).sum::<Vector3<f64>>()
            / particles.len() as f64;
        return Some(Point::from(mean));
    }
    Some(Point::from(sum / total))
}

/// Unweighted geometric center of a set of particles.
pub fn geometric_center(particles: &[Particle]) -> Option<Point> {
    if particles.is_empty() {
        return None;
    }
    let mean =
        particles.iter().map(|p| p.pos.coords).sum::<Vector3<f64>>() / particles.len() as f64;
    Some(Point::from(mean))
}

/// Displaces every particle and re-applies the cell boundary.
pub fn translate(particles: &mut [Particle], displacement: &Vector3<f64>, cell: &Cell) {
    for p in particles {
        p.pos += displacement;
        cell.wrap(&mut p.pos);
    }
}

/// Rotates every particle's position about `pivot` and its orientable
/// capabilities by the same quaternion, then re-applies the cell boundary.
pub fn rotate(particles: &mut [Particle], q: &UnitQuaternion<f64>, pivot: &Point, cell: &Cell) {
    let rotation = q.to_rotation_matrix();
    for p in particles {
        p.rotate(q, &rotation);
        p.pos = pivot + q * (p.pos - pivot);
        cell.wrap(&mut p.pos);
    }
}
