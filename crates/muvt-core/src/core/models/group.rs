use super::StateError;
use super::elastic::ElasticRange;
use super::particle::Particle;
use crate::core::Point;
use crate::core::catalog::atom::AtomCatalog;
use crate::core::cell::Cell;
use crate::core::utils::geometry;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// A molecule: a named window into the shared particle buffer.
///
/// Groups partition the buffer into disjoint, contiguous windows whose order
/// is fixed once created; a group's identity is its index in the owning
/// [`Space`](super::space::Space). Only the active/inactive partition of the
/// window ever changes, through the embedded [`ElasticRange`].
///
/// Every operation that reads or writes particles takes the owning buffer
/// as an argument; a group never stores pointers into it, so buffer
/// reallocation cannot invalidate a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Group {
    /// Molecule kind id into the molecule catalog.
    pub molecule: usize,
    /// True for unstructured species such as salt ions.
    pub atomic: bool,
    /// Cached mass center; maintained by translate/rotate, recomputed on
    /// demand after anything else moves particles.
    pub mass_center: Point,
    range: ElasticRange,
}

/// Serializable summary of a group, sufficient to rebuild its window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub molecule: usize,
    pub atomic: bool,
    pub mass_center: Point,
    pub begin: usize,
    pub size: usize,
    pub capacity: usize,
}

impl Group {
    /// Creates a fully active group over buffer indices `[begin, end)`.
    pub fn new(molecule: usize, atomic: bool, begin: usize, end: usize) -> Self {
        Self {
            molecule,
            atomic,
            mass_center: Point::origin(),
            range: ElasticRange::new(begin, end),
        }
    }

    /// The underlying elastic window.
    pub fn range(&self) -> &ElasticRange {
        &self.range
    }

    /// Number of active particles.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// True when no particle is active.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Total window size, active plus inactive.
    pub fn capacity(&self) -> usize {
        self.range.capacity()
    }

    /// First buffer index of the window.
    pub fn begin(&self) -> usize {
        self.range.begin()
    }

    /// One past the last active buffer index.
    pub fn end(&self) -> usize {
        self.range.end()
    }

    /// Active particles of this group.
    pub fn active<'a>(&self, particles: &'a [Particle]) -> &'a [Particle] {
        &particles[self.range.active_span()]
    }

    /// Mutable active particles of this group.
    pub fn active_mut<'a>(&self, particles: &'a mut [Particle]) -> &'a mut [Particle] {
        &mut particles[self.range.active_span()]
    }

    /// Deactivated particles of this group, most recently deactivated first.
    pub fn inactive<'a>(&self, particles: &'a [Particle]) -> &'a [Particle] {
        &particles[self.range.inactive_span()]
    }

    /// Deactivates the active particles at offsets `[first, last)`.
    pub fn deactivate(
        &mut self,
        particles: &mut [Particle],
        first: usize,
        last: usize,
    ) -> Result<(), StateError> {
        self.range.deactivate(first, last, particles)
    }

    /// Activates the inactive particles at offsets `[first, last)`.
    pub fn activate(
        &mut self,
        particles: &mut [Particle],
        first: usize,
        last: usize,
    ) -> Result<(), StateError> {
        self.range.activate(first, last, particles)
    }

    /// Shifts the mass center and every active particle, wrapping each.
    pub fn translate(
        &mut self,
        particles: &mut [Particle],
        displacement: &Vector3<f64>,
        cell: &Cell,
    ) {
        self.mass_center += displacement;
        cell.wrap(&mut self.mass_center);
        geometry::translate(self.active_mut(particles), displacement, cell);
    }

    /// Rotates every active particle about the cached mass center, together
    /// with its orientable capabilities, then re-wraps.
    pub fn rotate(&mut self, particles: &mut [Particle], q: &UnitQuaternion<f64>, cell: &Cell) {
        let pivot = self.mass_center;
        geometry::rotate(self.active_mut(particles), q, &pivot, cell);
    }

    /// Applies the cell boundary to the mass center and every active
    /// particle.
    pub fn wrap(&mut self, particles: &mut [Particle], cell: &Cell) {
        cell.wrap(&mut self.mass_center);
        for p in self.active_mut(particles) {
            cell.wrap(&mut p.pos);
        }
    }

    /// Removes periodicity with respect to the cached mass center.
    ///
    /// Must run before any operation that assumes unwrapped coordinates,
    /// e.g. recomputing the mass center after a large displacement.
    /// O(size).
    pub fn unwrap(&mut self, particles: &mut [Particle], cell: &Cell) {
        let center = self.mass_center;
        for p in self.active_mut(particles) {
            p.pos = center + cell.min_image(&p.pos, &center);
        }
    }

    /// Recomputes the cached mass center from the active particles.
    ///
    /// Coordinates must be unwrapped. An empty group keeps its cached
    /// value.
    pub fn update_mass_center(&mut self, particles: &[Particle], catalog: &AtomCatalog) {
        if let Some(center) = geometry::mass_center(self.active(particles), catalog) {
            self.mass_center = center;
        }
    }

    /// Lazy view of the active particles of one atom kind.
    pub fn find_kind<'a>(
        &self,
        particles: &'a [Particle],
        kind: usize,
    ) -> impl Iterator<Item = &'a Particle> {
        self.active(particles).iter().filter(move |p| p.kind == kind)
    }

    /// View of specific active offsets; cost linear in the number of
    /// offsets, not the group size. Offsets must be < `len()`.
    pub fn select<'a>(
        &self,
        particles: &'a [Particle],
        offsets: &'a [usize],
    ) -> impl Iterator<Item = &'a Particle> {
        let begin = self.begin();
        offsets.iter().map(move |&i| &particles[begin + i])
    }

    /// Copies the active/inactive partition and scalar fields from another
    /// group of equal capacity.
    ///
    /// Particle contents are *not* copied; that is the synchronization
    /// routine's job, and only for the offsets a change records.
    pub fn assign_from(&mut self, other: &Group) -> Result<(), StateError> {
        if self.capacity() != other.capacity() {
            return Err(StateError::CapacityMismatch {
                destination: self.capacity(),
                src: other.capacity(),
            });
        }
        self.range.resize(other.len())?;
        self.molecule = other.molecule;
        self.atomic = other.atomic;
        self.mass_center = other.mass_center;
        Ok(())
    }

    /// Serializable summary of this group.
    pub fn record(&self) -> GroupRecord {
        GroupRecord {
            molecule: self.molecule,
            atomic: self.atomic,
            mass_center: self.mass_center,
            begin: self.begin(),
            size: self.len(),
            capacity: self.capacity(),
        }
    }

    /// Rebuilds a group from a summary record.
    pub fn from_record(record: &GroupRecord) -> Result<Self, StateError> {
        let mut group = Self::new(
            record.molecule,
            record.atomic,
            record.begin,
            record.begin + record.capacity,
        );
        group.range.resize(record.size)?;
        group.mass_center = record.mass_center;
        Ok(group)
    }
}
