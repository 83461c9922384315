use super::StateError;
use super::change::Change;
use super::group::Group;
use super::particle::Particle;
use crate::core::cell::Cell;
use crate::core::utils::geometry;

/// The aggregate simulation state: the shared particle buffer, the groups
/// partitioning it, and the active cell geometry.
///
/// A space is created once per simulation run (or once per trial copy),
/// mutated by moves, and either kept or discarded. Groups hold index
/// windows, never pointers, so buffer growth in
/// [`push_molecule`](Self::push_molecule) cannot invalidate them; the
/// contiguity of the windows is still checked on every append.
#[derive(Debug, Clone, PartialEq)]
pub struct Space {
    /// Shared particle buffer, partitioned by `groups`.
    pub particles: Vec<Particle>,
    /// Molecule groups in creation order; a group's index is its identity.
    pub groups: Vec<Group>,
    /// Active cell geometry.
    pub cell: Cell,
}

impl Space {
    /// Creates an empty space in the given cell.
    pub fn new(cell: Cell) -> Self {
        Self {
            particles: Vec::new(),
            groups: Vec::new(),
            cell,
        }
    }

    /// Appends a molecule's particles and a fully active group over them;
    /// returns the new group's index.
    ///
    /// The group's mass center is initialized to the geometric center of
    /// the appended coordinates; use
    /// [`Group::update_mass_center`] for a weighted center.
    pub fn push_molecule(
        &mut self,
        molecule: usize,
        atomic: bool,
        particles: Vec<Particle>,
    ) -> usize {
        let begin = self.particles.len();
        debug_assert_eq!(
            begin,
            self.groups.last().map_or(0, |g| g.range().cap_end()),
            "group windows must stay contiguous"
        );
        self.particles.extend(particles);
        let end = self.particles.len();

        let mut group = Group::new(molecule, atomic, begin, end);
        if let Some(center) = geometry::geometric_center(&self.particles[begin..end]) {
            group.mass_center = center;
        }
        self.groups.push(group);
        self.groups.len() - 1
    }

    /// All groups of one molecule kind, in creation order. O(groups).
    pub fn find_molecules(&self, molecule: usize) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(move |g| g.molecule == molecule)
    }

    /// All *active* particles of one atom kind, across all groups.
    pub fn find_atoms(&self, kind: usize) -> impl Iterator<Item = &Particle> {
        self.groups
            .iter()
            .flat_map(move |g| g.find_kind(&self.particles, kind))
    }

    /// Read-only iteration over every active particle, in group order.
    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.groups
            .iter()
            .flat_map(|g| g.active(&self.particles).iter())
    }

    /// Total number of active particles.
    pub fn active_len(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }

    /// Copies the state recorded in `change` from a trial space into this
    /// (accepted) space.
    ///
    /// For every recorded group entry the elastic partition and scalar
    /// fields are copied unconditionally, then either every active particle
    /// (`all`) or exactly the listed offsets. Groups absent from the change
    /// are never touched, which keeps the cost proportional to the change,
    /// not the system. The two spaces must share group topology (same
    /// windows at the same indices); the recorded `volume_delta` is left to
    /// the caller.
    pub fn sync(&mut self, trial: &Space, change: &Change) -> Result<(), StateError> {
        for entry in &change.groups {
            let count = self.groups.len();
            let source = trial
                .groups
                .get(entry.group)
                .ok_or(StateError::GroupOutOfRange {
                    group: entry.group,
                    count,
                })?;
            let destination =
                self.groups
                    .get_mut(entry.group)
                    .ok_or(StateError::GroupOutOfRange {
                        group: entry.group,
                        count,
                    })?;

            destination.assign_from(source)?;
            let begin = destination.begin();
            let size = destination.len();

            if entry.all {
                let span = destination.range().active_span();
                self.particles[span.clone()].copy_from_slice(&trial.particles[span]);
            } else {
                for &offset in &entry.atoms {
                    if offset >= size {
                        return Err(StateError::OffsetOutOfRange {
                            offset,
                            group: entry.group,
                            size,
                        });
                    }
                    self.particles[begin + offset] = trial.particles[begin + offset];
                }
            }
        }
        tracing::trace!(groups = change.groups.len(), "state synchronized");
        Ok(())
    }
}
