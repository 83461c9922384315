use serde::{Deserialize, Serialize};

/// What a trial move touched inside one group.
///
/// Offsets are relative to the group's window begin, the same addressing
/// used by [`ElasticRange`](super::elastic::ElasticRange). When `all` is
/// set, every currently-active offset counts as touched and the explicit
/// `atoms` list is ignored; there are no merge semantics between the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupChange {
    /// Index of the touched group in the owning space's group vector.
    pub group: usize,
    /// Every active particle of the group changed; shorthand for moves
    /// whose exact footprint is expensive to track, e.g. whole-group
    /// rotation.
    pub all: bool,
    /// Touched particle offsets; ignored when `all` is set.
    pub atoms: Vec<usize>,
    /// Offset ranges activated by the move, as `(first, last)` pairs.
    pub activated: Vec<(usize, usize)>,
    /// Offset ranges deactivated by the move, as `(first, last)` pairs.
    pub deactivated: Vec<(usize, usize)>,
}

impl GroupChange {
    /// Entry marking every active particle of `group` as touched.
    pub fn whole(group: usize) -> Self {
        Self {
            group,
            all: true,
            ..Self::default()
        }
    }

    /// Entry marking specific offsets of `group` as touched.
    pub fn offsets(group: usize, atoms: Vec<usize>) -> Self {
        Self {
            group,
            atoms,
            ..Self::default()
        }
    }
}

/// Minimal diff describing what a trial move mutated.
///
/// A move populates this as it works; on acceptance the engine hands it to
/// [`Space::sync`](super::space::Space::sync), which copies back exactly the
/// recorded elements. The volume delta is caller-owned metadata: the
/// synchronization routine neither applies nor validates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Volume change of the trial state relative to the accepted state.
    pub volume_delta: f64,
    /// Touched groups, applied in recorded order.
    pub groups: Vec<GroupChange>,
}

impl Change {
    /// A change with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no group is recorded and the volume is unchanged.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.volume_delta == 0.0
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.volume_delta = 0.0;
        self.groups.clear();
    }

    /// Indices of the touched groups, in recorded order.
    pub fn touched(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().map(|g| g.group)
    }
}
