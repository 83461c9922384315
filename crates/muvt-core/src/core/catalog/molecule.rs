use super::CatalogError;
use super::atom::AtomCatalog;
use crate::core::models::particle::Particle;
use nalgebra::Vector3;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

fn yes() -> bool {
    true
}

fn unit_axes() -> Vector3<f64> {
    Vector3::new(1.0, 1.0, 1.0)
}

/// Per-type constants and stored conformations for one molecule kind.
///
/// Conformations are coordinate sets selectable by weighted random draw;
/// the discrete distribution is rebuilt whenever a conformation is added,
/// at a cost linear in the number of conformations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MoleculeKindData")]
pub struct MoleculeKind {
    /// Kind name, unique within the catalog.
    pub name: String,
    /// Catalog id; always equals the index in the owning catalog.
    #[serde(skip)]
    id: usize,
    /// True for unstructured species such as salt ions: every particle is
    /// placed independently on insertion.
    pub atomic: bool,
    /// False to suppress random orientation on insertion.
    pub rotate: bool,
    /// Chemical activity for variable-N moves.
    pub activity: f64,
    /// Per-axis scaling of the random insertion position.
    pub insertion_axes: Vector3<f64>,
    /// Offset added to the random insertion position.
    pub insertion_offset: Vector3<f64>,
    /// Atom kind ids making up one molecule of this kind.
    pub atoms: Vec<usize>,
    conformations: Vec<Vec<Particle>>,
    weights: Vec<f64>,
    #[serde(skip)]
    distribution: Option<WeightedIndex<f64>>,
}

#[derive(Deserialize)]
struct MoleculeKindData {
    name: String,
    #[serde(default)]
    atomic: bool,
    #[serde(default = "yes")]
    rotate: bool,
    #[serde(default)]
    activity: f64,
    #[serde(default = "unit_axes")]
    insertion_axes: Vector3<f64>,
    #[serde(default)]
    insertion_offset: Vector3<f64>,
    #[serde(default)]
    atoms: Vec<usize>,
    #[serde(default)]
    conformations: Vec<Vec<Particle>>,
    #[serde(default)]
    weights: Vec<f64>,
}

impl TryFrom<MoleculeKindData> for MoleculeKind {
    type Error = CatalogError;

    fn try_from(data: MoleculeKindData) -> Result<Self, Self::Error> {
        let weights = if data.weights.is_empty() {
            vec![1.0; data.conformations.len()]
        } else {
            data.weights
        };
        if weights.len() != data.conformations.len() {
            return Err(CatalogError::WeightCountMismatch {
                molecule: data.name,
                conformations: data.conformations.len(),
                weights: weights.len(),
            });
        }
        let mut kind = Self {
            name: data.name,
            id: 0,
            atomic: data.atomic,
            rotate: data.rotate,
            activity: data.activity,
            insertion_axes: data.insertion_axes,
            insertion_offset: data.insertion_offset,
            atoms: data.atoms,
            conformations: data.conformations,
            weights,
            distribution: None,
        };
        kind.rebuild_distribution()?;
        Ok(kind)
    }
}

impl MoleculeKind {
    /// Creates a kind with the given name, no atoms and no conformations.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: 0,
            atomic: false,
            rotate: true,
            activity: 0.0,
            insertion_axes: unit_axes(),
            insertion_offset: Vector3::zeros(),
            atoms: Vec::new(),
            conformations: Vec::new(),
            weights: Vec::new(),
            distribution: None,
        }
    }

    /// Catalog id of this kind.
    pub fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    /// Stored conformations.
    pub fn conformations(&self) -> &[Vec<Particle>] {
        &self.conformations
    }

    /// Number of stored conformations.
    pub fn conformation_count(&self) -> usize {
        self.conformations.len()
    }

    /// Relative selection weights, one per conformation.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Stores a conformation with the given relative weight (1 for the
    /// plain, unbiased default) and rebuilds the selection distribution.
    ///
    /// A weight set that cannot form a distribution (a negative weight, or
    /// all weights zero) is rejected and the catalog entry is left
    /// unchanged.
    pub fn add_conformation(
        &mut self,
        coordinates: Vec<Particle>,
        weight: f64,
    ) -> Result<(), CatalogError> {
        self.conformations.push(coordinates);
        self.weights.push(weight);
        if let Err(e) = self.rebuild_distribution() {
            self.conformations.pop();
            self.weights.pop();
            // Restore the previous (valid) distribution.
            self.rebuild_distribution().ok();
            return Err(e);
        }
        Ok(())
    }

    /// Draws a conformation proportionally to its weight.
    ///
    /// `None` when the kind has no stored conformations; the caller decides
    /// whether that is recoverable.
    pub fn random_conformation<R: Rng>(&self, rng: &mut R) -> Option<&[Particle]> {
        let distribution = self.distribution.as_ref()?;
        Some(self.conformations[distribution.sample(rng)].as_slice())
    }

    fn rebuild_distribution(&mut self) -> Result<(), CatalogError> {
        if self.conformations.is_empty() {
            self.distribution = None;
            return Ok(());
        }
        self.distribution = Some(WeightedIndex::new(self.weights.iter().copied()).map_err(
            |e| CatalogError::InvalidWeights {
                molecule: self.name.clone(),
                source: e,
            },
        )?);
        Ok(())
    }
}

#[derive(Deserialize)]
struct MoleculeEntry {
    name: String,
    #[serde(default)]
    atomic: bool,
    #[serde(default = "yes")]
    rotate: bool,
    #[serde(default)]
    activity: f64,
    #[serde(default = "unit_axes")]
    insertion_axes: Vector3<f64>,
    #[serde(default)]
    insertion_offset: Vector3<f64>,
    #[serde(default)]
    atoms: Vec<String>,
}

#[derive(Deserialize)]
struct MoleculeFile {
    #[serde(default)]
    molecules: Vec<MoleculeEntry>,
}

/// Append-only registry of molecule kinds.
#[derive(Debug, Clone, Default)]
pub struct MoleculeCatalog {
    kinds: Vec<MoleculeKind>,
    index: HashMap<String, usize>,
}

impl MoleculeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog from a TOML file holding a `[[molecules]]` table
    /// array, resolving atom names against the already loaded atom catalog.
    pub fn load(path: &Path, atoms: &AtomCatalog) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: MoleculeFile = toml::from_str(&content).map_err(|e| CatalogError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut catalog = Self::new();
        for entry in file.molecules {
            let mut kind = MoleculeKind::new(&entry.name);
            kind.atomic = entry.atomic;
            kind.rotate = entry.rotate;
            kind.activity = entry.activity;
            kind.insertion_axes = entry.insertion_axes;
            kind.insertion_offset = entry.insertion_offset;
            kind.atoms = entry
                .atoms
                .iter()
                .map(|name| {
                    atoms.find(name).ok_or_else(|| CatalogError::UnknownAtom {
                        molecule: entry.name.clone(),
                        atom: name.clone(),
                    })
                })
                .collect::<Result<_, _>>()?;
            catalog.push(kind)?;
        }
        tracing::debug!(
            molecules = catalog.len(),
            path = %path.display(),
            "molecule catalog loaded"
        );
        Ok(catalog)
    }

    /// Appends a kind and returns its id. Names must be unique.
    pub fn push(&mut self, mut kind: MoleculeKind) -> Result<usize, CatalogError> {
        if self.index.contains_key(&kind.name) {
            return Err(CatalogError::DuplicateName { name: kind.name });
        }
        let id = self.kinds.len();
        kind.set_id(id);
        self.index.insert(kind.name.clone(), id);
        self.kinds.push(kind);
        Ok(id)
    }

    /// Kind by id.
    pub fn get(&self, id: usize) -> Option<&MoleculeKind> {
        self.kinds.get(id)
    }

    /// Mutable kind access, for conformation loading during setup only.
    pub fn get_mut(&mut self, id: usize) -> Option<&mut MoleculeKind> {
        self.kinds.get_mut(id)
    }

    /// Id of the kind with the given name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoleculeKind> {
        self.kinds.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;
    use crate::core::catalog::atom::AtomKind;
    use crate::core::utils::random::Random;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn conformation(x: f64) -> Vec<Particle> {
        vec![Particle::new(0, Point::new(x, 0.0, 0.0))]
    }

    #[test]
    fn conformations_default_to_unit_weight() {
        let mut kind = MoleculeKind::new("polymer");
        kind.add_conformation(conformation(1.0), 1.0).unwrap();
        kind.add_conformation(conformation(2.0), 1.0).unwrap();
        assert_eq!(kind.conformation_count(), 2);
        assert_eq!(kind.weights(), &[1.0, 1.0]);

        let mut rng = Random::new();
        let mut seen = [false, false];
        for _ in 0..200 {
            let c = kind.random_conformation(&mut rng).unwrap();
            if c[0].pos.x == 1.0 {
                seen[0] = true;
            } else {
                seen[1] = true;
            }
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn zero_weight_conformations_are_never_drawn() {
        let mut kind = MoleculeKind::new("polymer");
        kind.add_conformation(conformation(2.0), 5.0).unwrap();
        kind.add_conformation(conformation(1.0), 0.0).unwrap();

        let mut rng = Random::new();
        for _ in 0..500 {
            let c = kind.random_conformation(&mut rng).unwrap();
            assert_eq!(c[0].pos.x, 2.0);
        }
    }

    #[test]
    fn invalid_weights_leave_the_kind_unchanged() {
        let mut kind = MoleculeKind::new("polymer");
        kind.add_conformation(conformation(1.0), 1.0).unwrap();
        assert!(matches!(
            kind.add_conformation(conformation(2.0), -1.0),
            Err(CatalogError::InvalidWeights { .. })
        ));
        assert_eq!(kind.conformation_count(), 1);

        let mut rng = Random::new();
        assert_eq!(
            kind.random_conformation(&mut rng).unwrap()[0].pos.x,
            1.0
        );
    }

    #[test]
    fn no_conformations_means_no_draw() {
        let kind = MoleculeKind::new("ghost");
        let mut rng = Random::new();
        assert!(kind.random_conformation(&mut rng).is_none());
    }

    #[test]
    fn serde_round_trip_restores_the_distribution() {
        let mut kind = MoleculeKind::new("polymer");
        kind.add_conformation(conformation(2.0), 3.0).unwrap();
        kind.add_conformation(conformation(1.0), 0.0).unwrap();

        let text = toml::to_string(&kind).unwrap();
        let back: MoleculeKind = toml::from_str(&text).unwrap();
        assert_eq!(back.conformation_count(), 2);
        assert_eq!(back.weights(), &[3.0, 0.0]);

        let mut rng = Random::new();
        for _ in 0..100 {
            assert_eq!(back.random_conformation(&mut rng).unwrap()[0].pos.x, 2.0);
        }
    }

    #[test]
    fn catalog_ids_match_indices_and_names_resolve() {
        let mut catalog = MoleculeCatalog::new();
        let a = catalog.push(MoleculeKind::new("water")).unwrap();
        let b = catalog.push(MoleculeKind::new("salt")).unwrap();
        assert_eq!((a, b), (0, 1));
        assert_eq!(catalog.get(b).unwrap().id(), b);
        assert_eq!(catalog.find("water"), Some(a));
        assert!(matches!(
            catalog.push(MoleculeKind::new("salt")),
            Err(CatalogError::DuplicateName { .. })
        ));
    }

    #[test]
    fn load_resolves_atom_names_against_the_atom_catalog() {
        let mut atoms = AtomCatalog::new();
        atoms.push(AtomKind::new("Na")).unwrap();
        atoms.push(AtomKind::new("Cl")).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("molecules.toml");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"
[[molecules]]
name = "salt"
atomic = true
activity = 0.2
atoms = ["Na", "Cl"]
insertion_axes = [0.5, 0.0, 0.0]
insertion_offset = [-1.1, 0.5, 10.0]

[[molecules]]
name = "solvent"
"#
        )
        .unwrap();

        let catalog = MoleculeCatalog::load(&path, &atoms).unwrap();
        assert_eq!(catalog.len(), 2);

        let salt = catalog.get(catalog.find("salt").unwrap()).unwrap();
        assert!(salt.atomic);
        assert!(salt.rotate);
        assert!((salt.activity - 0.2).abs() < 1e-12);
        assert_eq!(salt.atoms, vec![0, 1]);
        assert_eq!(salt.insertion_axes, Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(salt.insertion_offset, Vector3::new(-1.1, 0.5, 10.0));

        let solvent = catalog.get(catalog.find("solvent").unwrap()).unwrap();
        assert!(!solvent.atomic);
        assert_eq!(solvent.insertion_axes, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn load_rejects_unknown_atom_names() {
        let atoms = AtomCatalog::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("molecules.toml");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            "[[molecules]]\nname = \"salt\"\natoms = [\"Na\"]\n"
        )
        .unwrap();

        assert!(matches!(
            MoleculeCatalog::load(&path, &atoms),
            Err(CatalogError::UnknownAtom { .. })
        ));
    }
}
