use super::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

fn one() -> f64 {
    1.0
}

/// Per-type constants for one atom kind.
///
/// Instances live in the [`AtomCatalog`] and are addressed by id from
/// particles; everything here is read-only configuration after startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomKind {
    /// Kind name, unique within the catalog.
    pub name: String,
    /// Catalog id; always equals the index in the owning catalog.
    #[serde(skip)]
    id: usize,
    /// Default charge in elementary charge units.
    #[serde(default)]
    pub charge: f64,
    /// Hard radius.
    #[serde(default)]
    pub radius: f64,
    /// Relative weight used for mass centers.
    #[serde(default = "one")]
    pub weight: f64,
    /// Interaction strength parameter forwarded to pair potentials.
    #[serde(default)]
    pub epsilon: f64,
    /// Chemical activity for variable-N moves.
    #[serde(default)]
    pub activity: f64,
    /// Translational displacement step for trial moves.
    #[serde(default)]
    pub displacement: f64,
    /// Rotational displacement step for trial moves, in radians.
    #[serde(default)]
    pub rotation_step: f64,
}

impl AtomKind {
    /// Creates a kind with the given name and default constants.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: 0,
            charge: 0.0,
            radius: 0.0,
            weight: 1.0,
            epsilon: 0.0,
            activity: 0.0,
            displacement: 0.0,
            rotation_step: 0.0,
        }
    }

    /// Catalog id of this kind.
    pub fn id(&self) -> usize {
        self.id
    }
}

#[derive(Deserialize)]
struct AtomFile {
    #[serde(default)]
    atoms: Vec<AtomKind>,
}

/// Append-only registry of atom kinds.
#[derive(Debug, Clone, Default)]
pub struct AtomCatalog {
    kinds: Vec<AtomKind>,
    index: HashMap<String, usize>,
}

impl AtomCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog from a TOML file holding an `[[atoms]]` table array.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: AtomFile = toml::from_str(&content).map_err(|e| CatalogError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut catalog = Self::new();
        for kind in file.atoms {
            catalog.push(kind)?;
        }
        tracing::debug!(atoms = catalog.len(), path = %path.display(), "atom catalog loaded");
        Ok(catalog)
    }

    /// Appends a kind and returns its id. Names must be unique.
    pub fn push(&mut self, mut kind: AtomKind) -> Result<usize, CatalogError> {
        if self.index.contains_key(&kind.name) {
            return Err(CatalogError::DuplicateName { name: kind.name });
        }
        let id = self.kinds.len();
        kind.id = id;
        self.index.insert(kind.name.clone(), id);
        self.kinds.push(kind);
        Ok(id)
    }

    /// Kind by id.
    pub fn get(&self, id: usize) -> Option<&AtomKind> {
        self.kinds.get(id)
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

    pub fn iter(&self) -> impl Iterator<Item = &AtomKind> {
        self.kinds.iter()
    }
}
