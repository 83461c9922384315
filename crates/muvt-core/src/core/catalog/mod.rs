//! # Type Catalogs
//!
//! Append-only registries of atom and molecule kinds. Both are built once at
//! startup (programmatically or from a TOML file), treated as immutable
//! read-only configuration afterwards, and injected by reference into every
//! component that needs type constants. Entries are never removed and
//! `id == index`, so an id stays valid for the process lifetime.

pub mod atom;
pub mod molecule;

pub use atom::{AtomCatalog, AtomKind};
pub use molecule::{MoleculeCatalog, MoleculeKind};

use thiserror::Error;

/// Errors raised while loading or extending a catalog.
///
/// All of these are configuration errors: a run must not proceed with a
/// partially loaded catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("file I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// The catalog file is not valid TOML for the expected schema.
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    /// Two entries share a name; lookups by name would be ambiguous.
    #[error("duplicate catalog entry '{name}'")]
    DuplicateName { name: String },
    /// A molecule references an atom kind the atom catalog does not hold.
    #[error("molecule '{molecule}' references unknown atom kind '{atom}'")]
    UnknownAtom { molecule: String, atom: String },
    /// Stored conformation weights do not line up with the conformations.
    #[error(
        "molecule '{molecule}' has {conformations} conformations but {weights} weights"
    )]
    WeightCountMismatch {
        molecule: String,
        conformations: usize,
        weights: usize,
    },
    /// A conformation weight set cannot form a sampling distribution.
    #[error("invalid conformation weights for molecule '{molecule}': {source}")]
    InvalidWeights {
        molecule: String,
        source: rand::distributions::WeightedError,
    },
}
