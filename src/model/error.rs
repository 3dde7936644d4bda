use thiserror::Error;

/// Errors raised while assembling or validating a [`Molecule`](super::molecule::Molecule).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{field} has {found} entries but the molecule has {expected} atoms")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("connection {i} -> {j} references an atom outside 0..{atom_count}")]
    ConnectionOutOfRange { i: usize, j: usize, atom_count: usize },

    #[error("connection entry for atom {i} is outside 0..{atom_count}")]
    ConnectionKeyOutOfRange { i: usize, atom_count: usize },

    #[error("connection {i} -> {j} has no reverse entry {j} -> {i}")]
    AsymmetricConnection { i: usize, j: usize },

    #[error("atom {atom} has non-finite coordinates {coords:?}")]
    NonFiniteCoordinate { atom: usize, coords: [f64; 3] },

    #[error("atom {atom} is '{element}' but has atomic number {number}")]
    ElementNumberMismatch {
        atom: usize,
        element: String,
        number: u32,
    },

    #[error("unknown atomic number: {0}")]
    UnknownAtomicNumber(u32),

    #[error("a molecule needs either element symbols or atomic numbers")]
    MissingElements,

    #[error("failed to parse covalent radius table: {0}")]
    RadiusTable(String),
}
