//! Geometry file readers.
//!
//! Two formats are recognized by extension: XYZ (elements and coordinates,
//! connectivity perceived from geometry) and Tripos MOL2 (coordinates plus an
//! explicit bond table).

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::model::molecule::Molecule;

pub mod error;

mod mol2;
mod xyz;

pub use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xyz,
    Mol2,
}

impl Format {
    /// Infers the format from a path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xyz" => Ok(Format::Xyz),
            "mol2" => Ok(Format::Mol2),
            _ => Err(Error::UnsupportedFormat(ext)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Xyz => write!(f, "XYZ"),
            Format::Mol2 => write!(f, "MOL2"),
        }
    }
}

/// Parses one molecule from `reader` in the given format.
pub fn read<R: BufRead>(reader: R, format: Format) -> Result<Molecule, Error> {
    match format {
        Format::Xyz => xyz::read(reader),
        Format::Mol2 => mol2::read(reader),
    }
}

/// Opens `path`, infers its format and parses one molecule.
pub fn read_file(path: impl AsRef<Path>) -> Result<Molecule, Error> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let file = File::open(path)?;
    let molecule = read(BufReader::new(file), format)?;
    log::debug!(
        "read {} atoms from {} ({format})",
        molecule.atom_count(),
        path.display()
    );
    Ok(molecule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_inferred_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.xyz")).unwrap(), Format::Xyz);
        assert_eq!(Format::from_path(Path::new("B.MOL2")).unwrap(), Format::Mol2);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = Format::from_path(Path::new("methane.out")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext == "out"));

        let err = Format::from_path(Path::new("noext")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext.is_empty()));
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let err = read_file("/definitely/not/here.xyz").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
