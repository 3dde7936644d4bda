//! Canonical molecular structure shared by every feature transformer.
//!
//! - [`molecule`] – The immutable [`Molecule`](molecule::Molecule) and its builder.
//! - [`types`] – Fixed symbol ↔ atomic-number table.
//! - [`radii`] – Covalent radii used for bond perception.
//! - [`bonding`] – Distance-based connection perception.

pub mod bonding;
pub mod error;
pub mod molecule;
pub mod radii;
pub mod types;

pub use error::Error;
