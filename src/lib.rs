//! Shared infrastructure for molecular feature-extraction transformers.
//!
//! Concrete feature generators (Coulomb matrices, bond histograms, connectivity
//! counts and the like) turn molecules into fixed-length numeric vectors. This
//! crate provides everything they have in common so that each generator only
//! writes its per-molecule fit and transform logic.
//!
//! # Features
//!
//! - **Input normalization** – Element/coordinate lists, `.xyz` and `.mol2`
//!   files, named field arrays, or a custom conversion function, all turned
//!   into one canonical [`Molecule`]
//! - **Bond perception** – Covalent-radius connectivity on a spatial grid when
//!   no explicit bonds are given
//! - **Parallel execution** – Contiguous-shard map/reduce on a local rayon pool
//! - **Lifecycle** – `fit` / `transform` / `fit_transform` with pluggable merge
//!   strategies and fitted-state validation
//! - **Introspection** – Parameter get/set, slugs, labels, citations and a
//!   stable JSON document form
//! - **Gaussian encoding** – Smearing of weighted continuous samples over a
//!   fixed grid for histogram-style features
//!
//! # Quick Start
//!
//! ```
//! use featforge::feature::{BaseConfig, BaseFeature, EncodedFeature, Introspect, RawInput};
//! use featforge::encode::{GaussianEncoder, Sample};
//!
//! // Normalize an element/coordinate list into a molecule with perceived bonds.
//! let base = BaseFeature::new(BaseConfig::new().with_n_jobs(2));
//! let water = RawInput::geometry(
//!     &["O", "H", "H"],
//!     &[[0.0, 0.0, 0.0], [0.757, 0.586, 0.0], [-0.757, 0.586, 0.0]],
//! );
//! let input = base.convert_input(&water)?;
//! let molecule = input.molecule()?;
//! assert_eq!(molecule.formula(), "H2O");
//! assert_eq!(molecule.bond_count(), 2);
//!
//! // Map and reduce run on two workers and keep input order.
//! let squares = base.map(&[1, 2, 3], |x| Ok(x * x))?;
//! assert_eq!(squares, vec![1, 4, 9]);
//!
//! // Encode a single distance on a five-point grid.
//! let encoded = EncodedFeature::new(BaseConfig::new(), GaussianEncoder::new().with_segments(5));
//! let values = encoded.encode_values(&[Sample::new(0, 3.0, 1.0)], 1)?;
//! assert!((values[2] - 5.399097e-2).abs() < 1e-7);
//! assert_eq!(encoded.slugify(), "EncodedFeature__segments=5__slope=20__start=0.2__end=6__smoothing=norm__spacing=linear");
//! # Ok::<(), featforge::FeatureError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`feature`] – Transformer framework: inputs, executor, lifecycle, introspection
//! - [`encode`] – Gaussian bin encoder
//! - [`io`] – XYZ and MOL2 readers
//!
//! # Data Types
//!
//! - [`Molecule`] – Immutable elements, coordinates, atomic numbers and connections
//! - [`MoleculeBuilder`] – Assembles a molecule from any subset of its fields
//! - [`Connections`] – Atom index → neighbor index → bond label
//! - [`RadiusTable`] – Covalent radii used by [`perceive_connections_with`]

mod model;

pub mod encode;
pub mod feature;
pub mod io;

pub use model::bonding::{
    DEFAULT_BOND_LABEL, DEFAULT_TOLERANCE, perceive_connections, perceive_connections_with,
};
pub use model::molecule::{Connections, Molecule, MoleculeBuilder};
pub use model::radii::RadiusTable;
pub use model::types::{atomic_number, element_symbol, normalize_symbol};

pub use model::Error as ModelError;
pub use encode::Error as EncodeError;
pub use feature::Error as FeatureError;
pub use io::Error as IoError;
