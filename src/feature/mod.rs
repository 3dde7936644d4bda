//! The transformer framework shared by every feature generator.
//!
//! - [`input`] – Input types and normalization into [`Molecule`](crate::Molecule)s.
//! - [`parallel`] – The map/reduce [`Executor`].
//! - [`lifecycle`] – The [`Feature`] fit → transform lifecycle.
//! - [`merge`] – Strategies for combining per-item fit results.
//! - [`introspect`] – Parameters, labels, citations and JSON output.
//! - [`kind`], [`param`] – Static per-type descriptors and parameter values.
//! - [`base`] – [`BaseFeature`] and [`EncodedFeature`].

pub mod base;
pub mod error;
pub mod input;
pub mod introspect;
pub mod kind;
pub mod lifecycle;
pub mod merge;
pub mod param;
pub mod parallel;

pub use base::{BASE_FEATURE, BaseFeature, ENCODED_FEATURE, EncodedFeature};
pub use error::Error;
pub use input::{BaseConfig, CustomInput, Field, Input, InputType, RawInput};
pub use introspect::{Introspect, SaveTarget};
pub use kind::{DEFAULT_CITATION, FeatureKind};
pub use lifecycle::Feature;
pub use merge::{KeepLast, MergeStrategy, SetUnion, Unionable};
pub use param::{Param, ParamKind, ParamSpec};
pub use parallel::Executor;
