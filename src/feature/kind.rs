use super::param::ParamSpec;

/// Citation returned when no kind in a parent chain declares references.
pub const DEFAULT_CITATION: &str =
    "featforge: shared infrastructure for molecular feature-extraction transformers";

/// Static descriptor of a transformer type.
///
/// Declared once per type as a `static` and returned from
/// [`Introspect::kind`](super::Introspect::kind).
#[derive(Debug)]
pub struct FeatureKind {
    pub name: &'static str,
    /// Module path of the defining type, usually `module_path!()`.
    pub module: &'static str,
    pub parent: Option<&'static FeatureKind>,
    /// Declared parameters in declaration order, excluding `input_type` and `n_jobs`.
    pub params: &'static [ParamSpec],
    /// Attribute slots populated by `fit`.
    pub attributes: &'static [&'static str],
    pub references: &'static [&'static str],
}

impl FeatureKind {
    /// `module::Name`, used as the `transformer` entry of the JSON form.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }

    pub fn param_spec(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(&name)
    }

    /// References of the nearest kind in the parent chain that declares any,
    /// one per line.
    pub fn citation(&self) -> String {
        let mut kind = Some(self);
        while let Some(k) = kind {
            if !k.references.is_empty() {
                return k.references.join("\n");
            }
            kind = k.parent;
        }
        DEFAULT_CITATION.to_string()
    }
}
