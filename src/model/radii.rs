use super::error::Error;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

const DEFAULT_RADII_TOML: &str = include_str!("../../resources/covalent_radii.toml");

static DEFAULT_RADII: OnceLock<RadiusTable> = OnceLock::new();

/// Covalent radii keyed by element symbol, in Ångström.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RadiusTable {
    #[serde(default)]
    radii: HashMap<String, f64>,
}

impl RadiusTable {
    /// Parses a table in the same layout as the embedded default:
    ///
    /// ```toml
    /// [radii]
    /// C = 0.76
    /// H = 0.31
    /// ```
    pub fn from_toml(source: &str) -> Result<Self, Error> {
        toml::from_str(source).map_err(|e| Error::RadiusTable(e.to_string()))
    }

    /// The built-in single-bond radii table, parsed on first use.
    pub fn builtin() -> &'static RadiusTable {
        DEFAULT_RADII.get_or_init(|| {
            toml::from_str(DEFAULT_RADII_TOML)
                .expect("Failed to parse embedded covalent radii. This is a library bug.")
        })
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.radii.get(symbol).copied()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, radius: f64) {
        self.radii.insert(symbol.into(), radius);
    }

    /// Largest radius in the table, used to size neighbor-search cells.
    pub fn max_radius(&self) -> f64 {
        self.radii.values().copied().fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }
}
