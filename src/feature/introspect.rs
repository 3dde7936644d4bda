//! Parameter introspection, labels, citations and JSON serialization.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use super::error::Error;
use super::input::{BaseConfig, InputType};
use super::kind::FeatureKind;
use super::param::Param;

const N_JOBS: &str = "n_jobs";
const INPUT_TYPE: &str = "input_type";

/// Where [`Introspect::save_json`] writes its document.
pub enum SaveTarget<'a> {
    Stream(&'a mut dyn Write),
    /// Created (or truncated), written, flushed and closed within the call.
    Path(PathBuf),
}

/// Uniform view over a transformer's configuration and fitted state.
///
/// Implementors supply their static [`FeatureKind`], the shared
/// [`BaseConfig`], and accessors for their declared parameters and
/// attributes. Everything else is provided.
pub trait Introspect: Send + Sync {
    fn kind(&self) -> &'static FeatureKind;

    fn base(&self) -> &BaseConfig;

    fn base_mut(&mut self) -> &mut BaseConfig;

    /// Current value of a declared parameter. Only called with names from
    /// [`FeatureKind::params`].
    fn param(&self, name: &str) -> Option<Param> {
        let _ = name;
        None
    }

    /// Stores an already type-checked value for a declared parameter.
    fn set_param(&mut self, name: &str, value: Param) -> Result<(), Error> {
        let _ = value;
        Err(Error::UnknownParam(name.to_string()))
    }

    /// JSON value of a declared attribute, `None` while unset.
    fn attribute(&self, name: &str) -> Result<Option<Value>, Error> {
        let _ = name;
        Ok(None)
    }

    /// Groups of output labels; flattened by [`get_labels`](Self::get_labels).
    fn label_groups(&self) -> Vec<Vec<String>> {
        Vec::new()
    }

    fn get_param(&self, name: &str) -> Result<Param, Error> {
        match name {
            N_JOBS => Ok(Param::Int(self.base().n_jobs)),
            INPUT_TYPE => Ok(Param::Input(self.base().input_type.clone())),
            _ if self.kind().param_spec(name).is_some() => Ok(self.param(name).unwrap_or_default()),
            _ => Err(Error::UnknownParam(name.to_string())),
        }
    }

    /// `n_jobs`, `input_type` and every declared parameter.
    fn get_params(&self) -> BTreeMap<String, Param> {
        let mut params = BTreeMap::new();
        params.insert(N_JOBS.to_string(), Param::Int(self.base().n_jobs));
        params.insert(
            INPUT_TYPE.to_string(),
            Param::Input(self.base().input_type.clone()),
        );
        for spec in self.kind().params {
            params.insert(spec.name.to_string(), self.param(spec.name).unwrap_or_default());
        }
        params
    }

    /// Overwrites existing parameters; unknown names are ignored.
    ///
    /// Every value is checked before any is applied, so a rejected value
    /// leaves the instance unchanged.
    fn set_params<I, K>(&mut self, pairs: I) -> Result<(), Error>
    where
        Self: Sized,
        I: IntoIterator<Item = (K, Param)>,
        K: AsRef<str>,
    {
        let mut checked = Vec::new();
        for (name, value) in pairs {
            let name = name.as_ref();
            if let Some(value) = check_param(self.kind(), name, value)? {
                checked.push((name.to_string(), value));
            }
        }
        for (name, value) in checked {
            apply_param(self, &name, value)?;
        }
        Ok(())
    }

    /// Single-parameter form of [`set_params`](Self::set_params), usable
    /// through `dyn Introspect`.
    fn update_param(&mut self, name: &str, value: Param) -> Result<(), Error> {
        match check_param(self.kind(), name, value)? {
            Some(value) => apply_param(self, name, value),
            None => Ok(()),
        }
    }

    /// `Name__a=v__b=w` over the declared parameters in declaration order.
    fn slugify(&self) -> String {
        let mut slug = self.kind().name.to_string();
        for spec in self.kind().params {
            let value = self.param(spec.name).unwrap_or_default();
            slug.push_str(&format!("__{}={}", spec.name, value));
        }
        slug
    }

    /// Sorted, de-duplicated union of every label group.
    fn get_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.label_groups().into_iter().flatten().collect();
        labels.sort();
        labels.dedup();
        labels
    }

    fn citation(&self) -> String {
        self.kind().citation()
    }

    fn get_attribute(&self, name: &str) -> Result<Option<Value>, Error> {
        if !self.kind().has_attribute(name) {
            return Err(Error::UnknownAttribute(name.to_string()));
        }
        self.attribute(name)
    }

    /// Fails with [`Error::NotFitted`] naming the first unset attribute.
    fn check_fit(&self) -> Result<(), Error> {
        for name in self.kind().attributes {
            match self.attribute(name)? {
                Some(Value::Null) | None => {
                    return Err(Error::NotFitted {
                        attribute: name.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// `{"parameters": ..., "attributes": ..., "transformer": "module::Name"}`.
    fn to_json(&self) -> Result<Value, Error> {
        let kind = self.kind();

        let mut parameters = Map::new();
        for (name, value) in self.get_params() {
            parameters.insert(name, value.to_json()?);
        }

        let mut attributes = Map::new();
        for name in kind.attributes {
            let value = self.attribute(name)?.unwrap_or(Value::Null);
            attributes.insert(name.to_string(), value);
        }

        let mut doc = Map::new();
        doc.insert("parameters".into(), Value::Object(parameters));
        doc.insert("attributes".into(), Value::Object(attributes));
        doc.insert("transformer".into(), Value::from(kind.qualified_name()));
        Ok(Value::Object(doc))
    }

    fn save_json(&self, target: SaveTarget<'_>) -> Result<(), Error> {
        let doc = serde_json::to_string(&self.to_json()?)?;
        match target {
            SaveTarget::Stream(stream) => stream
                .write_all(doc.as_bytes())
                .and_then(|_| stream.flush())
                .map_err(|source| Error::Write {
                    target: "stream".to_string(),
                    source,
                }),
            SaveTarget::Path(path) => {
                let write = || -> std::io::Result<()> {
                    let mut file = File::create(&path)?;
                    file.write_all(doc.as_bytes())?;
                    file.flush()
                };
                write().map_err(|source| Error::Write {
                    target: path.display().to_string(),
                    source,
                })?;
                log::debug!("saved {} to {}", self.kind().name, path.display());
                Ok(())
            }
        }
    }
}

/// Type-checks one parameter; `Ok(None)` for names the kind does not know.
fn check_param(kind: &FeatureKind, name: &str, value: Param) -> Result<Option<Param>, Error> {
    match name {
        N_JOBS => match value {
            Param::Int(n) if n != 0 => Ok(Some(Param::Int(n))),
            other => Err(Error::invalid_param(
                N_JOBS,
                format!("expected a non-zero integer, found {other}"),
            )),
        },
        INPUT_TYPE => input_type_from_param(value).map(|t| Some(Param::Input(t))),
        _ => match kind.param_spec(name) {
            Some(spec) => spec.coerce(value).map(Some),
            None => {
                log::debug!("ignoring unknown parameter '{name}' for {}", kind.name);
                Ok(None)
            }
        },
    }
}

fn apply_param<T: Introspect + ?Sized>(target: &mut T, name: &str, value: Param) -> Result<(), Error> {
    match (name, value) {
        (N_JOBS, Param::Int(n)) => {
            target.base_mut().n_jobs = n;
            Ok(())
        }
        (INPUT_TYPE, Param::Input(t)) => {
            target.base_mut().input_type = t;
            Ok(())
        }
        (name, value) => target.set_param(name, value),
    }
}

fn input_type_from_param(value: Param) -> Result<InputType, Error> {
    match value {
        Param::Input(t) => Ok(t),
        Param::Text(s) => s.parse(),
        Param::List(items) => {
            let names = items
                .iter()
                .map(|p| {
                    p.as_str()
                        .ok_or_else(|| Error::UnknownField(p.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            InputType::fields(&names)
        }
        other => Err(Error::invalid_param(
            INPUT_TYPE,
            format!("expected an input type, found {}", other.type_name()),
        )),
    }
}
