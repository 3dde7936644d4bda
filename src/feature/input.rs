//! Conversion of heterogeneous raw inputs into [`Molecule`]s.

use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::error::Error;
use super::introspect::Introspect;
use super::parallel::Executor;
use crate::io;
use crate::model::molecule::{Connections, Molecule};

/// A named geometry field, used by [`InputType::Fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Elements,
    Coords,
    Numbers,
    Connections,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Elements => "elements",
            Field::Coords => "coords",
            Field::Numbers => "numbers",
            Field::Connections => "connections",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elements" => Ok(Field::Elements),
            "coords" => Ok(Field::Coords),
            "numbers" => Ok(Field::Numbers),
            "connections" => Ok(Field::Connections),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

type ConvertFn = dyn Fn(&RawInput) -> Result<Value, Error> + Send + Sync;

/// User-supplied conversion function. Its result is passed through to the
/// transformer untouched.
#[derive(Clone)]
pub struct CustomInput {
    name: String,
    func: Arc<ConvertFn>,
}

impl CustomInput {
    /// Wraps a conversion function under a display name.
    ///
    /// # Arguments
    ///
    /// * `name` - Shown in `Display` output and error messages
    /// * `func` - Called once per raw item, possibly from several workers
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&RawInput) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the wrapped function on one raw item.
    pub fn call(&self, raw: &RawInput) -> Result<Value, Error> {
        (self.func)(raw)
    }
}

impl fmt::Debug for CustomInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomInput").field("name", &self.name).finish_non_exhaustive()
    }
}

impl PartialEq for CustomInput {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// How a transformer interprets each raw input item.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputType {
    /// Elements and coordinates, optionally with connections.
    #[default]
    List,
    /// A path to an `.xyz` or `.mol2` file.
    Filename,
    /// A positional array of named field values.
    Fields(Vec<Field>),
    /// Delegates to a user function; has no JSON form.
    Custom(CustomInput),
}

impl InputType {
    /// Builds a [`Fields`](InputType::Fields) input type from field names.
    pub fn fields<S: AsRef<str>>(names: &[S]) -> Result<Self, Error> {
        names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()
            .map(InputType::Fields)
    }

    /// Shorthand for `InputType::Custom(CustomInput::new(name, func))`.
    pub fn custom<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&RawInput) -> Result<Value, Error> + Send + Sync + 'static,
    {
        InputType::Custom(CustomInput::new(name, func))
    }

    /// JSON form: `"list"`, `"filename"` or an array of field names.
    pub fn to_json(&self) -> Result<Value, Error> {
        match self {
            InputType::List => Ok(Value::from("list")),
            InputType::Filename => Ok(Value::from("filename")),
            InputType::Fields(fields) => Ok(Value::Array(
                fields.iter().map(|f| Value::from(f.name())).collect(),
            )),
            InputType::Custom(custom) => Err(Error::Unrepresentable(format!(
                "custom input type '{}'",
                custom.name()
            ))),
        }
    }

    /// Parses the JSON form produced by [`to_json`](Self::to_json).
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        match value {
            Value::String(s) => s.parse(),
            Value::Array(items) => {
                let names = items
                    .iter()
                    .map(|v| {
                        v.as_str()
                            .ok_or_else(|| Error::UnknownField(v.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Self::fields(&names)
            }
            other => Err(Error::UnsupportedInputType(other.to_string())),
        }
    }

    /// Converts one raw item according to this input type.
    pub fn normalize(&self, raw: &RawInput) -> Result<Input, Error> {
        match (self, raw) {
            (InputType::Custom(custom), _) => custom.call(raw).map(Input::Custom),

            (
                InputType::List,
                RawInput::Geometry {
                    elements,
                    coords,
                    connections,
                },
            ) => Ok(Input::Molecule(
                Molecule::builder()
                    .elements(elements.clone())
                    .coords(coords.clone())
                    .connections_opt(connections.clone())
                    .build()?,
            )),
            (InputType::List, RawInput::Value(Value::Array(items)))
                if (2..=3).contains(&items.len()) =>
            {
                let connections = items.get(2).map(parse_connections).transpose()?;
                Ok(Input::Molecule(
                    Molecule::builder()
                        .elements(parse_elements(&items[0])?)
                        .coords(parse_coords(&items[1])?)
                        .connections_opt(connections)
                        .build()?,
                ))
            }

            (InputType::Filename, RawInput::Path(path)) => read_path(path),
            (InputType::Filename, RawInput::Value(Value::String(path))) => {
                read_path(Path::new(path))
            }

            (InputType::Fields(fields), RawInput::Fields(values))
            | (InputType::Fields(fields), RawInput::Value(Value::Array(values))) => {
                from_fields(fields, values).map(Input::Molecule)
            }

            _ => Err(Error::InputMismatch {
                input_type: self.to_string(),
                found: raw.describe(),
            }),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputType::List => f.write_str("list"),
            InputType::Filename => f.write_str("filename"),
            InputType::Fields(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.name()).collect();
                write!(f, "[{}]", names.join(", "))
            }
            InputType::Custom(custom) => write!(f, "custom:{}", custom.name()),
        }
    }
}

impl FromStr for InputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(InputType::List),
            "filename" => Ok(InputType::Filename),
            _ => Err(Error::UnsupportedInputType(s.to_string())),
        }
    }
}

/// One unnormalized input item.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Geometry {
        elements: Vec<String>,
        coords: Vec<[f64; 3]>,
        connections: Option<Connections>,
    },
    Path(PathBuf),
    Fields(Vec<Value>),
    /// Arbitrary JSON: `[elements, coords(, connections)]`, a path string,
    /// an array of field values, or anything a custom function accepts.
    Value(Value),
}

impl RawInput {
    pub fn geometry(elements: &[&str], coords: &[[f64; 3]]) -> Self {
        RawInput::Geometry {
            elements: elements.iter().map(|e| e.to_string()).collect(),
            coords: coords.to_vec(),
            connections: None,
        }
    }

    fn describe(&self) -> String {
        match self {
            RawInput::Geometry { .. } => "a geometry".to_string(),
            RawInput::Path(p) => format!("the path {}", p.display()),
            RawInput::Fields(values) => format!("{} field values", values.len()),
            RawInput::Value(value) => match value {
                Value::Null => "null".to_string(),
                Value::Bool(_) => "a boolean".to_string(),
                Value::Number(_) => "a number".to_string(),
                Value::String(_) => "a string".to_string(),
                Value::Array(items) => format!("an array of {} items", items.len()),
                Value::Object(_) => "an object".to_string(),
            },
        }
    }
}

impl From<PathBuf> for RawInput {
    fn from(path: PathBuf) -> Self {
        RawInput::Path(path)
    }
}

impl From<&Path> for RawInput {
    fn from(path: &Path) -> Self {
        RawInput::Path(path.to_path_buf())
    }
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        RawInput::Value(value)
    }
}

/// A normalized input item.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Molecule(Molecule),
    /// Result of a custom conversion function, passed through as-is.
    Custom(Value),
}

impl Input {
    pub fn as_molecule(&self) -> Option<&Molecule> {
        match self {
            Input::Molecule(m) => Some(m),
            Input::Custom(_) => None,
        }
    }

    pub fn as_custom(&self) -> Option<&Value> {
        match self {
            Input::Custom(v) => Some(v),
            Input::Molecule(_) => None,
        }
    }

    /// The molecule, or a [`Feature`](Error::Feature) error for custom inputs.
    pub fn molecule(&self) -> Result<&Molecule, Error> {
        self.as_molecule()
            .ok_or_else(|| Error::feature("expected a molecule, found a custom input value"))
    }
}

/// Execution parameters shared by every transformer.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseConfig {
    pub input_type: InputType,
    /// Worker count: `1` runs in process, negative uses every available core.
    pub n_jobs: i64,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            input_type: InputType::List,
            n_jobs: 1,
        }
    }
}

impl BaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Sets the worker count. `0` is accepted here and rejected when an
    /// [`Executor`] is built from it.
    pub fn with_n_jobs(mut self, n_jobs: i64) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] when `n_jobs` is zero.
    pub fn executor(&self) -> Result<Executor, Error> {
        Executor::new(self.n_jobs)
    }

    /// Normalizes one raw item with the configured [`InputType`].
    pub fn convert(&self, raw: &RawInput) -> Result<Input, Error> {
        self.input_type.normalize(raw)
    }

    /// Chooses the input type for a transformer that wraps `inner`.
    ///
    /// An explicit request wins but must agree with the inner transformer;
    /// otherwise the inner transformer's type is inherited, falling back to
    /// [`InputType::List`].
    pub fn resolve_input_type(
        requested: Option<InputType>,
        inner: Option<&dyn Introspect>,
    ) -> Result<InputType, Error> {
        let inherited = inner.map(|t| t.base().input_type.clone());
        match (requested, inherited) {
            (Some(requested), Some(inherited)) if requested != inherited => {
                Err(Error::InputTypeMismatch {
                    requested: requested.to_string(),
                    inner: inherited.to_string(),
                })
            }
            (Some(requested), _) => Ok(requested),
            (None, Some(inherited)) => Ok(inherited),
            (None, None) => Ok(InputType::List),
        }
    }
}

fn read_path(path: &Path) -> Result<Input, Error> {
    Ok(Input::Molecule(io::read_file(path)?))
}

fn from_fields(fields: &[Field], values: &[Value]) -> Result<Molecule, Error> {
    if fields.len() != values.len() {
        return Err(Error::FieldCount {
            expected: fields.len(),
            found: values.len(),
        });
    }

    let mut builder = Molecule::builder();
    for (field, value) in fields.iter().zip(values) {
        builder = match field {
            Field::Elements => builder.elements(parse_elements(value)?),
            Field::Coords => builder.coords(parse_coords(value)?),
            Field::Numbers => builder.numbers(parse_numbers(value)?),
            Field::Connections => builder.connections(parse_connections(value)?),
        };
    }
    Ok(builder.build()?)
}

fn as_array<'a>(field: Field, value: &'a Value) -> Result<&'a Vec<Value>, Error> {
    value
        .as_array()
        .ok_or_else(|| Error::invalid_field(field.name(), "expected an array"))
}

fn parse_elements(value: &Value) -> Result<Vec<String>, Error> {
    as_array(Field::Elements, value)?
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::invalid_field("elements", format!("{v} is not a symbol")))
        })
        .collect()
}

fn parse_coords(value: &Value) -> Result<Vec<[f64; 3]>, Error> {
    as_array(Field::Coords, value)?
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let row = row
                .as_array()
                .filter(|r| r.len() == 3)
                .ok_or_else(|| Error::invalid_field("coords", format!("row {i} is not an [x, y, z] triple")))?;
            let mut xyz = [0.0; 3];
            for (axis, v) in row.iter().enumerate() {
                xyz[axis] = v.as_f64().ok_or_else(|| {
                    Error::invalid_field("coords", format!("row {i} holds non-numeric {v}"))
                })?;
            }
            Ok(xyz)
        })
        .collect()
}

fn parse_numbers(value: &Value) -> Result<Vec<u32>, Error> {
    as_array(Field::Numbers, value)?
        .iter()
        .map(|v| {
            v.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| Error::invalid_field("numbers", format!("{v} is not an atomic number")))
        })
        .collect()
}

/// Accepts `{"0": {"1": "1"}}` with integer-like keys; labels may be strings
/// or numbers.
fn parse_connections(value: &Value) -> Result<Connections, Error> {
    let outer = value
        .as_object()
        .ok_or_else(|| Error::invalid_field("connections", "expected an object"))?;

    let index = |key: &str| {
        key.parse::<usize>().map_err(|_| {
            Error::invalid_field("connections", format!("'{key}' is not an atom index"))
        })
    };

    let mut connections = Connections::new();
    for (i, neighbors) in outer {
        let neighbors = neighbors.as_object().ok_or_else(|| {
            Error::invalid_field("connections", format!("neighbors of '{i}' must be an object"))
        })?;
        let entry = connections.entry(index(i.as_str())?).or_default();
        for (j, label) in neighbors {
            let label = match label {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(Error::invalid_field(
                        "connections",
                        format!("bond label {other} must be a string or number"),
                    ));
                }
            };
            entry.insert(index(j.as_str())?, label);
        }
    }
    Ok(connections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WATER: [[f64; 3]; 3] = [[0.0, 0.0, 0.0], [0.757, 0.586, 0.0], [-0.757, 0.586, 0.0]];

    #[test]
    fn input_type_parses_and_renders() {
        assert_eq!("list".parse::<InputType>().unwrap(), InputType::List);
        assert_eq!("filename".parse::<InputType>().unwrap(), InputType::Filename);
        assert!(matches!(
            "error".parse::<InputType>(),
            Err(Error::UnsupportedInputType(ref s)) if s == "error"
        ));

        let fields = InputType::fields(&["numbers", "elements"]).unwrap();
        assert_eq!(fields.to_string(), "[numbers, elements]");
        assert_eq!(fields.to_json().unwrap(), json!(["numbers", "elements"]));
        assert_eq!(InputType::from_json(&json!(["numbers", "elements"])).unwrap(), fields);
    }

    #[test]
    fn unknown_field_name_is_rejected() {
        assert!(matches!(
            InputType::fields(&["error"]),
            Err(Error::UnknownField(ref s)) if s == "error"
        ));
    }

    #[test]
    fn custom_input_type_is_not_representable() {
        let custom = InputType::custom("identity", |raw| match raw {
            RawInput::Value(v) => Ok(v.clone()),
            _ => Ok(Value::Null),
        });
        assert!(matches!(custom.to_json(), Err(Error::Unrepresentable(_))));
        assert_eq!(custom.to_string(), "custom:identity");
    }

    #[test]
    fn custom_function_result_passes_through() {
        let square = InputType::custom("square", |raw| match raw {
            RawInput::Value(v) => {
                let x = v.as_i64().unwrap_or_default();
                Ok(json!([x, x * x]))
            }
            _ => Err(Error::feature("expected a number")),
        });
        let out = square.normalize(&RawInput::Value(json!(10))).unwrap();
        assert_eq!(out, Input::Custom(json!([10, 100])));
    }

    #[test]
    fn list_geometry_perceives_connections() {
        let raw = RawInput::geometry(&["O", "H", "H"], &WATER);
        let input = InputType::List.normalize(&raw).unwrap();
        let mol = input.molecule().unwrap();
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.numbers().unwrap(), &[8, 1, 1]);
    }

    #[test]
    fn list_json_form_keeps_supplied_connections() {
        let raw = RawInput::Value(json!([
            ["O", "H", "H"],
            WATER,
            {"0": {"1": "1"}, "1": {"0": "1"}}
        ]));
        let mol = InputType::List.normalize(&raw).unwrap();
        let mol = mol.as_molecule().unwrap();
        assert_eq!(mol.bond_count(), 1);
        assert_eq!(mol.connections().unwrap()[&1][&0], "1");
    }

    #[test]
    fn numbers_and_elements_fields_without_geometry() {
        let input_type = InputType::fields(&["numbers", "elements"]).unwrap();
        let raw = RawInput::Fields(vec![json!([8, 1, 1]), json!(["O", "H", "H"])]);
        let mol = input_type.normalize(&raw).unwrap();
        let mol = mol.as_molecule().unwrap();
        assert_eq!(mol.elements(), &["O", "H", "H"].map(String::from)[..]);
        assert!(mol.coords().is_none());
        assert!(mol.connections().is_none());
    }

    #[test]
    fn field_count_mismatch_is_rejected() {
        let input_type = InputType::fields(&["elements", "coords"]).unwrap();
        let err = input_type
            .normalize(&RawInput::Value(json!([["H"]])))
            .unwrap_err();
        assert!(matches!(err, Error::FieldCount { expected: 2, found: 1 }));
    }

    #[test]
    fn wrong_shape_for_mode_is_rejected() {
        let err = InputType::List
            .normalize(&RawInput::Path("methane.xyz".into()))
            .unwrap_err();
        assert!(matches!(err, Error::InputMismatch { .. }));

        let err = InputType::Filename
            .normalize(&RawInput::Value(json!(3)))
            .unwrap_err();
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn malformed_field_values_are_reported() {
        let input_type = InputType::fields(&["elements", "coords"]).unwrap();
        let err = input_type
            .normalize(&RawInput::Value(json!([["H"], [[0.0, 1.0]]])))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "coords"));
    }

    #[test]
    fn asymmetric_connections_surface_model_error() {
        let raw = RawInput::Value(json!([["H", "H"], [[0, 0, 0], [0, 0, 0.7]], {"0": {"1": "1"}}]));
        let err = InputType::List.normalize(&raw).unwrap_err();
        assert!(matches!(err, Error::Model(crate::model::Error::AsymmetricConnection { .. })));
    }

    #[test]
    fn resolve_input_type_without_inner() {
        assert_eq!(BaseConfig::resolve_input_type(None, None).unwrap(), InputType::List);
        assert_eq!(
            BaseConfig::resolve_input_type(Some(InputType::Filename), None).unwrap(),
            InputType::Filename
        );
    }
}
