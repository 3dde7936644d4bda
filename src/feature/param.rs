use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::error::Error;
use super::input::InputType;
use super::introspect::Introspect;

/// Value of a transformer parameter.
#[derive(Clone, Default)]
pub enum Param {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Param>),
    Input(InputType),
    /// A nested transformer, serialized recursively.
    Feature(Arc<dyn Introspect>),
}

/// Type accepted by a declared parameter. [`Param::None`] is always accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Int,
    /// Accepts integers as well.
    Float,
    Text,
    List,
    Input,
    Feature,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn new(name: &'static str, kind: ParamKind) -> Self {
        Self { name, kind }
    }

    /// Checks `value` against the declared kind, widening integers to floats.
    pub fn coerce(&self, value: Param) -> Result<Param, Error> {
        let ok = match (&self.kind, &value) {
            (_, Param::None) | (ParamKind::Any, _) => true,
            (ParamKind::Float, Param::Int(i)) => return Ok(Param::Float(*i as f64)),
            (ParamKind::Bool, Param::Bool(_))
            | (ParamKind::Int, Param::Int(_))
            | (ParamKind::Float, Param::Float(_))
            | (ParamKind::Text, Param::Text(_))
            | (ParamKind::List, Param::List(_))
            | (ParamKind::Input, Param::Input(_))
            | (ParamKind::Feature, Param::Feature(_)) => true,
            _ => false,
        };
        if ok {
            Ok(value)
        } else {
            Err(Error::invalid_param(
                self.name,
                format!("expected {:?}, found {}", self.kind, value.type_name()),
            ))
        }
    }
}

impl Param {
    pub fn is_none(&self) -> bool {
        matches!(self, Param::None)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Param::None => "none",
            Param::Bool(_) => "bool",
            Param::Int(_) => "int",
            Param::Float(_) => "float",
            Param::Text(_) => "text",
            Param::List(_) => "list",
            Param::Input(_) => "input type",
            Param::Feature(_) => "transformer",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Param::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Param::Float(v) => Some(*v),
            Param::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_feature(&self) -> Option<&Arc<dyn Introspect>> {
        match self {
            Param::Feature(f) => Some(f),
            _ => None,
        }
    }

    /// JSON form; nested transformers expand to their own
    /// `{parameters, attributes, transformer}` document.
    pub fn to_json(&self) -> Result<Value, Error> {
        match self {
            Param::None => Ok(Value::Null),
            Param::Bool(v) => Ok(Value::from(*v)),
            Param::Int(v) => Ok(Value::from(*v)),
            Param::Float(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .ok_or_else(|| Error::Unrepresentable(format!("non-finite float {v}"))),
            Param::Text(v) => Ok(Value::from(v.as_str())),
            Param::List(items) => items
                .iter()
                .map(Param::to_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Param::Input(t) => t.to_json(),
            Param::Feature(f) => f.to_json(),
        }
    }

    /// Inverse of [`to_json`](Self::to_json) for plain values. Objects have
    /// no parameter form and are rejected.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(Param::None),
            Value::Bool(b) => Ok(Param::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Param::Int(i)),
                None => n
                    .as_f64()
                    .map(Param::Float)
                    .ok_or_else(|| Error::Unrepresentable(n.to_string())),
            },
            Value::String(s) => Ok(Param::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(Param::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Param::List),
            Value::Object(_) => Err(Error::Unrepresentable(
                "JSON objects cannot be used as parameter values".into(),
            )),
        }
    }
}

/// Slug form: `None` for null, the nested slug for transformers.
impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::None => f.write_str("None"),
            Param::Bool(v) => write!(f, "{v}"),
            Param::Int(v) => write!(f, "{v}"),
            Param::Float(v) => write!(f, "{v}"),
            Param::Text(v) => f.write_str(v),
            Param::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Param::Input(t) => write!(f, "{t}"),
            Param::Feature(feat) => f.write_str(&feat.slugify()),
        }
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::None => f.write_str("None"),
            Param::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Param::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Param::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Param::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Param::List(v) => f.debug_tuple("List").field(v).finish(),
            Param::Input(v) => f.debug_tuple("Input").field(v).finish(),
            Param::Feature(v) => f
                .debug_tuple("Feature")
                .field(&v.kind().qualified_name())
                .finish(),
        }
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Param::None, Param::None) => true,
            (Param::Bool(a), Param::Bool(b)) => a == b,
            (Param::Int(a), Param::Int(b)) => a == b,
            (Param::Float(a), Param::Float(b)) => a == b,
            (Param::Text(a), Param::Text(b)) => a == b,
            (Param::List(a), Param::List(b)) => a == b,
            (Param::Input(a), Param::Input(b)) => a == b,
            (Param::Feature(a), Param::Feature(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Bool(v)
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Int(v)
    }
}

impl From<usize> for Param {
    fn from(v: usize) -> Self {
        Param::Int(v as i64)
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Float(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

impl From<InputType> for Param {
    fn from(v: InputType) -> Self {
        Param::Input(v)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        v.map_or(Param::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slug_form() {
        assert_eq!(Param::None.to_string(), "None");
        assert_eq!(Param::from(3i64).to_string(), "3");
        assert_eq!(Param::from(0.5).to_string(), "0.5");
        assert_eq!(
            Param::List(vec![Param::from("a"), Param::None]).to_string(),
            "[a, None]"
        );
        assert_eq!(Param::Input(InputType::Filename).to_string(), "filename");
    }

    #[test]
    fn json_form() {
        let p = Param::List(vec![Param::from(1i64), Param::from(true), Param::None]);
        assert_eq!(p.to_json().unwrap(), json!([1, true, null]));
        assert_eq!(Param::from_json(&json!([1, true, null])).unwrap(), p);
        assert_eq!(Param::Input(InputType::List).to_json().unwrap(), json!("list"));
    }

    #[test]
    fn non_finite_floats_are_unrepresentable() {
        assert!(matches!(
            Param::Float(f64::NAN).to_json(),
            Err(Error::Unrepresentable(_))
        ));
        assert!(matches!(
            Param::List(vec![Param::Float(f64::INFINITY)]).to_json(),
            Err(Error::Unrepresentable(_))
        ));
    }

    #[test]
    fn spec_coercion() {
        let spec = ParamSpec::new("slope", ParamKind::Float);
        assert_eq!(spec.coerce(Param::Int(2)).unwrap(), Param::Float(2.0));
        assert_eq!(spec.coerce(Param::None).unwrap(), Param::None);
        let err = spec.coerce(Param::from("steep")).unwrap_err();
        assert!(matches!(err, Error::InvalidParam { ref name, .. } if name == "slope"));

        let any = ParamSpec::new("value", ParamKind::Any);
        assert_eq!(any.coerce(Param::from("x")).unwrap(), Param::from("x"));
    }

    #[test]
    fn option_conversion() {
        assert_eq!(Param::from(None::<i64>), Param::None);
        assert_eq!(Param::from(Some("x")), Param::Text("x".into()));
    }
}
