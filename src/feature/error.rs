use thiserror::Error;

/// Errors raised by the transformer framework.
///
/// Configuration problems surface when a parameter is set or an input is
/// normalized, lifecycle problems when `fit`/`transform` run, and
/// serialization problems from `to_json`/`save_json`.
#[derive(Debug, Error)]
pub enum Error {
    /// A bare input-type string that names no supported mode.
    #[error("unsupported input type '{0}' (expected \"list\", \"filename\" or a list of field names)")]
    UnsupportedInputType(String),

    #[error("unknown input field '{0}' (expected elements, coords, numbers or connections)")]
    UnknownField(String),

    /// The raw input does not have the shape the configured input type expects.
    #[error("input type '{input_type}' cannot accept {found}")]
    InputMismatch { input_type: String, found: String },

    #[error("expected {expected} field values, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid value for field '{field}': {details}")]
    InvalidField { field: String, details: String },

    /// A wrapping transformer was asked for an input type different from
    /// the one its inner transformer uses.
    #[error("input type '{requested}' does not match inner transformer input type '{inner}'")]
    InputTypeMismatch { requested: String, inner: String },

    #[error("invalid value for parameter '{name}': {details}")]
    InvalidParam { name: String, details: String },

    #[error("transformer is not fit: attribute '{attribute}' is unset")]
    NotFitted { attribute: String },

    #[error("cannot fit on an empty batch")]
    EmptyInput,

    #[error("transform produced rows of unequal width ({expected} vs {found} at row {row})")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown parameter '{0}'")]
    UnknownParam(String),

    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    /// Failure reported by a concrete feature's per-item logic.
    #[error("feature computation failed: {0}")]
    Feature(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("value cannot be represented in JSON: {0}")]
    Unrepresentable(String),

    #[error("failed to write JSON to {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] crate::io::Error),

    #[error(transparent)]
    Model(#[from] crate::model::Error),

    #[error(transparent)]
    Encode(#[from] crate::encode::Error),
}

impl Error {
    pub fn invalid_param(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidParam {
            name: name.into(),
            details: details.into(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            details: details.into(),
        }
    }

    /// Wraps an arbitrary failure from per-item feature code.
    pub fn feature(details: impl std::fmt::Display) -> Self {
        Self::Feature(details.to_string())
    }
}
