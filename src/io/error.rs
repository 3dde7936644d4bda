use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("unrecognized geometry file extension: '{0}' (expected .xyz or .mol2)")]
    UnsupportedFormat(String),

    #[error("invalid molecule in {format} data: {source}")]
    Molecule {
        format: Format,
        #[source]
        source: crate::model::Error,
    },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub(crate) fn molecule(format: Format, source: crate::model::Error) -> Self {
        Self::Molecule { format, source }
    }
}
