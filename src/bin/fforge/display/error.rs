use std::io::{self, Write};

use anyhow::Error;

use featforge::io::{Error as IoError, Format};
use featforge::{FeatureError, ModelError};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    let hints = hints_for(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

/// Hints for the first typed error found in the chain.
fn hints_for(err: &Error) -> Vec<String> {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<FeatureError>() {
            match e {
                FeatureError::Io(io_err) => return io_hints(io_err),
                FeatureError::Model(model_err) => return model_hints(model_err),
                FeatureError::InvalidParam { name, .. } if name == "n_jobs" => {
                    return vec![
                        "Use -j 1 to read sequentially".into(),
                        "Use a negative value such as -j -1 to use every core".into(),
                    ];
                }
                FeatureError::ThreadPool(_) => {
                    return vec!["Try a smaller worker count with -j".into()];
                }
                _ => {}
            }
        }
        if let Some(io_err) = cause.downcast_ref::<IoError>() {
            return io_hints(io_err);
        }
    }
    Vec::new()
}

fn io_hints(err: &IoError) -> Vec<String> {
    match err {
        IoError::Io { source } => match source.kind() {
            io::ErrorKind::NotFound => vec![
                "File not found".into(),
                "Check the path spelling and ensure the file exists".into(),
            ],
            io::ErrorKind::PermissionDenied => vec![
                "Permission denied accessing the file".into(),
                "Check file permissions with `ls -la`".into(),
            ],
            _ => vec!["Check the file path and permissions".into()],
        },
        IoError::Parse { format, line, .. } => {
            let mut hints = vec![format!(
                "Parser encountered an issue near line {line} in {format} format"
            )];
            hints.push(match format {
                Format::Xyz => "XYZ: first line is the atom count, second a comment, then `symbol x y z` per atom".into(),
                Format::Mol2 => "MOL2: verify the @<TRIPOS>MOLECULE, ATOM and BOND sections".into(),
            });
            hints
        }
        IoError::UnsupportedFormat(ext) => vec![
            format!("The '{ext}' extension is not recognized"),
            "Supported input formats: .xyz, .mol2".into(),
        ],
        IoError::Molecule { source, .. } => model_hints(source),
    }
}

fn model_hints(err: &ModelError) -> Vec<String> {
    match err {
        ModelError::ConnectionOutOfRange { .. }
        | ModelError::ConnectionKeyOutOfRange { .. }
        | ModelError::AsymmetricConnection { .. } => vec![
            "Bond table references atoms inconsistently".into(),
            "Check that every bond names two atoms defined in the file".into(),
        ],
        ModelError::NonFiniteCoordinate { atom, .. } => {
            vec![format!("Atom {atom} has an infinite or NaN coordinate")]
        }
        ModelError::UnknownAtomicNumber(n) => {
            vec![format!("Atomic number {n} is outside the periodic table")]
        }
        _ => vec!["The structure is internally inconsistent".into()],
    }
}
