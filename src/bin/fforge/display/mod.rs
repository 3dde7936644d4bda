mod error;
mod progress;
mod tables;

use std::io::{self, IsTerminal};

pub use error::print_error;
pub use progress::FileProgress;
pub use tables::{MoleculeRow, print_molecule_table};

#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub interactive: bool,
}

impl Context {
    pub fn detect() -> Self {
        Self {
            interactive: io::stderr().is_terminal(),
        }
    }

    pub fn with_quiet(self, quiet: bool) -> Self {
        if quiet {
            Self { interactive: false }
        } else {
            self
        }
    }
}
