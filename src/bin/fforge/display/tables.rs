use std::io::{self, Write};

use crate::util::text::truncate;

const FILE_W: usize = 28;
const FORMULA_W: usize = 12;
const COUNT_W: usize = 6;

pub struct MoleculeRow {
    pub file: String,
    pub formula: String,
    pub atoms: usize,
    pub bonds: usize,
}

pub fn print_molecule_table(out: &mut impl Write, rows: &[MoleculeRow]) -> io::Result<()> {
    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{left}{}{mid}{}{mid}{}{mid}{}{right}",
            "─".repeat(FILE_W + 2),
            "─".repeat(FORMULA_W + 2),
            "─".repeat(COUNT_W + 2),
            "─".repeat(COUNT_W + 2),
        )
    };

    writeln!(out, "{}", rule("┌", "┬", "┐"))?;
    writeln!(
        out,
        "│ {:<FILE_W$} │ {:<FORMULA_W$} │ {:>COUNT_W$} │ {:>COUNT_W$} │",
        "File", "Formula", "Atoms", "Bonds"
    )?;
    writeln!(out, "{}", rule("├", "┼", "┤"))?;

    for row in rows {
        writeln!(
            out,
            "│ {:<FILE_W$} │ {:<FORMULA_W$} │ {:>COUNT_W$} │ {:>COUNT_W$} │",
            truncate(&row.file, FILE_W),
            truncate(&row.formula, FORMULA_W),
            row.atoms,
            row.bonds
        )?;
    }

    writeln!(out, "{}", rule("└", "┴", "┘"))
}
