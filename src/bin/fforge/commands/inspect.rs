use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;

use featforge::Molecule;
use featforge::feature::{BaseConfig, BaseFeature, Input, InputType, RawInput};

use crate::cli::InspectArgs;
use crate::display::{Context as DisplayContext, FileProgress, MoleculeRow, print_molecule_table};

#[derive(Serialize)]
struct Entry<'a> {
    file: &'a Path,
    formula: String,
    atoms: usize,
    bonds: usize,
    molecule: &'a Molecule,
}

pub fn run_inspect(args: InspectArgs, ctx: DisplayContext) -> Result<()> {
    let reader = BaseFeature::new(
        BaseConfig::new()
            .with_input_type(InputType::Filename)
            .with_n_jobs(args.jobs),
    );

    let progress = FileProgress::new(ctx.interactive, args.files.len());
    let molecules = read_all(&reader, &args.files, &progress)?;
    progress.finish(&format!(
        "Read {} file(s) on {} worker(s)",
        args.files.len(),
        worker_label(args.jobs)
    ));

    let mut stdout = io::stdout().lock();
    if args.json {
        let entries: Vec<Entry<'_>> = args
            .files
            .iter()
            .zip(&molecules)
            .map(|(file, molecule)| Entry {
                file,
                formula: molecule.formula(),
                atoms: molecule.atom_count(),
                bonds: molecule.bond_count(),
                molecule,
            })
            .collect();
        serde_json::to_writer_pretty(&mut stdout, &entries).context("failed to write JSON")?;
        writeln!(stdout)?;
    } else {
        let rows: Vec<MoleculeRow> = args
            .files
            .iter()
            .zip(&molecules)
            .map(|(file, molecule)| MoleculeRow {
                file: file.display().to_string(),
                formula: molecule.formula(),
                atoms: molecule.atom_count(),
                bonds: molecule.bond_count(),
            })
            .collect();
        print_molecule_table(&mut stdout, &rows)?;
    }

    Ok(())
}

/// Reads every file on the configured workers and reports the first
/// failure together with the offending path.
fn read_all(
    reader: &BaseFeature,
    files: &[PathBuf],
    progress: &FileProgress,
) -> Result<Vec<Molecule>> {
    let raw: Vec<RawInput> = files.iter().cloned().map(RawInput::Path).collect();
    let results = reader
        .map(&raw, |item| {
            let result = reader.convert_input(item);
            progress.inc();
            Ok(result)
        })
        .context("failed to start workers")?;

    files
        .iter()
        .zip(results)
        .map(|(path, result)| {
            match result.with_context(|| format!("failed to read {}", path.display()))? {
                Input::Molecule(molecule) => Ok(molecule),
                Input::Custom(_) => bail!("{} did not produce a molecule", path.display()),
            }
        })
        .collect()
}

fn worker_label(jobs: i64) -> String {
    if jobs < 0 {
        "all available".to_string()
    } else {
        jobs.to_string()
    }
}
