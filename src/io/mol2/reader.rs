use crate::io::{Format, error::Error};
use crate::model::molecule::{Connections, Molecule};
use crate::model::types::normalize_symbol;
use std::collections::HashMap;
use std::io::BufRead;

pub fn read<R: BufRead>(reader: R) -> Result<Molecule, Error> {
    let lines = collect_lines(reader)?;

    let mol_idx = find_section(&lines, "@<TRIPOS>MOLECULE")
        .ok_or_else(|| Error::parse(Format::Mol2, 1, "missing @<TRIPOS>MOLECULE section"))?;

    let mut cursor = mol_idx + 1;
    let _name = next_data_line(&lines, &mut cursor);

    let (count_line_no, count_line) = next_data_line(&lines, &mut cursor)
        .ok_or_else(|| Error::parse(Format::Mol2, cursor + 1, "missing counts line"))?;
    let (atom_count, bond_count) = parse_counts(&count_line, count_line_no)?;

    let atom_section = find_section(&lines, "@<TRIPOS>ATOM")
        .ok_or_else(|| Error::parse(Format::Mol2, cursor + 1, "missing @<TRIPOS>ATOM section"))?;
    let bond_section = find_section(&lines, "@<TRIPOS>BOND").unwrap_or(lines.len());

    let atoms = parse_atoms(&lines, atom_section + 1, bond_section, atom_count)?;
    let connections = parse_bonds(&lines, bond_section + 1, bond_count, &atoms.id_map)?;

    Molecule::builder()
        .elements(atoms.elements)
        .coords(atoms.coords)
        .connections(connections)
        .build()
        .map_err(|e| Error::molecule(Format::Mol2, e))
}

struct AtomBlock {
    elements: Vec<String>,
    coords: Vec<[f64; 3]>,
    id_map: HashMap<usize, usize>,
}

fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, Error> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|v| (i + 1, v)).map_err(Error::from))
        .collect()
}

fn find_section(lines: &[(usize, String)], name: &str) -> Option<usize> {
    lines
        .iter()
        .position(|(_, line)| line.trim().eq_ignore_ascii_case(name))
}

fn next_data_line(lines: &[(usize, String)], cursor: &mut usize) -> Option<(usize, String)> {
    while *cursor < lines.len() {
        let (ln, content) = &lines[*cursor];
        *cursor += 1;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Some((*ln, content.clone()));
    }
    None
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let parts: Vec<_> = line.split_whitespace().collect();
    let atoms = parts
        .first()
        .and_then(|p| p.parse::<usize>().ok())
        .ok_or_else(|| Error::parse(Format::Mol2, line_no, "invalid atom count in counts line"))?;
    // The bond count is optional in practice; a missing value means no bonds.
    let bonds = match parts.get(1) {
        Some(p) => p.parse::<usize>().map_err(|_| {
            Error::parse(Format::Mol2, line_no, "invalid bond count in counts line")
        })?,
        None => 0,
    };
    Ok((atoms, bonds))
}

fn parse_atoms(
    lines: &[(usize, String)],
    start: usize,
    end: usize,
    expected: usize,
) -> Result<AtomBlock, Error> {
    let mut block = AtomBlock {
        elements: Vec::with_capacity(expected),
        coords: Vec::with_capacity(expected),
        id_map: HashMap::with_capacity(expected),
    };

    let mut idx = start;
    while block.elements.len() < expected {
        if idx >= end {
            return Err(Error::parse(
                Format::Mol2,
                lines.get(end.saturating_sub(1)).map(|(ln, _)| *ln).unwrap_or(0),
                "ATOM section ended before expected atom count",
            ));
        }
        let (ln, raw) = &lines[idx];
        idx += 1;
        if raw.trim().is_empty() {
            continue;
        }

        let parts: Vec<_> = raw.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(Error::parse(Format::Mol2, *ln, "invalid ATOM line"));
        }

        let atom_id = parts[0]
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Mol2, *ln, "invalid atom id in ATOM line"))?;
        let mut xyz = [0.0; 3];
        for (axis, value) in xyz.iter_mut().enumerate() {
            *value = parts[2 + axis].parse::<f64>().map_err(|_| {
                Error::parse(Format::Mol2, *ln, "invalid coordinate in ATOM line")
            })?;
        }

        let element = normalize_symbol(parts[5])
            .or_else(|| normalize_symbol(parts[1]))
            .ok_or_else(|| Error::parse(Format::Mol2, *ln, "unable to infer element"))?;

        if block.id_map.insert(atom_id, block.elements.len()).is_some() {
            return Err(Error::parse(Format::Mol2, *ln, "duplicate atom id in ATOM line"));
        }
        block.elements.push(element.to_string());
        block.coords.push(xyz);
    }

    Ok(block)
}

fn parse_bonds(
    lines: &[(usize, String)],
    start: usize,
    expected: usize,
    id_map: &HashMap<usize, usize>,
) -> Result<Connections, Error> {
    let mut connections = Connections::new();

    let mut found = 0;
    let mut idx = start;
    while found < expected {
        if idx >= lines.len() {
            return Err(Error::parse(
                Format::Mol2,
                lines.last().map(|(ln, _)| *ln).unwrap_or(0),
                "BOND section ended before expected bond count",
            ));
        }
        let (ln, raw) = &lines[idx];
        idx += 1;
        if raw.trim().is_empty() {
            continue;
        }

        let parts: Vec<_> = raw.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(Error::parse(Format::Mol2, *ln, "invalid BOND line"));
        }

        let a1 = parts[1]
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Mol2, *ln, "invalid first atom id in BOND line"))?;
        let a2 = parts[2]
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Mol2, *ln, "invalid second atom id in BOND line"))?;

        let i = *id_map
            .get(&a1)
            .ok_or_else(|| Error::parse(Format::Mol2, *ln, "bond references unknown atom id"))?;
        let j = *id_map
            .get(&a2)
            .ok_or_else(|| Error::parse(Format::Mol2, *ln, "bond references unknown atom id"))?;

        let label = parts[3].to_lowercase();
        connections.entry(i).or_default().insert(j, label.clone());
        connections.entry(j).or_default().insert(i, label);
        found += 1;
    }

    Ok(connections)
}
