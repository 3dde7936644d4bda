use crate::io::{Format, error::Error};
use crate::model::molecule::Molecule;
use crate::model::types::normalize_symbol;
use std::io::BufRead;

/// Reads the first frame of an XYZ file.
///
/// Layout: atom count, a free-form comment line, then one `symbol x y z` line
/// per atom. Symbols may also be given as atomic numbers.
pub fn read<R: BufRead>(reader: R) -> Result<Molecule, Error> {
    let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

    let (count_ln, count_line) = next_line(&mut lines)?
        .ok_or_else(|| Error::parse(Format::Xyz, 1, "missing atom count line"))?;
    let atom_count = count_line
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Xyz, count_ln, "invalid atom count"))?;

    next_line(&mut lines)?
        .ok_or_else(|| Error::parse(Format::Xyz, count_ln + 1, "missing comment line"))?;

    let mut elements = Vec::with_capacity(atom_count);
    let mut coords = Vec::with_capacity(atom_count);

    while elements.len() < atom_count {
        let Some((ln, raw)) = next_line(&mut lines)? else {
            return Err(Error::parse(
                Format::Xyz,
                count_ln + 1 + elements.len(),
                format!("expected {atom_count} atoms, found {}", elements.len()),
            ));
        };

        let parts: Vec<_> = raw.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        if parts.len() < 4 {
            return Err(Error::parse(Format::Xyz, ln, "atom line needs a symbol and three coordinates"));
        }

        let symbol = normalize_symbol(parts[0])
            .ok_or_else(|| Error::parse(Format::Xyz, ln, format!("unknown element '{}'", parts[0])))?;

        let mut xyz = [0.0; 3];
        for (axis, value) in xyz.iter_mut().enumerate() {
            *value = parts[1 + axis]
                .parse::<f64>()
                .map_err(|_| Error::parse(Format::Xyz, ln, "invalid coordinate"))?;
        }

        elements.push(symbol.to_string());
        coords.push(xyz);
    }

    Molecule::from_geometry(elements, coords).map_err(|e| Error::molecule(Format::Xyz, e))
}

fn next_line<I>(lines: &mut I) -> Result<Option<(usize, String)>, Error>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
{
    match lines.next() {
        Some((ln, line)) => Ok(Some((ln, line?))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const WATER: &str = "3\nwater\nO 0.000 0.000 0.000\nH 0.757 0.586 0.000\nH -0.757 0.586 0.000\n";

    #[test]
    fn reads_elements_and_perceives_bonds() {
        let mol = read(Cursor::new(WATER)).unwrap();
        assert_eq!(mol.elements(), &["O", "H", "H"].map(String::from)[..]);
        assert_eq!(mol.coords().unwrap()[1], [0.757, 0.586, 0.0]);

        let conn = mol.connections().unwrap();
        assert_eq!(conn[&0].keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(!conn[&1].contains_key(&2));
    }

    #[test]
    fn atomic_numbers_are_accepted_as_symbols() {
        let mol = read(Cursor::new("2\n\n1 0 0 0\n1 0 0 0.70\n")).unwrap();
        assert_eq!(mol.elements(), &["H", "H"].map(String::from)[..]);
        assert_eq!(mol.bond_count(), 1);
    }

    #[test]
    fn short_file_is_rejected() {
        let err = read(Cursor::new("3\ncomment\nO 0 0 0\n")).unwrap_err();
        assert!(err.to_string().contains("expected 3 atoms, found 1"));
    }

    #[test]
    fn invalid_count_is_rejected() {
        let err = read(Cursor::new("three\n")).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn bad_coordinate_is_rejected() {
        let err = read(Cursor::new("1\n\nC 0.0 abc 0.0\n")).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }
}
