use super::bonding;
use super::error::Error;
use super::types::{atomic_number, elements_from_numbers, numbers_from_elements};
use serde::Serialize;
use std::collections::BTreeMap;

/// Atom index → neighbor index → bond label.
pub type Connections = BTreeMap<usize, BTreeMap<usize, String>>;

/// Canonical, immutable molecular structure.
///
/// Atom order in `elements` is the indexing used by `coords`, `numbers` and
/// `connections`. Build one with [`Molecule::builder`] or
/// [`Molecule::from_geometry`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Molecule {
    elements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coords: Option<Vec<[f64; 3]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    numbers: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connections: Option<Connections>,
}

impl Molecule {
    /// Starts an empty [`MoleculeBuilder`].
    pub fn builder() -> MoleculeBuilder {
        MoleculeBuilder::default()
    }

    /// Elements plus coordinates, with connections perceived from geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] when the two lengths differ and
    /// [`Error::NonFiniteCoordinate`] for infinite or NaN coordinates.
    pub fn from_geometry(elements: Vec<String>, coords: Vec<[f64; 3]>) -> Result<Self, Error> {
        Self::builder().elements(elements).coords(coords).build()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Cartesian coordinates in Ångströms, one row per atom.
    pub fn coords(&self) -> Option<&[[f64; 3]]> {
        self.coords.as_deref()
    }

    /// Atomic numbers; `None` when a symbol is outside the periodic table
    /// and no numbers were supplied.
    pub fn numbers(&self) -> Option<&[u32]> {
        self.numbers.as_deref()
    }

    /// Bond connectivity; `None` only when neither connections nor
    /// coordinates were available.
    pub fn connections(&self) -> Option<&Connections> {
        self.connections.as_ref()
    }

    /// Number of distinct bonds; each symmetric pair counts once.
    pub fn bond_count(&self) -> usize {
        self.connections
            .as_ref()
            .map(|c| c.values().map(BTreeMap::len).sum::<usize>() / 2)
            .unwrap_or(0)
    }

    /// Hill-ordered formula such as `CH4`.
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for e in &self.elements {
            *counts.entry(e.as_str()).or_default() += 1;
        }

        let mut out = String::new();
        let mut push = |symbol: &str, count: usize| {
            out.push_str(symbol);
            if count > 1 {
                out.push_str(&count.to_string());
            }
        };

        if let Some(c) = counts.remove("C") {
            push("C", c);
            if let Some(h) = counts.remove("H") {
                push("H", h);
            }
        }
        for (symbol, count) in counts {
            push(symbol, count);
        }
        out
    }
}

/// Assembles a [`Molecule`] from any subset of its fields.
///
/// Missing `elements` are derived from `numbers` and vice versa. Missing
/// connections are perceived when coordinates are present.
#[derive(Debug, Clone, Default)]
pub struct MoleculeBuilder {
    elements: Option<Vec<String>>,
    coords: Option<Vec<[f64; 3]>>,
    numbers: Option<Vec<u32>>,
    connections: Option<Connections>,
}

impl MoleculeBuilder {
    pub fn elements(mut self, elements: Vec<String>) -> Self {
        self.elements = Some(elements);
        self
    }

    pub fn coords(mut self, coords: Vec<[f64; 3]>) -> Self {
        self.coords = Some(coords);
        self
    }

    pub fn numbers(mut self, numbers: Vec<u32>) -> Self {
        self.numbers = Some(numbers);
        self
    }

    pub fn connections(mut self, connections: Connections) -> Self {
        self.connections = Some(connections);
        self
    }

    /// Like [`connections`](Self::connections), but `None` clears any
    /// previously supplied table so connections are perceived instead.
    pub fn connections_opt(mut self, connections: Option<Connections>) -> Self {
        self.connections = connections;
        self
    }

    /// Validates the supplied fields and derives the missing ones.
    ///
    /// # Errors
    ///
    /// Fails when neither elements nor numbers are present, when lengths
    /// disagree, when a known symbol disagrees with its atomic number, when
    /// a coordinate is not finite, or when the connection table is out of
    /// range or asymmetric.
    pub fn build(self) -> Result<Molecule, Error> {
        let elements = match (self.elements, &self.numbers) {
            (Some(elements), _) => elements,
            (None, Some(numbers)) => elements_from_numbers(numbers)?,
            (None, None) => return Err(Error::MissingElements),
        };
        let n = elements.len();

        let numbers = match self.numbers {
            Some(numbers) => Some(numbers),
            None => numbers_from_elements(&elements),
        };

        check_len("numbers", n, numbers.as_ref().map(Vec::len))?;
        check_len("coords", n, self.coords.as_ref().map(Vec::len))?;

        if let Some(numbers) = &numbers {
            check_numbers(&elements, numbers)?;
        }
        if let Some(coords) = &self.coords {
            check_finite(coords)?;
        }

        let connections = match (self.connections, &self.coords) {
            (Some(connections), _) => {
                validate_connections(&connections, n)?;
                Some(connections)
            }
            (None, Some(coords)) => Some(bonding::perceive_connections(&elements, coords)),
            (None, None) => None,
        };

        Ok(Molecule {
            elements,
            coords: self.coords,
            numbers,
            connections,
        })
    }
}

fn check_len(field: &'static str, expected: usize, found: Option<usize>) -> Result<(), Error> {
    match found {
        Some(found) if found != expected => Err(Error::LengthMismatch {
            field,
            expected,
            found,
        }),
        _ => Ok(()),
    }
}

/// Symbols outside the periodic table are not checked.
fn check_numbers(elements: &[String], numbers: &[u32]) -> Result<(), Error> {
    for (atom, (element, &number)) in elements.iter().zip(numbers).enumerate() {
        if atomic_number(element).is_some_and(|expected| expected != number) {
            return Err(Error::ElementNumberMismatch {
                atom,
                element: element.clone(),
                number,
            });
        }
    }
    Ok(())
}

fn check_finite(coords: &[[f64; 3]]) -> Result<(), Error> {
    match coords.iter().position(|xyz| xyz.iter().any(|v| !v.is_finite())) {
        Some(atom) => Err(Error::NonFiniteCoordinate {
            atom,
            coords: coords[atom],
        }),
        None => Ok(()),
    }
}

fn validate_connections(connections: &Connections, atom_count: usize) -> Result<(), Error> {
    for (&i, neighbors) in connections {
        if i >= atom_count {
            return Err(Error::ConnectionKeyOutOfRange { i, atom_count });
        }
        for &j in neighbors.keys() {
            if j >= atom_count {
                return Err(Error::ConnectionOutOfRange { i, j, atom_count });
            }
            let reverse = connections.get(&j).is_some_and(|m| m.contains_key(&i));
            if !reverse {
                return Err(Error::AsymmetricConnection { i, j });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn water_coords() -> Vec<[f64; 3]> {
        vec![[0.0, 0.0, 0.0], [0.757, 0.586, 0.0], [-0.757, 0.586, 0.0]]
    }

    #[test]
    fn from_geometry_derives_numbers_and_connections() {
        let mol = Molecule::from_geometry(strings(&["O", "H", "H"]), water_coords()).unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.numbers(), Some(&[8, 1, 1][..]));
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.formula(), "H2O");
    }

    #[test]
    fn elements_derived_from_numbers() {
        let mol = Molecule::builder().numbers(vec![6, 1, 1, 1, 1]).build().unwrap();
        assert_eq!(mol.elements(), &strings(&["C", "H", "H", "H", "H"])[..]);
        assert!(mol.coords().is_none());
        assert!(mol.connections().is_none());
        assert_eq!(mol.formula(), "CH4");
    }

    #[test]
    fn supplied_connections_are_kept_verbatim() {
        let mut conn = Connections::new();
        conn.entry(0).or_default().insert(1, "2".to_string());
        conn.entry(1).or_default().insert(0, "2".to_string());

        let mol = Molecule::builder()
            .elements(strings(&["O", "H", "H"]))
            .coords(water_coords())
            .connections(conn.clone())
            .build()
            .unwrap();
        assert_eq!(mol.connections(), Some(&conn));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = Molecule::from_geometry(strings(&["O", "H"]), water_coords()).unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                field: "coords",
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn rejects_out_of_range_connection() {
        let mut conn = Connections::new();
        conn.entry(0).or_default().insert(7, "1".to_string());
        conn.entry(7).or_default().insert(0, "1".to_string());

        let err = Molecule::builder()
            .elements(strings(&["H", "H"]))
            .connections(conn)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ConnectionOutOfRange { atom_count: 2, .. }));
    }

    #[test]
    fn rejects_out_of_range_key_without_neighbors() {
        let mut conn = Connections::new();
        conn.entry(0).or_default().insert(1, "1".to_string());
        conn.entry(1).or_default().insert(0, "1".to_string());
        conn.entry(7).or_default();

        let err = Molecule::builder()
            .elements(strings(&["H", "H"]))
            .connections(conn)
            .build()
            .unwrap_err();
        assert_eq!(err, Error::ConnectionKeyOutOfRange { i: 7, atom_count: 2 });
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        for bad in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = Molecule::from_geometry(strings(&["H", "H"]), vec![[bad, 0.0, 0.0], [0.0, 0.0, 0.0]])
                .unwrap_err();
            assert!(matches!(err, Error::NonFiniteCoordinate { atom: 0, .. }));
        }
    }

    #[test]
    fn huge_finite_coordinates_do_not_panic() {
        let mol = Molecule::from_geometry(
            strings(&["H", "H", "H"]),
            vec![[1e20, 0.0, 0.0], [-1e300, 1e300, 0.0], [0.0, 0.0, 0.0]],
        )
        .unwrap();
        assert_eq!(mol.bond_count(), 0);
    }

    #[test]
    fn rejects_numbers_disagreeing_with_elements() {
        let err = Molecule::builder()
            .elements(strings(&["C", "C"]))
            .numbers(vec![1, 1])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::ElementNumberMismatch {
                atom: 0,
                element: "C".to_string(),
                number: 1
            }
        );

        let mol = Molecule::builder()
            .elements(strings(&["C", "Xx"]))
            .numbers(vec![6, 200])
            .build()
            .unwrap();
        assert_eq!(mol.numbers(), Some(&[6, 200][..]));
    }

    #[test]
    fn rejects_asymmetric_connection() {
        let mut conn = Connections::new();
        conn.entry(0).or_default().insert(1, "1".to_string());

        let err = Molecule::builder()
            .elements(strings(&["H", "H"]))
            .connections(conn)
            .build()
            .unwrap_err();
        assert_eq!(err, Error::AsymmetricConnection { i: 0, j: 1 });
    }

    #[test]
    fn unknown_symbols_leave_numbers_unset() {
        let mol = Molecule::builder().elements(strings(&["C", "Xx"])).build().unwrap();
        assert!(mol.numbers().is_none());
    }

    #[test]
    fn missing_elements_and_numbers_is_an_error() {
        let err = Molecule::builder().coords(water_coords()).build().unwrap_err();
        assert_eq!(err, Error::MissingElements);
    }
}
