//! Geometry-based bond perception.
//!
//! Two atoms are considered bonded when their separation is at most
//! `tolerance × (r_i + r_j)`, with `r` the single-bond covalent radius of each
//! element. Candidate pairs come from a uniform grid whose cell size equals the
//! largest possible bond length, so only neighboring cells are inspected.

use super::molecule::Connections;
use super::radii::RadiusTable;
use std::collections::{BTreeMap, HashMap};

/// Scale factor applied to the covalent radius sum.
pub const DEFAULT_TOLERANCE: f64 = 1.15;

/// Label recorded for perceived bonds.
pub const DEFAULT_BOND_LABEL: &str = "1";

/// Grid-based spatial index for 3D point queries.
#[derive(Debug)]
struct SpatialGrid {
    inv_cell_size: f64,
    cells: HashMap<(i64, i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0);
        Self {
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
        }
    }

    fn cell_coords(&self, pos: [f64; 3]) -> (i64, i64, i64) {
        (
            (pos[0] * self.inv_cell_size).floor() as i64,
            (pos[1] * self.inv_cell_size).floor() as i64,
            (pos[2] * self.inv_cell_size).floor() as i64,
        )
    }

    fn insert(&mut self, idx: usize, pos: [f64; 3]) {
        let cell = self.cell_coords(pos);
        self.cells.entry(cell).or_default().push(idx);
    }

    /// Indices stored in the 27 cells around `pos`, unordered.
    fn neighbors(&self, pos: [f64; 3]) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy, cz) = self.cell_coords(pos);
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                (-1..=1).flat_map(move |dz| {
                    self.cells
                        .get(&(cx.saturating_add(dx), cy.saturating_add(dy), cz.saturating_add(dz)))
                        .into_iter()
                        .flatten()
                        .copied()
                })
            })
        })
    }
}

#[inline]
fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

/// Perceives connections with the built-in radii and [`DEFAULT_TOLERANCE`].
pub fn perceive_connections(elements: &[String], coords: &[[f64; 3]]) -> Connections {
    perceive_connections_with(elements, coords, RadiusTable::builtin(), DEFAULT_TOLERANCE)
}

/// Perceives connections from geometry.
///
/// Atoms whose element has no entry in `radii` never receive bonds. The
/// result is symmetric and every atom with at least one bond appears as a key.
/// Atoms without bonds are absent from the map.
pub fn perceive_connections_with(
    elements: &[String],
    coords: &[[f64; 3]],
    radii: &RadiusTable,
    tolerance: f64,
) -> Connections {
    let mut connections: Connections = BTreeMap::new();
    let n = elements.len().min(coords.len());

    let atom_radii: Vec<Option<f64>> = elements[..n]
        .iter()
        .enumerate()
        .map(|(idx, symbol)| {
            let radius = radii.get(symbol);
            if radius.is_none() {
                log::warn!("no covalent radius for '{symbol}' (atom {idx}); skipping bond perception");
            }
            radius
        })
        .collect();

    let cell_size = 2.0 * radii.max_radius() * tolerance;
    if n < 2 || cell_size <= 0.0 {
        return connections;
    }

    let mut grid = SpatialGrid::new(cell_size);
    for (idx, pos) in coords[..n].iter().enumerate() {
        if atom_radii[idx].is_some() {
            grid.insert(idx, *pos);
        }
    }

    for i in 0..n {
        let Some(ri) = atom_radii[i] else { continue };
        for j in grid.neighbors(coords[i]) {
            if j <= i {
                continue;
            }
            let Some(rj) = atom_radii[j] else { continue };
            if distance(coords[i], coords[j]) <= tolerance * (ri + rj) {
                connections
                    .entry(i)
                    .or_default()
                    .insert(j, DEFAULT_BOND_LABEL.to_string());
                connections
                    .entry(j)
                    .or_default()
                    .insert(i, DEFAULT_BOND_LABEL.to_string());
            }
        }
    }

    connections
}
