use super::error::Error;

/// Element symbols ordered by atomic number (index 0 is hydrogen).
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Returns the atomic number for an exact, case-sensitive element symbol.
pub fn atomic_number(symbol: &str) -> Option<u32> {
    SYMBOLS
        .iter()
        .position(|s| *s == symbol)
        .map(|idx| idx as u32 + 1)
}

/// Returns the element symbol for an atomic number in `1..=118`.
pub fn element_symbol(number: u32) -> Option<&'static str> {
    let idx = usize::try_from(number).ok()?.checked_sub(1)?;
    SYMBOLS.get(idx).copied()
}

/// Maps a loosely formatted atom label onto a canonical element symbol.
///
/// Accepts forms found in geometry files such as `"c"`, `"CL"`, `"C.ar"`
/// (MOL2 atom types) or a bare atomic number like `"6"`.
pub fn normalize_symbol(token: &str) -> Option<&'static str> {
    let token = token.trim();
    if let Ok(number) = token.parse::<u32>() {
        return element_symbol(number);
    }

    let head = token.split('.').next().unwrap_or(token);
    let letters: String = head.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if letters.is_empty() {
        return None;
    }

    let mut chars = letters.chars();
    let first = chars.next()?.to_ascii_uppercase();
    let rest: String = chars.map(|c| c.to_ascii_lowercase()).collect();

    let two = format!("{first}{}", rest.chars().next().map(String::from).unwrap_or_default());
    if rest.len() <= 1 {
        if let Some(sym) = SYMBOLS.iter().find(|s| **s == two) {
            return Some(sym);
        }
    }

    let one = first.to_string();
    SYMBOLS.iter().find(|s| **s == one).copied()
}

pub(crate) fn numbers_from_elements(elements: &[String]) -> Option<Vec<u32>> {
    elements.iter().map(|e| atomic_number(e)).collect()
}

pub(crate) fn elements_from_numbers(numbers: &[u32]) -> Result<Vec<String>, Error> {
    numbers
        .iter()
        .map(|&n| {
            element_symbol(n)
                .map(str::to_string)
                .ok_or(Error::UnknownAtomicNumber(n))
        })
        .collect()
}
