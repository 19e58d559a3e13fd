//! Isotope identities and the ground-state mass lookup service
//!
//! The kinematics engine does not know where masses come from: it is handed a
//! `MassTable` at construction. `MassLookup` is the file-backed implementation
//! which reads atomic mass evaluation tables, while tests are free to plug in
//! synthetic tables.

use crate::{
    error::{MaskError, Result},
    numeric::Float,
};
use std::{
    collections::HashMap,
    fmt::{self, Display},
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Atomic mass unit (MeV)
pub const U_TO_MEV: Float = 931.4940954;

/// Electron mass (atomic mass units)
pub const ELECTRON_MASS_U: Float = 0.000548579909;

/// Number of header lines at the top of a mass file
const HEADER_LINES: usize = 2;

/// Identity of a nucleus: number of protons (Z) and nucleons (A)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Isotope {
    /// Number of protons
    pub z: i32,

    /// Number of nucleons
    pub a: i32,
}
//
impl Isotope {
    /// Absence of any nucleus, what remains when a nucleus is removed from
    /// itself. Has zero mass and no symbol.
    pub const VACUUM: Isotope = Isotope { z: 0, a: 0 };

    /// Build an isotope identity
    pub const fn new(z: i32, a: i32) -> Self {
        Self { z, a }
    }

    /// Identity of the system made of both nuclei
    pub fn combine(self, other: Isotope) -> Isotope {
        Isotope::new(self.z + other.z, self.a + other.a)
    }

    /// Identity of what remains once `other` is removed from this system
    pub fn difference(self, other: Isotope) -> Isotope {
        Isotope::new(self.z - other.z, self.a - other.a)
    }

    /// Truth that this is the vacuum identity
    pub fn is_vacuum(self) -> bool {
        self == Self::VACUUM
    }
}
//
impl Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(Z={}, A={})", self.z, self.a)
    }
}

/// Source of ground-state masses and isotopic symbols
///
/// Implementations must be deterministic and free of observable side effects.
pub trait MassTable {
    /// Ground-state nuclear mass (MeV)
    fn mass(&self, isotope: Isotope) -> Result<Float>;

    /// Isotopic symbol, e.g. "7Be"
    fn symbol(&self, isotope: Isotope) -> Result<String>;
}
//
impl<T: MassTable + ?Sized> MassTable for &T {
    fn mass(&self, isotope: Isotope) -> Result<Float> {
        (**self).mass(isotope)
    }

    fn symbol(&self, isotope: Isotope) -> Result<String> {
        (**self).symbol(isotope)
    }
}

/// Mass table loaded from an atomic mass evaluation file
///
/// After two header lines, each row reads
/// `<index> <Z> <A> <element> <integer mass (u)> <micro mass (u)>`.
/// Atomic masses are converted to nuclear masses by removing the electrons.
///
#[derive(Debug, Default)]
pub struct MassLookup {
    /// Nuclear masses (MeV)
    masses: HashMap<Isotope, Float>,

    /// Isotopic symbols
    symbols: HashMap<Isotope, String>,
}
//
impl MassLookup {
    /// Load the mass table from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MaskError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let lookup = Self::from_reader(BufReader::new(file))?;
        log::info!("Loaded {} isotopes from {:?}", lookup.len(), path);
        Ok(lookup)
    }

    /// Parse a mass table from any buffered source
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut lookup = Self::default();
        for (line_idx, line) in reader.lines().enumerate().skip(HEADER_LINES) {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            lookup
                .parse_row(&line)
                .map_err(|msg| MaskError::MassFile(format!("line {}: {}", line_idx + 1, msg)))?;
        }
        Ok(lookup)
    }

    /// Decode one row of the table and record it
    fn parse_row(&mut self, line: &str) -> std::result::Result<(), String> {
        let fields = line.split_whitespace().collect::<Vec<_>>();
        if fields.len() < 6 {
            return Err(format!("expected 6 columns, found {}", fields.len()));
        }
        let int = |idx: usize| {
            fields[idx]
                .parse::<i32>()
                .map_err(|e| format!("bad integer {:?}: {}", fields[idx], e))
        };
        let float = |idx: usize| {
            fields[idx]
                .parse::<Float>()
                .map_err(|e| format!("bad number {:?}: {}", fields[idx], e))
        };
        let isotope = Isotope::new(int(1)?, int(2)?);
        let element = fields[3];
        let atomic_mass = float(4)? + float(5)? * 1e-6;
        let nuclear_mass = (atomic_mass - (isotope.z as Float) * ELECTRON_MASS_U) * U_TO_MEV;
        self.masses.insert(isotope, nuclear_mass);
        self.symbols
            .insert(isotope, format!("{}{}", isotope.a, element));
        Ok(())
    }

    /// Number of isotopes in the table
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Truth that the table holds no isotope
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}
//
impl MassTable for MassLookup {
    fn mass(&self, isotope: Isotope) -> Result<Float> {
        self.masses
            .get(&isotope)
            .copied()
            .ok_or(MaskError::UnknownIsotope(isotope))
    }

    fn symbol(&self, isotope: Isotope) -> Result<String> {
        self.symbols
            .get(&isotope)
            .cloned()
            .ok_or(MaskError::UnknownIsotope(isotope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Atomic masses, AME2016
 N Z A El mass(u) micro-u
 0 0 1 n 1 008664.91582
 1 1 1 H 1 007825.03224
 2 1 2 H 2 014101.77811
 3 2 4 He 4 002603.25413
";

    #[test]
    fn parses_rows_into_nuclear_masses() {
        let lookup = MassLookup::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(lookup.len(), 4);

        let proton = lookup.mass(Isotope::new(1, 1)).unwrap();
        let expected = (1.00782503224 - ELECTRON_MASS_U) * U_TO_MEV;
        assert!((proton - expected).abs() < 1e-9);
        assert!((proton - 938.272).abs() < 1e-2);

        let neutron = lookup.mass(Isotope::new(0, 1)).unwrap();
        assert!((neutron - 939.565).abs() < 1e-2);
    }

    #[test]
    fn builds_isotopic_symbols() {
        let lookup = MassLookup::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(lookup.symbol(Isotope::new(2, 4)).unwrap(), "4He");
        assert_eq!(lookup.symbol(Isotope::new(1, 2)).unwrap(), "2H");
    }

    #[test]
    fn unknown_isotopes_are_reported() {
        let lookup = MassLookup::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!(matches!(
            lookup.mass(Isotope::new(92, 238)),
            Err(MaskError::UnknownIsotope(Isotope { z: 92, a: 238 }))
        ));
        assert!(lookup.symbol(Isotope::new(3, 7)).is_err());
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let bad = "header\nheader\n 0 1 1 H\n";
        let err = MassLookup::from_reader(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, MaskError::MassFile(msg) if msg.contains("line 3")));

        let bad = "header\nheader\n 0 one 1 H 1 007825.03224\n";
        assert!(MassLookup::from_reader(bad.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let err = MassLookup::load("/nonexistent/mass.txt").unwrap_err();
        assert!(matches!(err, MaskError::File { .. }));
    }

    #[test]
    fn isotope_arithmetic() {
        let d = Isotope::new(1, 2);
        let be7 = Isotope::new(4, 7);
        assert_eq!(be7.combine(d), Isotope::new(5, 9));
        assert_eq!(be7.combine(d).difference(d), be7);
        assert!(d.difference(d).is_vacuum());
    }
}
