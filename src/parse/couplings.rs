use csv::{Reader, StringRecord};
use derive_more::{Constructor, Error};
use log::{error, info};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::errors::ConfigurationError;
use crate::geometry::{CouplingTable, TermKind};

/// Parse the coupling definition of a lattice.
/// # Arguments
/// * __`fp`__ - File path to the definition file, in csv format, with a
/// header line.
/// * __`orbitals`__ - Number of orbitals of every site.
/// # Format
/// Each line is `i,orb_i,j,orb_j,kind,value` where `kind` is `hopping` (or
/// `0`) or `upd` (or `1`). Couplings are symmetric, so each bond is only
/// needed once.
pub fn parse_couplings_def(fp: &Path, orbitals: Vec<usize>) -> Result<CouplingTable> {
    let file = File::open(fp)?;
    let table = parse_couplings(file, orbitals)?;
    info!("Read coupling table from {}.", fp.display());
    Ok(table)
}

/// Same as [parse_couplings_def], from any reader.
pub fn parse_couplings<R: Read>(rdr: R, orbitals: Vec<usize>) -> Result<CouplingTable> {
    let mut table = CouplingTable::new(orbitals)?;
    let mut reader = Reader::from_reader(rdr);
    for (k, result) in reader.records().enumerate() {
        let rec = result?;
        // Should have 6 column.
        if rec.len() != 6 {
            error!("Error at line {} in couplings definition, invalid number of elements.", k);
            return Err(CouplingParseError::new(format!(
                "Expected 6 columns on line {}, got {}.", k, rec.len()
            )));
        }

        let i = parse_single_elem(&rec, 0, k)?;
        let orb_i = parse_single_elem(&rec, 1, k)?;
        let j = parse_single_elem(&rec, 2, k)?;
        let orb_j = parse_single_elem(&rec, 3, k)?;
        if !table.contains(i, orb_i) || !table.contains(j, orb_j) {
            error!("Error at line {}, ({}, {}) or ({}, {}) is not a site orbital.", k, i, orb_i, j, orb_j);
            return Err(CouplingParseError::new(format!(
                "Coupling on line {} refers to an orbital outside the lattice.", k
            )));
        }
        let kind = parse_kind(&rec, 4, k)?;
        let value = rec.get(5).unwrap_or("").trim().parse::<f64>()?;
        table.set(i, orb_i, j, orb_j, kind, value);
    }
    Ok(table)
}

fn parse_kind(line: &StringRecord, col: usize, l: usize) -> Result<TermKind> {
    match line.get(col).unwrap_or("").trim() {
        "hopping" | "t" | "0" => Ok(TermKind::Hopping),
        "upd" | "Upd" | "1" => Ok(TermKind::Upd),
        other => {
            error!("Expected a coupling kind at line {}, col {}, got {:?}.", l, col, other);
            Err(CouplingParseError::new(format!("Unknown coupling kind {:?}.", other)))
        }
    }
}

fn parse_single_elem(line: &StringRecord, col: usize, l: usize) -> Result<usize> {
    match line.get(col).unwrap_or("").trim().parse::<usize>() {
        Ok(v) => Ok(v),
        Err(error) => {
            error!("Expected valid coordinates in couplings definition at line {}, col {}", l, col);
            Err(CouplingParseError::from(error))
        }
    }
}

type Result<T> = std::result::Result<T, CouplingParseError>;

/// Error in the coupling table definition.
#[derive(Debug, Clone, Error, Constructor)]
pub struct CouplingParseError {
    pub details: String,
}

impl fmt::Display for CouplingParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Parsing error encountered in couplings definition: {}", self.details)
    }
}

impl From<std::num::ParseIntError> for CouplingParseError {
    fn from(err: std::num::ParseIntError) -> Self {
        CouplingParseError::new(format!("Expected to parse an integer: {}.", err))
    }
}

impl From<std::num::ParseFloatError> for CouplingParseError {
    fn from(err: std::num::ParseFloatError) -> Self {
        CouplingParseError::new(format!("Expected to parse a float: {}.", err))
    }
}

impl From<csv::Error> for CouplingParseError {
    fn from(err: csv::Error) -> Self {
        CouplingParseError::new(err.to_string())
    }
}

impl From<std::io::Error> for CouplingParseError {
    fn from(err: std::io::Error) -> Self {
        CouplingParseError::new(err.to_string())
    }
}

impl From<ConfigurationError> for CouplingParseError {
    fn from(err: ConfigurationError) -> Self {
        CouplingParseError::new(err.details)
    }
}
