use crate::errors::{ConfigurationError, Result};

/// Kind of coupling stored in a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Hopping amplitude $t_{i\alpha,j\beta}$.
    Hopping,
    /// Charge transfer interaction $U_{pd}$ between a two-orbital site and a
    /// one-orbital site.
    Upd,
}

impl TermKind {
    pub const COUNT: usize = 2;

    pub fn index(&self) -> usize {
        match self {
            TermKind::Hopping => 0,
            TermKind::Upd => 1,
        }
    }
}

/// Lattice collaborator of the models.
pub trait Geometry: Sync {
    fn number_of_sites(&self) -> usize;
    /// Number of orbitals of a site.
    fn orbitals(&self, site: usize) -> usize;
    /// Amplitude of the `kind` coupling between `(i, orb_i)` and `(j, orb_j)`,
    /// $0$ when they are not coupled.
    fn coupling(&self, i: usize, orb_i: usize, j: usize, orb_j: usize, kind: TermKind) -> f64;
}

/// Dense coupling table, one `n_slots x n_slots` block per [TermKind].
/// # Usage
/// ```rust
/// use exactdiag::geometry::{CouplingTable, Geometry, TermKind};
/// let mut dimer = CouplingTable::uniform(2, 1).unwrap();
/// dimer.set(0, 0, 1, 0, TermKind::Hopping, -1.0);
/// assert_eq!(dimer.coupling(1, 0, 0, 0, TermKind::Hopping), -1.0);
/// assert_eq!(dimer.coupling(0, 0, 1, 0, TermKind::Upd), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CouplingTable {
    orbitals: Vec<usize>,
    offsets: Vec<usize>,
    n_slots: usize,
    values: Vec<f64>,
}

impl CouplingTable {
    /// Empty table with the given number of orbitals per site.
    pub fn new(orbitals: Vec<usize>) -> Result<Self> {
        if let Some(site) = orbitals.iter().position(|&o| o == 0) {
            return Err(ConfigurationError::new(format!("Site {} has no orbital.", site)));
        }
        let mut offsets = Vec::with_capacity(orbitals.len());
        let mut n_slots = 0;
        for &o in orbitals.iter() {
            offsets.push(n_slots);
            n_slots += o;
        }
        Ok(CouplingTable {
            orbitals,
            offsets,
            n_slots,
            values: vec![0.0; TermKind::COUNT * n_slots * n_slots],
        })
    }

    /// Empty table with `orbitals` orbitals on each of the `n_sites` sites.
    pub fn uniform(n_sites: usize, orbitals: usize) -> Result<Self> {
        Self::new(vec![orbitals; n_sites])
    }

    #[inline(always)]
    fn position(&self, i: usize, orb_i: usize, j: usize, orb_j: usize, kind: TermKind) -> usize {
        let a = self.offsets[i] + orb_i;
        let b = self.offsets[j] + orb_j;
        a + b * self.n_slots + kind.index() * self.n_slots * self.n_slots
    }

    /// Sets a coupling and its symmetric counterpart.
    pub fn set(&mut self, i: usize, orb_i: usize, j: usize, orb_j: usize, kind: TermKind, value: f64) {
        let ij = self.position(i, orb_i, j, orb_j, kind);
        let ji = self.position(j, orb_j, i, orb_i, kind);
        self.values[ij] = value;
        self.values[ji] = value;
    }

    /// Checks that `(site, orb)` exists.
    pub fn contains(&self, site: usize, orb: usize) -> bool {
        site < self.orbitals.len() && orb < self.orbitals[site]
    }
}

impl Geometry for CouplingTable {
    fn number_of_sites(&self) -> usize {
        self.orbitals.len()
    }

    fn orbitals(&self, site: usize) -> usize {
        self.orbitals[site]
    }

    #[inline(always)]
    fn coupling(&self, i: usize, orb_i: usize, j: usize, orb_j: usize, kind: TermKind) -> f64 {
        self.values[self.position(i, orb_i, j, orb_j, kind)]
    }
}
