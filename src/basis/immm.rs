use log::{error, info};

use crate::basis::{Basis, BasisOneSpin};
use crate::errors::{ConfigurationError, Result};
use crate::geometry::Geometry;
use crate::{BitOps, Spin};

/// Two-sector basis where every site carries either one or two orbitals.
/// # Definition
/// The orbitals are laid out contiguously: site $i$ starts at slot
/// $\sum_{k<i} N_o(k)$. Each spin sector is a [BasisOneSpin] over all the
/// slots, seen as one-orbital sites.
#[derive(Debug, Clone)]
pub struct ImmmBasis<T = u64> {
    orbitals: Vec<usize>,
    offsets: Vec<usize>,
    basis_up: BasisOneSpin<T>,
    basis_down: BasisOneSpin<T>,
}

impl<T: BitOps> ImmmBasis<T> {
    pub fn new(orbitals: Vec<usize>, n_up: usize, n_down: usize) -> Result<Self> {
        if let Some(site) = orbitals.iter().position(|&o| o != 1 && o != 2) {
            return Err(ConfigurationError::new(format!(
                "Site {} has {} orbitals, only 1 or 2 are supported.",
                site, orbitals[site]
            )));
        }
        let offsets: Vec<usize> = orbitals.iter()
            .scan(0, |acc, &o| {
                let start = *acc;
                *acc += o;
                Some(start)
            })
            .collect();
        let n_slots: usize = orbitals.iter().sum();
        let basis_up = BasisOneSpin::new(n_slots, 1, n_up)?;
        let basis_down = BasisOneSpin::new(n_slots, 1, n_down)?;
        info!("Basis of {} sites ({} slots), sector ({}, {}): {} states.",
            orbitals.len(), n_slots, n_up, n_down, basis_up.size() * basis_down.size());
        Ok(ImmmBasis { orbitals, offsets, basis_up, basis_down })
    }

    /// Reads the orbitals of every site from the geometry.
    pub fn from_geometry<G: Geometry>(geometry: &G, n_up: usize, n_down: usize) -> Result<Self> {
        let orbitals = (0..geometry.number_of_sites())
            .map(|site| geometry.orbitals(site))
            .collect();
        Self::new(orbitals, n_up, n_down)
    }
}

impl<T: BitOps> Basis for ImmmBasis<T> {
    type Word = T;

    #[inline(always)]
    fn sector(&self, spin: Spin) -> &BasisOneSpin<T> {
        match spin {
            Spin::Up => &self.basis_up,
            Spin::Down => &self.basis_down,
        }
    }

    fn n_sites(&self) -> usize {
        self.orbitals.len()
    }

    fn orbs_per_site(&self, site: usize) -> usize {
        self.orbitals[site]
    }

    /// # Panics
    /// `orb` must be an orbital of `site`.
    #[inline(always)]
    fn slot(&self, site: usize, orb: usize) -> usize {
        if orb >= self.orbitals[site] {
            error!("Orbital {} requested on site {} which has {} orbitals.", orb, site, self.orbitals[site]);
            panic!("Orbital {} out of range on site {}.", orb, site);
        }
        self.offsets[site] + orb
    }
}
