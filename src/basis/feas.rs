use log::info;

use crate::basis::{Basis, BasisOneSpin};
use crate::errors::{ConfigurationError, Result};
use crate::{BitOps, Spin};

/// Two-sector basis with the same number of orbitals on every site.
#[derive(Debug, Clone)]
pub struct FeAsBasis<T = u64> {
    basis_up: BasisOneSpin<T>,
    basis_down: BasisOneSpin<T>,
}

impl<T: BitOps> FeAsBasis<T> {
    pub fn new(n_sites: usize, orbitals: usize, n_up: usize, n_down: usize) -> Result<Self> {
        let basis_up = BasisOneSpin::new(n_sites, orbitals, n_up)?;
        let basis_down = BasisOneSpin::new(n_sites, orbitals, n_down)?;
        info!("Basis of {} sites with {} orbitals, sector ({}, {}): {} states.",
            n_sites, orbitals, n_up, n_down, basis_up.size() * basis_down.size());
        Ok(FeAsBasis { basis_up, basis_down })
    }

    /// A single particle number shared by both spins.
    /// # Errors
    /// Always. Green's functions cannot be computed from such a basis, which
    /// only exists for compatibility with older drivers.
    pub fn new_same_sector(n_sites: usize, orbitals: usize, n_particles: usize) -> Result<Self> {
        Err(ConfigurationError::new(format!(
            "Same-sector basis ({} sites, {} orbitals, {} particles per spin) is not supported: \
            the Green function cannot be computed with this model. Give both particle numbers instead.",
            n_sites, orbitals, n_particles
        )))
    }

    pub fn orbitals(&self) -> usize {
        self.basis_up.orbitals()
    }
}

impl<T: BitOps> Basis for FeAsBasis<T> {
    type Word = T;

    #[inline(always)]
    fn sector(&self, spin: Spin) -> &BasisOneSpin<T> {
        match spin {
            Spin::Up => &self.basis_up,
            Spin::Down => &self.basis_down,
        }
    }

    fn n_sites(&self) -> usize {
        self.basis_up.n_sites()
    }

    fn orbs_per_site(&self, _site: usize) -> usize {
        self.basis_up.orbitals()
    }

    #[inline(always)]
    fn slot(&self, site: usize, orb: usize) -> usize {
        self.basis_up.slot(site, orb)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_same_sector_fails() {
        match FeAsBasis::<u32>::new_same_sector(4, 2, 3) {
            Ok(_) => panic!("Should have errored."),
            Err(e) => assert!(e.details.contains("Green function")),
        }
    }

    #[test]
    fn test_size() {
        let basis = FeAsBasis::<u32>::new(3, 2, 2, 3).unwrap();
        assert_eq!(basis.size(), 15 * 20);
        assert_eq!(basis.n_slots(), 6);
        assert_eq!(basis.orbs_per_site(2), 2);
        assert_eq!(basis.slot(2, 1), 5);
    }

    #[test]
    #[should_panic]
    fn test_slot_outside_site() {
        let basis = FeAsBasis::<u32>::new(3, 2, 1, 1).unwrap();
        basis.slot(0, 2);
    }

    #[test]
    fn test_instances_do_not_share_orbitals() {
        let two = FeAsBasis::<u32>::new(2, 2, 1, 1).unwrap();
        let three = FeAsBasis::<u32>::new(2, 3, 1, 1).unwrap();
        assert_eq!(two.orbitals(), 2);
        assert_eq!(three.orbitals(), 3);
        assert_eq!(two.slot(1, 0), 2);
        assert_eq!(three.slot(1, 0), 3);
    }
}
