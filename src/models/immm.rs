use log::info;

use crate::basis::{Basis, ImmmBasis};
use crate::errors::{ConfigurationError, Result};
use crate::geometry::{Geometry, TermKind};
use crate::hamiltonian::{Model, Term};
use crate::models::{charge, emit_hoppings};
use crate::BitOps;

/// Parameters of the Immm model, one entry per site.
#[derive(Debug, Clone, PartialEq)]
pub struct ImmmParams {
    pub hubbard_u: Vec<f64>,
    pub potential_v: Vec<f64>,
    /// Reduction by the lattice reflection. Not implemented, must stay
    /// `false`.
    pub use_reflection_symmetry: bool,
}

impl ImmmParams {
    pub fn new(hubbard_u: Vec<f64>, potential_v: Vec<f64>) -> Self {
        ImmmParams { hubbard_u, potential_v, use_reflection_symmetry: false }
    }
}

/// Hole model of a lattice mixing one-orbital (copper) and two-orbital
/// (oxygen) sites.
/// # Definition
/// $$
/// H = H_T + \sum_{i\alpha}\Big[U_i(1-n_{i\alpha\uparrow})(1-n_{i\alpha\downarrow})
/// + V_in_{i\alpha}\Big] + \sum_{i\in O,\alpha}\sum_{j\in Cu}U^{pd}_{ij}
/// (2-n_{i\alpha})(2-n_{j})
/// $$
pub struct Immm<'a, G, T = u64> {
    basis: ImmmBasis<T>,
    params: ImmmParams,
    geometry: &'a G,
}

impl<'a, G: Geometry, T: BitOps> Immm<'a, G, T> {
    /// # Errors
    /// If the reflection symmetry is requested, if the parameters do not have
    /// one entry per site or if the basis cannot be built.
    pub fn new(n_up: usize, n_down: usize, params: ImmmParams, geometry: &'a G) -> Result<Self> {
        if params.use_reflection_symmetry {
            return Err(ConfigurationError::new(
                "Reflection symmetry is not implemented for the Immm model.".to_owned()
            ));
        }
        let n_sites = geometry.number_of_sites();
        if params.hubbard_u.len() != n_sites || params.potential_v.len() != n_sites {
            return Err(ConfigurationError::new(format!(
                "Expected {} values of U and V, got {} and {}.",
                n_sites, params.hubbard_u.len(), params.potential_v.len()
            )));
        }
        let basis = ImmmBasis::from_geometry(geometry, n_up, n_down)?;
        info!("Immm model over {} sites.", n_sites);
        Ok(Immm { basis, params, geometry })
    }

    pub fn params(&self) -> &ImmmParams {
        &self.params
    }
}

impl<'a, G: Geometry, T: BitOps> Model for Immm<'a, G, T> {
    type Basis = ImmmBasis<T>;

    fn basis(&self) -> &ImmmBasis<T> {
        &self.basis
    }

    fn diagonal(&self, idx: usize) -> f64 {
        let b = &self.basis;
        let state = b.state_at(idx);
        let n_sites = b.n_sites();
        let mut s = 0.0;
        for i in 0..n_sites {
            for orb in 0..b.orbs_per_site(i) {
                let n_up = b.get_n(state.spin_up, i, orb);
                let n_down = b.get_n(state.spin_down, i, orb);
                let total = (n_up + n_down) as f64;
                s += self.params.hubbard_u[i] * (1.0 - n_up as f64) * (1.0 - n_down as f64);
                s += self.params.potential_v[i] * total;

                if b.orbs_per_site(i) == 1 {
                    continue;
                }
                for j in 0..n_sites {
                    if b.orbs_per_site(j) == 2 {
                        continue;
                    }
                    let upd = self.geometry.coupling(i, 0, j, 0, TermKind::Upd);
                    s += (2.0 - total) * (2.0 - charge(b, &state, j, 0) as f64) * upd;
                }
            }
        }
        s
    }

    fn for_each_term<F: FnMut(Term)>(&self, idx: usize, mut emit: F) {
        let state = self.basis.state_at(idx);
        emit_hoppings(&self.basis, self.geometry, &state, idx, &mut emit);
    }
}
