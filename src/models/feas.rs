use log::{info, trace};

use crate::basis::{Basis, FeAsBasis};
use crate::errors::{ConfigurationError, Result};
use crate::geometry::Geometry;
use crate::hamiltonian::{Model, Term};
use crate::models::{charge, emit_hoppings};
use crate::{BitOps, FockState, Spin, FERMION_SIGN};

/// Interaction strengths of the FeAs model.
/// # Fields
/// * __`hubbard_u`__ - $U_0$ intra-orbital repulsion, $U_1$ inter-orbital
/// density-density, $U_2$ Hund coupling $\vec S_{i0}\cdot\vec S_{i1}$ and $U_3$
/// pair hopping.
/// * __`potential_v`__ - On-site potential, one per site.
#[derive(Debug, Clone, PartialEq)]
pub struct FeAsParams {
    pub hubbard_u: [f64; 4],
    pub potential_v: Vec<f64>,
}

impl FeAsParams {
    pub fn new(hubbard_u: [f64; 4], potential_v: Vec<f64>) -> Self {
        FeAsParams { hubbard_u, potential_v }
    }
}

impl std::fmt::Display for FeAsParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "U0 = {}, U1 = {}, U2 = {}, U3 = {}, V = {:?}",
            self.hubbard_u[0], self.hubbard_u[1], self.hubbard_u[2], self.hubbard_u[3], self.potential_v)
    }
}

/// Two-orbital model of the iron pnictides.
/// # Definition
/// $$
/// H = H_T + \sum_{i}\Big[U_0\sum_\alpha n_{i\alpha\uparrow}n_{i\alpha\downarrow}
/// + U_1 n_{i0}n_{i1} + U_2\vec S_{i0}\cdot\vec S_{i1}
/// + U_3\sum_{\alpha\neq\beta}c^\dagger_{i\alpha\uparrow}c^\dagger_{i\alpha\downarrow}
/// c_{i\beta\downarrow}c_{i\beta\uparrow} + V_i\sum_\alpha n_{i\alpha}\Big]
/// $$
/// With a single orbital per site, only the $U_0$ and potential terms remain.
pub struct FeBasedSc<'a, G, T = u64> {
    basis: FeAsBasis<T>,
    params: FeAsParams,
    geometry: &'a G,
}

impl<'a, G: Geometry, T: BitOps> FeBasedSc<'a, G, T> {
    /// # Errors
    /// If the sites do not all carry the same number of orbitals, if that
    /// number is not 1 or 2, if there is not one potential per site, or if the
    /// basis cannot be built.
    pub fn new(n_up: usize, n_down: usize, params: FeAsParams, geometry: &'a G) -> Result<Self> {
        let n_sites = geometry.number_of_sites();
        if n_sites == 0 {
            return Err(ConfigurationError::new("The lattice has no site.".to_owned()));
        }
        let orbitals = geometry.orbitals(0);
        if let Some(site) = (0..n_sites).find(|&i| geometry.orbitals(i) != orbitals) {
            return Err(ConfigurationError::new(format!(
                "Site {} has {} orbitals but site 0 has {}.",
                site, geometry.orbitals(site), orbitals
            )));
        }
        if orbitals != 1 && orbitals != 2 {
            return Err(ConfigurationError::new(format!(
                "{} orbitals per site, only 1 or 2 are supported.", orbitals
            )));
        }
        if params.potential_v.len() != n_sites {
            return Err(ConfigurationError::new(format!(
                "Expected {} potential values, got {}.", n_sites, params.potential_v.len()
            )));
        }
        let basis = FeAsBasis::new(n_sites, orbitals, n_up, n_down)?;
        info!("FeAs model, {}.", params);
        Ok(FeBasedSc { basis, params, geometry })
    }

    pub fn params(&self) -> &FeAsParams {
        &self.params
    }

    /// $S^z_{i\alpha}=\frac12(n_{i\alpha\uparrow}-n_{i\alpha\downarrow})$
    #[inline(always)]
    fn sz(&self, state: &FockState<T>, site: usize, orb: usize) -> f64 {
        let up = self.basis.get_n(state.spin_up, site, orb) as f64;
        let down = self.basis.get_n(state.spin_down, site, orb) as f64;
        0.5 * (up - down)
    }

    /// Moves one particle of `spin` from `(site, from)` to `(site, to)`.
    /// Returns the new word and the sign of the hop.
    #[inline(always)]
    fn intra_site_hop(&self, state: &FockState<T>, site: usize, from: usize, to: usize, spin: Spin) -> (T, i32) {
        let mut word = state.word(spin);
        word.set(self.basis.slot(site, from));
        word.set(self.basis.slot(site, to));
        (word, self.basis.do_sign(state, site, from, site, to, spin))
    }

    /// Spin flip part of the Hund coupling,
    /// $\frac{U_2}{2}S^+_{i o_1}S^-_{i o_2}$, acting when spin up sits on $o_2$
    /// and spin down on $o_1$. Reordering the four operators into one hop per
    /// spin sector costs a sign.
    fn emit_spin_flip<F: FnMut(Term)>(&self, state: &FockState<T>, site: usize, o1: usize, o2: usize, emit: &mut F) {
        let b = &self.basis;
        if b.get_n(state.spin_up, site, o2) != 1
            || b.get_n(state.spin_up, site, o1) != 0
            || b.get_n(state.spin_down, site, o1) != 1
            || b.get_n(state.spin_down, site, o2) != 0
        {
            return;
        }
        let (up, sign_up) = self.intra_site_hop(state, site, o2, o1, Spin::Up);
        let (down, sign_down) = self.intra_site_hop(state, site, o1, o2, Spin::Down);
        let bra = FockState { spin_up: up, spin_down: down, n_slots: state.n_slots };
        trace!("Spin flip on site {} ({}, {}): {} -> {}", site, o1, o2, state, bra);
        emit(Term {
            col: b.perfect_index(&bra),
            amplitude: self.params.hubbard_u[2] * 0.5,
            sign: FERMION_SIGN * sign_up * sign_down,
        });
    }

    /// Pair hopping $U_3c^\dagger_{io_1\uparrow}c^\dagger_{io_1\downarrow}
    /// c_{io_2\downarrow}c_{io_2\uparrow}$, acting when $o_2$ is doubly occupied
    /// and $o_1$ empty.
    fn emit_pair_hop<F: FnMut(Term)>(&self, state: &FockState<T>, site: usize, o1: usize, o2: usize, emit: &mut F) {
        let b = &self.basis;
        if b.get_n(state.spin_up, site, o2) != 1
            || b.get_n(state.spin_up, site, o1) != 0
            || b.get_n(state.spin_down, site, o1) != 0
            || b.get_n(state.spin_down, site, o2) != 1
        {
            return;
        }
        let (up, sign_up) = self.intra_site_hop(state, site, o2, o1, Spin::Up);
        let (down, sign_down) = self.intra_site_hop(state, site, o2, o1, Spin::Down);
        let bra = FockState { spin_up: up, spin_down: down, n_slots: state.n_slots };
        trace!("Pair hop on site {} ({}, {}): {} -> {}", site, o1, o2, state, bra);
        emit(Term {
            col: b.perfect_index(&bra),
            amplitude: self.params.hubbard_u[3],
            sign: sign_up * sign_down,
        });
    }
}

impl<'a, G: Geometry, T: BitOps> Model for FeBasedSc<'a, G, T> {
    type Basis = FeAsBasis<T>;

    fn basis(&self) -> &FeAsBasis<T> {
        &self.basis
    }

    fn diagonal(&self, idx: usize) -> f64 {
        let b = &self.basis;
        let u = &self.params.hubbard_u;
        let state = b.state_at(idx);
        let mut s = 0.0;
        for i in 0..b.n_sites() {
            for orb in 0..b.orbitals() {
                let n_up = b.get_n(state.spin_up, i, orb);
                let n_down = b.get_n(state.spin_down, i, orb);
                s += u[0] * (n_up * n_down) as f64;
                s += self.params.potential_v[i] * (n_up + n_down) as f64;
            }
            if b.orbitals() == 2 {
                s += u[1] * (charge(b, &state, i, 0) * charge(b, &state, i, 1)) as f64;
                s += u[2] * self.sz(&state, i, 0) * self.sz(&state, i, 1);
            }
        }
        s
    }

    fn for_each_term<F: FnMut(Term)>(&self, idx: usize, mut emit: F) {
        let state = self.basis.state_at(idx);
        emit_hoppings(&self.basis, self.geometry, &state, idx, &mut emit);
        if self.basis.orbitals() != 2 {
            return;
        }
        for i in 0..self.basis.n_sites() {
            self.emit_spin_flip(&state, i, 0, 1, &mut emit);
            self.emit_spin_flip(&state, i, 1, 0, &mut emit);
            self.emit_pair_hop(&state, i, 0, 1, &mut emit);
            self.emit_pair_hop(&state, i, 1, 0, &mut emit);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{CouplingTable, TermKind};
    use crate::hamiltonian::setup_hamiltonian;

    fn single_site() -> CouplingTable {
        CouplingTable::uniform(1, 2).unwrap()
    }

    #[test]
    fn test_potential_length() {
        let geometry = CouplingTable::uniform(2, 2).unwrap();
        let params = FeAsParams::new([1.0; 4], vec![0.0]);
        assert!(FeBasedSc::<_, u16>::new(1, 1, params, &geometry).is_err());
    }

    #[test]
    fn test_unsupported_orbitals() {
        let geometry = CouplingTable::uniform(2, 3).unwrap();
        let params = FeAsParams::new([1.0; 4], vec![0.0; 2]);
        assert!(FeBasedSc::<_, u16>::new(1, 1, params, &geometry).is_err());
        let mixed = CouplingTable::new(vec![2, 1]).unwrap();
        let params = FeAsParams::new([1.0; 4], vec![0.0; 2]);
        assert!(FeBasedSc::<_, u16>::new(1, 1, params, &mixed).is_err());
    }

    #[test]
    fn test_diagonal_single_site() {
        let geometry = single_site();
        let params = FeAsParams::new([3.0, 5.0, 4.0, 0.0], vec![0.5]);
        let model = FeBasedSc::<_, u16>::new(1, 1, params, &geometry).unwrap();
        for idx in 0..model.basis().size() {
            let state = model.basis().state_at(idx);
            let expected = if state.spin_up == state.spin_down {
                // Double occupancy: U0 + 2V.
                3.0 + 1.0
            } else {
                // One per orbital, opposite spins: U1 - U2/4 + 2V.
                5.0 - 1.0 + 1.0
            };
            assert_eq!(model.diagonal(idx), expected);
        }
    }

    #[test]
    fn test_spin_flip_and_pair_hop_rows() {
        let geometry = single_site();
        let params = FeAsParams::new([0.0, 0.0, 2.0, 0.75], vec![0.0]);
        let model = FeBasedSc::<_, u16>::new(1, 1, params, &geometry).unwrap();
        let mut n_terms = 0;
        for idx in 0..model.basis().size() {
            model.for_each_term(idx, |term| {
                n_terms += 1;
                assert_ne!(term.col, idx);
                let value = term.value();
                assert!(value == -1.0 || value == 0.75, "unexpected value {}", value);
            });
        }
        // Two spin flips and two pair hops over the four states.
        assert_eq!(n_terms, 4);
    }

    #[test]
    fn test_one_orbital_hubbard_dimer() {
        let mut geometry = CouplingTable::uniform(2, 1).unwrap();
        geometry.set(0, 0, 1, 0, TermKind::Hopping, -1.0);
        let params = FeAsParams::new([4.0, 9.0, 9.0, 9.0], vec![0.0, 0.0]);
        let model = FeBasedSc::<_, u8>::new(1, 1, params, &geometry).unwrap();
        let h = setup_hamiltonian(&model);
        assert_eq!(h.rows(), 4);
        assert!(h.is_symmetric(1e-14));
        let dense = h.to_dense();
        let trace: f64 = (0..4).map(|i| dense[i + 4 * i]).sum();
        assert_eq!(trace, 8.0);
        // Every off-diagonal element is a hop of amplitude 1.
        for i in 0..4 {
            for j in 0..4 {
                if i != j {
                    let v = dense[j + 4 * i].abs();
                    assert!(v == 0.0 || v == 1.0);
                }
            }
        }
    }
}
