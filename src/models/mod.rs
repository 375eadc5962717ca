use crate::basis::Basis;
use crate::geometry::{Geometry, TermKind};
use crate::hamiltonian::Term;
use crate::{BitOps, FockState, Spin};

mod feas;
mod immm;

pub use feas::{FeAsParams, FeBasedSc};
pub use immm::{Immm, ImmmParams};

/// Emits every hopping term of the state at `idx`.
/// # Definition
/// $$
/// H_T=\sum_{a<b,\sigma}t_{ab}\left(c^\dagger_{a\sigma}c_{b\sigma}+c^\dagger_{b\sigma}c_{a\sigma}\right)
/// $$
/// Each unordered pair of slots is visited once, and only one of the two
/// operators can act, when exactly one of the slots is occupied.
pub(crate) fn emit_hoppings<B, G, F>(basis: &B, geometry: &G, state: &FockState<B::Word>, idx: usize, emit: &mut F)
where
    B: Basis,
    G: Geometry,
    F: FnMut(Term),
{
    let n_sites = basis.n_sites();
    for i in 0..n_sites {
        for orb_i in 0..basis.orbs_per_site(i) {
            let a = basis.slot(i, orb_i);
            for j in i..n_sites {
                for orb_j in 0..basis.orbs_per_site(j) {
                    let b = basis.slot(j, orb_j);
                    if b <= a {
                        continue;
                    }
                    let t = geometry.coupling(i, orb_i, j, orb_j, TermKind::Hopping);
                    if t == 0.0 {
                        continue;
                    }
                    for spin in Spin::BOTH {
                        let mut word = state.word(spin);
                        if word.check(a) == word.check(b) {
                            continue;
                        }
                        word.set(a);
                        word.set(b);
                        emit(Term {
                            col: basis.perfect_index_replacing(word, idx, spin),
                            amplitude: t,
                            sign: basis.do_sign(state, i, orb_i, j, orb_j, spin),
                        });
                    }
                }
            }
        }
    }
}

/// Occupation of `(site, orb)` by both spins.
#[inline(always)]
pub(crate) fn charge<B: Basis>(basis: &B, state: &FockState<B::Word>, site: usize, orb: usize) -> usize {
    basis.get_n(state.spin_up, site, orb) + basis.get_n(state.spin_down, site, orb)
}
