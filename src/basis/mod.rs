use log::error;
use num::PrimInt;

use crate::{BitOps, FockState, Operator, Spin, FERMION_SIGN};

mod one_spin;
mod feas;
mod immm;

pub use one_spin::BasisOneSpin;
pub use feas::FeAsBasis;
pub use immm::ImmmBasis;

/// $(-1)^n$ in terms of [FERMION_SIGN].
#[inline(always)]
pub(crate) fn parity_sign(n: u32) -> i32 {
    if n & 1 == 1 { FERMION_SIGN } else { 1 }
}

/// Capability interface of a two-sector basis.
/// # Definition
/// A basis is the direct product of a spin up and a spin down
/// [BasisOneSpin]. Implementors only describe how `(site, orbital)` pairs are
/// laid out on the slots of the occupation words. Every other operation is
/// provided, dispatching to the sector of the requested spin.
/// # Sign convention
/// Spin up operators are ordered before spin down ones. Any operator acting
/// on the spin down sector thus picks up an extra
/// $(-1)^{N_\uparrow}$, where $N_\uparrow$ is the popcount of the spin up word.
pub trait Basis: Sync {
    type Word: BitOps;

    fn sector(&self, spin: Spin) -> &BasisOneSpin<Self::Word>;
    fn n_sites(&self) -> usize;
    fn orbs_per_site(&self, site: usize) -> usize;
    /// Slot of orbital `orb` of `site` in the occupation words.
    fn slot(&self, site: usize, orb: usize) -> usize;

    fn n_slots(&self) -> usize {
        self.sector(Spin::Up).n_slots()
    }

    /// Hilbert space dimension.
    fn size(&self) -> usize {
        self.sector(Spin::Up).size() * self.sector(Spin::Down).size()
    }

    fn n_particles(&self, spin: Spin) -> usize {
        self.sector(spin).n_particles()
    }

    /// Splits a global index into its `(up, down)` ranks.
    #[inline(always)]
    fn split_index(&self, idx: usize) -> (usize, usize) {
        let n_up = self.sector(Spin::Up).size();
        (idx % n_up, idx / n_up)
    }

    #[inline(always)]
    fn word(&self, idx: usize, spin: Spin) -> Self::Word {
        let (x, y) = self.split_index(idx);
        match spin {
            Spin::Up => self.sector(Spin::Up).word(x),
            Spin::Down => self.sector(Spin::Down).word(y),
        }
    }

    fn state_at(&self, idx: usize) -> FockState<Self::Word> {
        let (x, y) = self.split_index(idx);
        FockState {
            spin_up: self.sector(Spin::Up).word(x),
            spin_down: self.sector(Spin::Down).word(y),
            n_slots: self.n_slots(),
        }
    }

    #[inline(always)]
    fn perfect_index(&self, state: &FockState<Self::Word>) -> usize {
        let up = self.sector(Spin::Up);
        up.perfect_index(state.spin_up)
            + self.sector(Spin::Down).perfect_index(state.spin_down) * up.size()
    }

    /// Index of the state at `idx` with the word of `spin` replaced by `word`.
    #[inline(always)]
    fn perfect_index_replacing(&self, word: Self::Word, idx: usize, spin: Spin) -> usize {
        let (x, y) = self.split_index(idx);
        let up = self.sector(Spin::Up);
        match spin {
            Spin::Up => up.perfect_index(word) + y * up.size(),
            Spin::Down => x + self.sector(Spin::Down).perfect_index(word) * up.size(),
        }
    }

    /// 0/1 occupation of `(site, orb)` in a single word.
    #[inline(always)]
    fn get_n(&self, word: Self::Word, site: usize, orb: usize) -> usize {
        word.check(self.slot(site, orb)) as usize
    }

    #[inline(always)]
    fn is_there_an_electron_at(&self, state: &FockState<Self::Word>, site: usize, spin: Spin, orb: usize) -> usize {
        self.get_n(state.word(spin), site, orb)
    }

    /// Index in this basis of `what` applied on `(site, spin, orb)` of
    /// `state`, a state of a neighbouring sector. `None` if the operator
    /// annihilates the state.
    fn bra_index(&self, state: &FockState<Self::Word>, what: Operator, site: usize, spin: Spin, orb: usize) -> Option<usize> {
        let word = BasisOneSpin::<Self::Word>::apply(state.word(spin), what, self.slot(site, orb))?;
        let bra = state.with_word(spin, word);
        for s in Spin::BOTH {
            if bra.word(s).count_ones() as usize != self.n_particles(s) {
                error!("State {} reached by {:?} on site {} orbital {} spin {} does not belong to the ({}, {}) sector.",
                    bra, what, site, orb, spin, self.n_particles(Spin::Up), self.n_particles(Spin::Down));
                panic!("Target basis does not match the sector reached by the operator.");
            }
        }
        Some(self.perfect_index(&bra))
    }

    /// Fermion sign of a hop between `(i, orb_i)` and `(j, orb_j)` in the
    /// sector of `spin`. A hop never leaves its sector, so the sign is the
    /// intrinsic one.
    /// # Panics
    /// `i` must not be greater than `j`.
    fn do_sign(&self, state: &FockState<Self::Word>, i: usize, orb_i: usize, j: usize, orb_j: usize, spin: Spin) -> i32 {
        if i > j {
            error!("do_sign called with i = {} > j = {} (orb_i = {}, orb_j = {}, spin = {}, state = {}).",
                i, j, orb_i, orb_j, spin, state);
            panic!("do_sign requires i <= j, got i = {}, j = {}.", i, j);
        }
        BasisOneSpin::<Self::Word>::do_sign_slots(state.word(spin), self.slot(i, orb_i), self.slot(j, orb_j))
    }

    /// Sign of a single operator on `(site, spin, orb)` of the state at `idx`,
    /// counted from the occupied slots above it.
    fn do_sign_site(&self, idx: usize, site: usize, spin: Spin, orb: usize) -> i32 {
        let state = self.state_at(idx);
        let slot = self.slot(site, orb);
        let sign = BasisOneSpin::<Self::Word>::do_sign_site_slot(state.word(spin), slot);
        sign * self.sector_sign(&state, spin)
    }

    /// Green's function sign of a single operator on `(site, spin, orb)`.
    fn do_sign_gf(&self, state: &FockState<Self::Word>, site: usize, spin: Spin, orb: usize) -> i32 {
        let slot = self.slot(site, orb);
        let sign = BasisOneSpin::<Self::Word>::do_sign_gf_slot(state.word(spin), slot);
        sign * self.sector_sign(state, spin)
    }

    /// Sign of moving an operator of `spin` past the whole spin up word.
    #[inline(always)]
    fn sector_sign(&self, state: &FockState<Self::Word>, spin: Spin) -> i32 {
        match spin {
            Spin::Up => 1,
            Spin::Down => parity_sign(state.spin_up.count_ones()),
        }
    }

    /// Particle numbers `(n_up, n_down)` of the sector reached by `what` on
    /// `spin`, if it exists.
    fn has_new_parts(&self, what: Operator, spin: Spin) -> Option<(usize, usize)> {
        let n = self.sector(spin).new_part(what)?;
        match spin {
            Spin::Up => Some((n, self.n_particles(Spin::Down))),
            Spin::Down => Some((self.n_particles(Spin::Up), n)),
        }
    }
}
