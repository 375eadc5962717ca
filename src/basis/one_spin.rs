use log::{debug, error};

use crate::basis::parity_sign;
use crate::errors::{ConfigurationError, Result};
use crate::{BitOps, Operator};

/// Occupation basis of a single spin species.
/// # Definition
/// Holds every occupation word with exactly `n_particles` set bits over
/// `n_sites * orbitals` slots, in increasing numerical order. The slot of
/// orbital `orb` of site `site` is `site * orbitals + orb`.
/// The binomial table is kept to compute the perfect index of any word in
/// $O(N)$.
/// # Usage
/// ```rust
/// use exactdiag::basis::BasisOneSpin;
/// let basis = BasisOneSpin::<u8>::new(2, 2, 2).unwrap();
/// assert_eq!(basis.size(), 6);
/// assert_eq!(basis[0], 0b0011);
/// assert_eq!(basis.perfect_index(0b1100), 5);
/// ```
#[derive(Debug, Clone)]
pub struct BasisOneSpin<T> {
    n_sites: usize,
    orbitals: usize,
    n_particles: usize,
    data: Vec<T>,
    comb: Vec<Vec<usize>>,
}

/// Pascal triangle `comb[n][k]` for `n <= n_max`, `k <= k_max`. Entries that
/// do not fit a `usize` saturate.
fn binomial_table(n_max: usize, k_max: usize) -> Vec<Vec<usize>> {
    let mut comb = vec![vec![0usize; k_max + 1]; n_max + 1];
    for n in 0..=n_max {
        comb[n][0] = 1;
        for k in 1..=<usize>::min(n, k_max) {
            comb[n][k] = comb[n - 1][k - 1].saturating_add(comb[n - 1][k]);
        }
    }
    comb
}

impl<T: BitOps> BasisOneSpin<T> {
    /// Enumerates the sector.
    /// # Errors
    /// Returns a [ConfigurationError] if there are no orbitals, if the slots do
    /// not fit the word type or if `n_particles` exceeds the number of slots.
    pub fn new(n_sites: usize, orbitals: usize, n_particles: usize) -> Result<Self> {
        if orbitals == 0 {
            return Err(ConfigurationError::new(
                "A site needs at least one orbital.".to_owned()
            ));
        }
        let n_slots = n_sites * orbitals;
        if n_slots > <T as BitOps>::n_bits() {
            return Err(ConfigurationError::new(format!(
                "{} slots do not fit in a {} bits occupation word.",
                n_slots, <T as BitOps>::n_bits()
            )));
        }
        if n_particles > n_slots {
            return Err(ConfigurationError::new(format!(
                "Cannot place {} particles on {} slots ({} sites, {} orbitals).",
                n_particles, n_slots, n_sites, orbitals
            )));
        }
        let comb = binomial_table(n_slots, n_particles);
        let size = comb[n_slots][n_particles];
        if size == <usize>::MAX {
            return Err(ConfigurationError::new(format!(
                "Sector C({}, {}) is too large to be enumerated.",
                n_slots, n_particles
            )));
        }

        let mut basis = BasisOneSpin {
            n_sites,
            orbitals,
            n_particles,
            data: Vec::with_capacity(size),
            comb,
        };
        for rank in 0..size {
            let word = basis.unrank(rank);
            basis.data.push(word);
        }
        debug!("Single spin basis: {} sites, {} orbitals, {} particles, {} states.",
            n_sites, orbitals, n_particles, size);
        Ok(basis)
    }

    /// Inverse of [BasisOneSpin::perfect_index], greedy over the
    /// combinatorial number system.
    fn unrank(&self, rank: usize) -> T {
        let mut word = <T>::zero();
        let mut rest = rank;
        let mut upper = self.n_slots();
        for k in (1..=self.n_particles).rev() {
            let mut p = upper - 1;
            while self.comb[p][k] > rest {
                p -= 1;
            }
            word |= <T as BitOps>::bitmask(p);
            rest -= self.comb[p][k];
            upper = p;
        }
        word
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn n_sites(&self) -> usize {
        self.n_sites
    }

    pub fn orbitals(&self) -> usize {
        self.orbitals
    }

    pub fn n_slots(&self) -> usize {
        self.n_sites * self.orbitals
    }

    pub fn n_particles(&self) -> usize {
        self.n_particles
    }

    /// Word at the given rank.
    #[inline(always)]
    pub fn word(&self, rank: usize) -> T {
        self.data[rank]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Single-bit mask of a slot.
    #[inline(always)]
    pub fn bitmask(slot: usize) -> T {
        <T as BitOps>::bitmask(slot)
    }

    /// # Panics
    /// `orb` must be below the number of orbitals per site.
    #[inline(always)]
    pub fn slot(&self, site: usize, orb: usize) -> usize {
        if orb >= self.orbitals {
            error!("Orbital {} requested on site {} with {} orbitals per site.", orb, site, self.orbitals);
            panic!("Orbital {} out of range on site {}.", orb, site);
        }
        site * self.orbitals + orb
    }

    /// Rank of a word in this sector.
    /// # Panics
    /// The word must hold exactly `n_particles` bits, all below `n_slots`.
    /// Anything else means it was built for another sector.
    pub fn perfect_index(&self, word: T) -> usize {
        let n_slots = self.n_slots();
        let outside = n_slots < <T as BitOps>::n_bits() && (word >> n_slots) != <T>::zero();
        if outside || word.count_ones() as usize != self.n_particles {
            error!("Word {:b} does not belong to the sector of {} particles on {} slots.",
                word, self.n_particles, n_slots);
            panic!("Perfect index requested for a word of another sector.");
        }
        let mut rank = 0;
        let mut rest = word;
        let mut k = 1;
        while rest != <T>::zero() {
            let p = rest.trailing_zeros() as usize;
            rank += self.comb[p][k];
            rest &= rest - <T>::one();
            k += 1;
        }
        rank
    }

    /// Number of particles of the state at `rank`.
    pub fn get_n(&self, rank: usize) -> usize {
        self.data[rank].count_ones() as usize
    }

    /// Number of particles in orbital `orb`, summed over all sites.
    pub fn get_n_orbital(&self, rank: usize, orb: usize) -> usize {
        let word = self.data[rank];
        (0..self.n_sites)
            .filter(|&site| word.check(self.slot(site, orb)))
            .count()
    }

    /// Occupation of orbital `orb` of `site` for the state at `rank`.
    pub fn get_n_site(&self, rank: usize, site: usize, orb: usize) -> usize {
        self.is_there_an_electron_at(self.data[rank], site, orb)
    }

    #[inline(always)]
    pub fn is_there_an_electron_at(&self, word: T, site: usize, orb: usize) -> usize {
        word.check(self.slot(site, orb)) as usize
    }

    /// Applies `what` on `slot`. `None` if the state is annihilated.
    #[inline(always)]
    pub fn apply(word: T, what: Operator, slot: usize) -> Option<T> {
        let occupied = word.check(slot);
        match (what, occupied) {
            (Operator::Constructor, true) | (Operator::Destructor, false) => None,
            _ => {
                let mut out = word;
                out.set(slot);
                Some(out)
            }
        }
    }

    /// Rank in this sector of `what` applied on `slot` of a word of the
    /// neighbouring sector.
    pub fn bra_index(&self, word: T, what: Operator, slot: usize) -> Option<usize> {
        Self::apply(word, what, slot).map(|w| self.perfect_index(w))
    }

    /// Applies `what` on `slot` of the state at `rank`, giving its rank in
    /// `target`. `None` if the state is annihilated.
    pub fn get_bra_index(&self, rank: usize, what: Operator, slot: usize, target: &BasisOneSpin<T>) -> Option<usize> {
        target.bra_index(self.data[rank], what, slot)
    }

    /// Fermion sign of a hop between `(i, orb_i)` and `(j, orb_j)`:
    /// $(-1)^n$ where $n$ counts the occupied slots strictly between the two.
    /// # Panics
    /// `i` must not be greater than `j`.
    pub fn do_sign(&self, word: T, i: usize, orb_i: usize, j: usize, orb_j: usize) -> i32 {
        if i > j {
            error!("do_sign called with i = {} > j = {} (orb_i = {}, orb_j = {}, word = {:b}).",
                i, j, orb_i, orb_j, word);
            panic!("do_sign requires i <= j, got i = {}, j = {}.", i, j);
        }
        Self::do_sign_slots(word, self.slot(i, orb_i), self.slot(j, orb_j))
    }

    /// [BasisOneSpin::do_sign] on raw slots.
    #[inline(always)]
    pub fn do_sign_slots(word: T, a: usize, b: usize) -> i32 {
        parity_sign(word.count_between(a, b))
    }

    /// Sign of a single operator on `(site, orb)` of the state at `rank`,
    /// counted from the occupied slots above it.
    pub fn do_sign_site(&self, rank: usize, site: usize, orb: usize) -> i32 {
        Self::do_sign_site_slot(self.data[rank], self.slot(site, orb))
    }

    #[inline(always)]
    pub fn do_sign_site_slot(word: T, slot: usize) -> i32 {
        parity_sign(word.count_above(slot))
    }

    /// Green's function sign of a single operator on `(site, orb)`: counts the
    /// occupied slots below it, from slot $0$.
    pub fn do_sign_gf(&self, word: T, site: usize, orb: usize) -> i32 {
        Self::do_sign_gf_slot(word, self.slot(site, orb))
    }

    #[inline(always)]
    pub fn do_sign_gf_slot(word: T, slot: usize) -> i32 {
        parity_sign(word.count_below(slot))
    }

    /// Particle number of the sector reached by `what`, if it exists.
    pub fn new_part(&self, what: Operator) -> Option<usize> {
        let n = self.n_particles as isize + what.delta();
        if n < 0 || n as usize > self.n_slots() {
            return None;
        }
        Some(n as usize)
    }
}

impl<T> std::ops::Index<usize> for BasisOneSpin<T> {
    type Output = T;

    fn index(&self, rank: usize) -> &T {
        &self.data[rank]
    }
}
